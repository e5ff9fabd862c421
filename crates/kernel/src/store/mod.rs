//! Content store abstraction.
//!
//! Handlers never talk to a database directly: every read goes through
//! [`ContentStore`]. Two implementations ship with the crate:
//!
//! - [`PgContentStore`] - PostgreSQL via sqlx
//! - [`MemoryContentStore`] - in-process, seeded from code or a JSON fixture
//!
//! Item reads only accept a [`PublishedQuery`], so an unpublished item can
//! never reach a response.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::{Fixture, MemoryContentStore};
pub use postgres::PgContentStore;

use crate::models::{
    Attachment, ContentItem, ContentType, FieldDefinition, ItemMeta, PublishedQuery, Taxonomy,
    Term,
};

/// Errors raised by a content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to content, taxonomies, and metadata.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up a content type by machine name.
    async fn content_type(&self, name: &str) -> Result<Option<ContentType>, StoreError>;

    /// List every registered content type.
    async fn content_types(&self) -> Result<Vec<ContentType>, StoreError>;

    /// Published items matching the query, newest first.
    async fn published_items(&self, query: &PublishedQuery)
    -> Result<Vec<ContentItem>, StoreError>;

    /// Look up a taxonomy by machine name.
    async fn taxonomy(&self, name: &str) -> Result<Option<Taxonomy>, StoreError>;

    /// Taxonomies registered for a content type, public or not.
    async fn taxonomies_for_type(&self, item_type: &str) -> Result<Vec<Taxonomy>, StoreError>;

    /// Every term of a taxonomy, including terms with no items.
    async fn terms(&self, taxonomy: &str) -> Result<Vec<Term>, StoreError>;

    /// Custom fields stored against an item, in insertion order.
    async fn item_meta(&self, item_id: i64) -> Result<Vec<ItemMeta>, StoreError>;

    /// Look up a media attachment.
    async fn attachment(&self, id: i64) -> Result<Option<Attachment>, StoreError>;

    /// Typed custom field definitions.
    async fn field_definitions(&self) -> Result<Vec<FieldDefinition>, StoreError>;

    /// Check whether the store is reachable.
    async fn ping(&self) -> bool;
}
