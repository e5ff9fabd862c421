//! PostgreSQL content store.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ContentStore, StoreError};
use crate::db;
use crate::models::{
    Attachment, ContentItem, ContentType, FieldDefinition, ItemMeta, PublishedQuery, Taxonomy,
    Term,
};

/// Content store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn content_type(&self, name: &str) -> Result<Option<ContentType>, StoreError> {
        ContentType::find_by_name(&self.pool, name).await
    }

    async fn content_types(&self) -> Result<Vec<ContentType>, StoreError> {
        ContentType::list(&self.pool).await
    }

    async fn published_items(
        &self,
        query: &PublishedQuery,
    ) -> Result<Vec<ContentItem>, StoreError> {
        ContentItem::find_published(&self.pool, query).await
    }

    async fn taxonomy(&self, name: &str) -> Result<Option<Taxonomy>, StoreError> {
        Taxonomy::find_by_name(&self.pool, name).await
    }

    async fn taxonomies_for_type(&self, item_type: &str) -> Result<Vec<Taxonomy>, StoreError> {
        Taxonomy::list_for_type(&self.pool, item_type).await
    }

    async fn terms(&self, taxonomy: &str) -> Result<Vec<Term>, StoreError> {
        Term::list_for_taxonomy(&self.pool, taxonomy).await
    }

    async fn item_meta(&self, item_id: i64) -> Result<Vec<ItemMeta>, StoreError> {
        ItemMeta::list_for_item(&self.pool, item_id).await
    }

    async fn attachment(&self, id: i64) -> Result<Option<Attachment>, StoreError> {
        Attachment::find_by_id(&self.pool, id).await
    }

    async fn field_definitions(&self) -> Result<Vec<FieldDefinition>, StoreError> {
        FieldDefinition::list(&self.pool).await
    }

    async fn ping(&self) -> bool {
        db::check_health(&self.pool).await
    }
}
