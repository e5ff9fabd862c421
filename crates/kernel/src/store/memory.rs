//! In-process content store.
//!
//! Holds a [`Fixture`] behind a lock. Used by the `memory` backend (optionally
//! seeded from a JSON file) and by the integration tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::{ContentStore, StoreError};
use crate::models::{
    Attachment, ContentItem, ContentType, FieldDefinition, ItemMeta, PublishedQuery, Taxonomy,
    Term,
};

/// Assignment of a term to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTerm {
    pub item_id: i64,
    pub term_id: i64,
}

/// Complete store contents, as loaded from a JSON fixture.
///
/// Term counts in a fixture are ignored; they are computed from
/// `item_terms` and item status on every read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub types: Vec<ContentType>,
    pub taxonomies: Vec<Taxonomy>,
    pub items: Vec<ContentItem>,
    pub terms: Vec<Term>,
    pub item_terms: Vec<ItemTerm>,
    pub meta: Vec<ItemMeta>,
    pub attachments: Vec<Attachment>,
    pub fields: Vec<FieldDefinition>,
}

/// Content store kept entirely in memory.
#[derive(Default)]
pub struct MemoryContentStore {
    data: RwLock<Fixture>,
    failing_taxonomies: RwLock<HashSet<String>>,
    unavailable: AtomicBool,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given fixture.
    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            data: RwLock::new(fixture),
            ..Self::default()
        }
    }

    /// Parse a JSON fixture into a store.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_fixture(serde_json::from_str(json)?))
    }

    pub fn add_type(&self, content_type: ContentType) {
        self.data.write().types.push(content_type);
    }

    pub fn add_taxonomy(&self, taxonomy: Taxonomy) {
        self.data.write().taxonomies.push(taxonomy);
    }

    pub fn add_item(&self, item: ContentItem) {
        self.data.write().items.push(item);
    }

    pub fn add_term(&self, term: Term) {
        self.data.write().terms.push(term);
    }

    pub fn assign_term(&self, item_id: i64, term_id: i64) {
        self.data.write().item_terms.push(ItemTerm { item_id, term_id });
    }

    pub fn add_meta(&self, item_id: i64, key: &str, value: &str) {
        self.data.write().meta.push(ItemMeta {
            item_id,
            meta_key: key.to_string(),
            meta_value: value.to_string(),
        });
    }

    /// Append a meta value to an existing term. Unknown term IDs are ignored.
    pub fn add_term_meta(&self, term_id: i64, key: &str, value: &str) {
        let mut data = self.data.write();
        if let Some(term) = data.terms.iter_mut().find(|t| t.id == term_id) {
            term.meta
                .entry(key.to_string())
                .or_default()
                .push(value.to_string());
        }
    }

    pub fn add_attachment(&self, attachment: Attachment) {
        self.data.write().attachments.push(attachment);
    }

    pub fn define_field(&self, definition: FieldDefinition) {
        self.data.write().fields.push(definition);
    }

    /// Make term lookups for a taxonomy fail from now on.
    pub fn fail_term_lookup(&self, taxonomy: &str) {
        self.failing_taxonomies.write().insert(taxonomy.to_string());
    }

    /// Toggle what [`ContentStore::ping`] reports.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::Relaxed);
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn content_type(&self, name: &str) -> Result<Option<ContentType>, StoreError> {
        Ok(self
            .data
            .read()
            .types
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn content_types(&self) -> Result<Vec<ContentType>, StoreError> {
        Ok(self.data.read().types.clone())
    }

    async fn published_items(
        &self,
        query: &PublishedQuery,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let data = self.data.read();

        let mut items: Vec<ContentItem> = data
            .items
            .iter()
            .filter(|item| query.matches(item))
            .filter(|item| match &query.term {
                None => true,
                Some((taxonomy, term_id)) => {
                    data.terms
                        .iter()
                        .any(|t| t.id == *term_id && t.taxonomy == *taxonomy)
                        && data.item_terms.contains(&ItemTerm {
                            item_id: item.id,
                            term_id: *term_id,
                        })
                }
            })
            .cloned()
            .collect();

        items.sort_by(|a, b| b.published.cmp(&a.published).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn taxonomy(&self, name: &str) -> Result<Option<Taxonomy>, StoreError> {
        Ok(self
            .data
            .read()
            .taxonomies
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn taxonomies_for_type(&self, item_type: &str) -> Result<Vec<Taxonomy>, StoreError> {
        Ok(self
            .data
            .read()
            .taxonomies
            .iter()
            .filter(|t| t.applies_to(item_type))
            .cloned()
            .collect())
    }

    async fn terms(&self, taxonomy: &str) -> Result<Vec<Term>, StoreError> {
        if self.failing_taxonomies.read().contains(taxonomy) {
            return Err(StoreError::Unavailable(format!(
                "term lookup failed for taxonomy {taxonomy}"
            )));
        }

        let data = self.data.read();
        let published: HashSet<i64> = data
            .items
            .iter()
            .filter(|i| i.is_published())
            .map(|i| i.id)
            .collect();

        let mut terms: Vec<Term> = data
            .terms
            .iter()
            .filter(|t| t.taxonomy == taxonomy)
            .map(|t| {
                let count = data
                    .item_terms
                    .iter()
                    .filter(|it| it.term_id == t.id && published.contains(&it.item_id))
                    .count();
                Term {
                    count: i64::try_from(count).unwrap_or(i64::MAX),
                    ..t.clone()
                }
            })
            .collect();

        terms.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(terms)
    }

    async fn item_meta(&self, item_id: i64) -> Result<Vec<ItemMeta>, StoreError> {
        Ok(self
            .data
            .read()
            .meta
            .iter()
            .filter(|m| m.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn attachment(&self, id: i64) -> Result<Option<Attachment>, StoreError> {
        Ok(self
            .data
            .read()
            .attachments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn field_definitions(&self) -> Result<Vec<FieldDefinition>, StoreError> {
        Ok(self.data.read().fields.clone())
    }

    async fn ping(&self) -> bool {
        !self.unavailable.load(Ordering::Relaxed)
    }
}
