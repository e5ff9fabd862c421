//! Response shaping: content items to JSON records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::block_parser::{ParsedBlock, parse_blocks};
use super::block_render::BlockRenderer;
use super::excerpt::excerpt_for;
use super::fields::{FieldProvider, deserialize_raw};
use super::permalink::Permalinks;
use crate::models::{ContentItem, ContentType};
use crate::store::{ContentStore, StoreError};

/// A content item as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    pub title: String,
    pub slug: String,
    pub date: DateTime<Utc>,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub blocks: Vec<BlockRecord>,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
}

/// A top-level block of an item's body.
#[derive(Debug, Clone, Serialize)]
pub struct BlockRecord {
    #[serde(rename = "blockName")]
    pub name: Option<String>,
    pub attrs: Map<String, Value>,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    #[serde(rename = "innerContent")]
    pub inner_content: Vec<Option<String>>,
    pub rendered: String,
}

/// Turns content items into [`ContentRecord`]s.
#[derive(Clone)]
pub struct RecordFormatter {
    store: Arc<dyn ContentStore>,
    renderer: Arc<dyn BlockRenderer>,
    fields: Option<Arc<dyn FieldProvider>>,
    permalinks: Permalinks,
}

impl RecordFormatter {
    pub fn new(
        store: Arc<dyn ContentStore>,
        renderer: Arc<dyn BlockRenderer>,
        fields: Option<Arc<dyn FieldProvider>>,
        permalinks: Permalinks,
    ) -> Self {
        Self {
            store,
            renderer,
            fields,
            permalinks,
        }
    }

    /// Base record: everything except custom fields.
    pub async fn format(
        &self,
        item: &ContentItem,
        content_type: Option<&ContentType>,
    ) -> Result<ContentRecord, StoreError> {
        Ok(ContentRecord {
            id: item.id,
            item_type: item.item_type.clone(),
            title: item.title.clone(),
            slug: item.slug.clone(),
            date: item.published,
            excerpt: excerpt_for(&item.excerpt, &item.body),
            featured_image: self.featured_image(item).await?,
            blocks: self.blocks(&item.body),
            link: self.permalinks.item(content_type, &item.slug),
            custom_fields: None,
        })
    }

    /// Base record plus every public custom field.
    pub async fn format_with_fields(
        &self,
        item: &ContentItem,
        content_type: Option<&ContentType>,
    ) -> Result<ContentRecord, StoreError> {
        let mut record = self.format(item, content_type).await?;
        record.custom_fields = Some(self.custom_fields(item.id).await?);
        Ok(record)
    }

    /// Parse a body and render each named block.
    pub fn blocks(&self, body: &str) -> Vec<BlockRecord> {
        parse_blocks(body)
            .into_iter()
            .map(|block| {
                let rendered = if block.name.is_some() {
                    self.renderer.render(&block)
                } else {
                    String::new()
                };
                let ParsedBlock {
                    name,
                    attrs,
                    inner_html,
                    inner_content,
                    ..
                } = block;
                BlockRecord {
                    name,
                    attrs,
                    inner_html,
                    inner_content,
                    rendered,
                }
            })
            .collect()
    }

    /// Full-size URL of the featured image; `None` when unset or missing.
    async fn featured_image(&self, item: &ContentItem) -> Result<Option<String>, StoreError> {
        let Some(media_id) = item.featured_media else {
            return Ok(None);
        };
        let attachment = self.store.attachment(media_id).await?;
        if attachment.is_none() {
            tracing::debug!(item_id = item.id, media_id, "featured image attachment missing");
        }
        Ok(attachment.map(|a| a.url))
    }

    /// Custom fields keyed by meta key; keys starting with `_` are private.
    ///
    /// Only the first stored value of a repeated key is used.
    async fn custom_fields(&self, item_id: i64) -> Result<Map<String, Value>, StoreError> {
        let mut fields = Map::new();
        for meta in self.store.item_meta(item_id).await? {
            if meta.meta_key.starts_with('_') || fields.contains_key(&meta.meta_key) {
                continue;
            }
            let value = self
                .fields
                .as_ref()
                .and_then(|provider| provider.typed_value(&meta.meta_key, &meta.meta_value))
                .unwrap_or_else(|| deserialize_raw(&meta.meta_value));
            fields.insert(meta.meta_key, value);
        }
        Ok(fields)
    }
}
