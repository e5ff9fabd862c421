//! Content item model and published-content queries.
//!
//! Items are the publishable records (posts, pages, custom types). The API
//! never reads unpublished items: every query goes through [`PublishedQuery`],
//! which always filters on [`STATUS_PUBLISH`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::store::StoreError;

/// Status value of published items.
pub const STATUS_PUBLISH: &str = "publish";

/// Content item record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentItem {
    /// Numeric identifier.
    pub id: i64,

    /// Content type machine name.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub item_type: String,

    /// Item title.
    pub title: String,

    /// URL slug, unique per type.
    pub slug: String,

    /// Publication status ("publish", "draft", "pending", "private", ...).
    pub status: String,

    /// Publish date.
    pub published: DateTime<Utc>,

    /// Manual excerpt; empty when the excerpt should be generated.
    #[serde(default)]
    pub excerpt: String,

    /// Structured body (comment-delimited blocks).
    #[serde(default)]
    pub body: String,

    /// Featured image attachment ID.
    #[serde(default)]
    pub featured_media: Option<i64>,
}

impl ContentItem {
    /// Check if this item is published.
    pub fn is_published(&self) -> bool {
        self.status == STATUS_PUBLISH
    }
}

/// A single custom field value stored against an item.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemMeta {
    pub item_id: i64,
    pub meta_key: String,
    pub meta_value: String,
}

/// A media attachment (only the full-size URL is tracked).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attachment {
    pub id: i64,
    pub url: String,
}

/// Filter for published items.
///
/// There is no way to express a status other than published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedQuery {
    /// Restrict to these types; `None` means any type. An empty list matches nothing.
    pub types: Option<Vec<String>>,
    pub id: Option<i64>,
    pub slug: Option<String>,
    /// `(taxonomy, term_id)` the item must carry.
    pub term: Option<(String, i64)>,
}

impl PublishedQuery {
    /// All published items of any type.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_term(mut self, taxonomy: impl Into<String>, term_id: i64) -> Self {
        self.term = Some((taxonomy.into(), term_id));
        self
    }

    /// Check whether an item satisfies every filter except the term filter.
    pub fn matches(&self, item: &ContentItem) -> bool {
        item.is_published()
            && self
                .types
                .as_ref()
                .is_none_or(|types| types.iter().any(|t| *t == item.item_type))
            && self.id.is_none_or(|id| id == item.id)
            && self.slug.as_ref().is_none_or(|slug| *slug == item.slug)
    }
}

impl ContentItem {
    /// Fetch published items matching the query, newest first.
    pub async fn find_published(
        pool: &PgPool,
        query: &PublishedQuery,
    ) -> Result<Vec<Self>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT i.id, i.type, i.title, i.slug, i.status, i.published, i.excerpt, i.body, \
             i.featured_media FROM content_item i WHERE i.status = ",
        );
        qb.push_bind(STATUS_PUBLISH);

        if let Some(types) = &query.types {
            qb.push(" AND i.type = ANY(");
            qb.push_bind(types.clone());
            qb.push(")");
        }

        if let Some(id) = query.id {
            qb.push(" AND i.id = ");
            qb.push_bind(id);
        }

        if let Some(slug) = &query.slug {
            qb.push(" AND i.slug = ");
            qb.push_bind(slug.clone());
        }

        if let Some((taxonomy, term_id)) = &query.term {
            qb.push(
                " AND EXISTS (SELECT 1 FROM item_term it JOIN term t ON t.id = it.term_id \
                 WHERE it.item_id = i.id AND t.taxonomy = ",
            );
            qb.push_bind(taxonomy.clone());
            qb.push(" AND t.id = ");
            qb.push_bind(*term_id);
            qb.push(")");
        }

        qb.push(" ORDER BY i.published DESC, i.id DESC");

        let items = qb.build_query_as::<Self>().fetch_all(pool).await?;
        Ok(items)
    }
}

impl ItemMeta {
    /// List an item's custom fields in insertion order.
    pub async fn list_for_item(pool: &PgPool, item_id: i64) -> Result<Vec<Self>, StoreError> {
        let meta = sqlx::query_as::<_, Self>(
            "SELECT item_id, meta_key, meta_value FROM item_meta WHERE item_id = $1 ORDER BY id",
        )
        .bind(item_id)
        .fetch_all(pool)
        .await?;

        Ok(meta)
    }
}

impl Attachment {
    /// Find an attachment by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, StoreError> {
        let attachment =
            sqlx::query_as::<_, Self>("SELECT id, url FROM attachment WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(attachment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: i64, item_type: &str, slug: &str, status: &str) -> ContentItem {
        ContentItem {
            id,
            item_type: item_type.to_string(),
            title: format!("Item {id}"),
            slug: slug.to_string(),
            status: status.to_string(),
            published: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            excerpt: String::new(),
            body: String::new(),
            featured_media: None,
        }
    }

    #[test]
    fn unpublished_items_never_match() {
        let draft = item(1, "post", "hello", "draft");
        assert!(!PublishedQuery::new().matches(&draft));
        assert!(!PublishedQuery::new().with_id(1).matches(&draft));
    }

    #[test]
    fn filters_combine() {
        let post = item(7, "post", "hello", "publish");
        assert!(PublishedQuery::new().matches(&post));
        assert!(PublishedQuery::new().of_types(["page", "post"]).matches(&post));
        assert!(!PublishedQuery::new().of_types(["page"]).matches(&post));
        assert!(PublishedQuery::new().with_slug("hello").with_id(7).matches(&post));
        assert!(!PublishedQuery::new().with_slug("other").matches(&post));
    }

    #[test]
    fn empty_type_list_matches_nothing() {
        let post = item(7, "post", "hello", "publish");
        assert!(!PublishedQuery::new().of_types(Vec::<String>::new()).matches(&post));
    }

    #[test]
    fn item_deserializes_with_defaults() {
        let item: ContentItem = serde_json::from_value(serde_json::json!({
            "id": 3,
            "type": "page",
            "title": "About",
            "slug": "about",
            "status": "publish",
            "published": "2024-01-02T03:04:05Z"
        }))
        .unwrap();
        assert_eq!(item.item_type, "page");
        assert!(item.body.is_empty());
        assert!(item.featured_media.is_none());
        assert!(item.is_published());
    }
}
