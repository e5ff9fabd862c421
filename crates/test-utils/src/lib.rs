//! Content API test utilities.
//!
//! Fixture builders for content types, taxonomies, terms, and items, plus
//! assertion helpers for JSON responses.

use chrono::{DateTime, TimeZone, Utc};

use content_api::models::{ContentItem, ContentType, Taxonomy, Term};

/// Create a public content type with no rewrite slug.
pub fn test_type(name: &str) -> ContentType {
    ContentType {
        name: name.to_string(),
        label: name.to_string(),
        public: true,
        rewrite_slug: None,
    }
}

/// Create a non-public content type.
pub fn private_type(name: &str) -> ContentType {
    ContentType {
        public: false,
        ..test_type(name)
    }
}

/// Create a public taxonomy registered for the given types.
pub fn test_taxonomy(name: &str, object_types: &[&str]) -> Taxonomy {
    Taxonomy {
        name: name.to_string(),
        label: name.to_string(),
        public: true,
        object_types: object_types.iter().map(|s| s.to_string()).collect(),
    }
}

/// Create a term; the slug is the lowercased name.
pub fn test_term(id: i64, taxonomy: &str, name: &str) -> Term {
    Term {
        id,
        taxonomy: taxonomy.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        count: 0,
        meta: Default::default(),
    }
}

/// Create a published test item. The slug defaults to `item-{id}`.
pub fn test_item(id: i64, item_type: &str, title: &str) -> TestItem {
    TestItem {
        item: ContentItem {
            id,
            item_type: item_type.to_string(),
            title: title.to_string(),
            slug: format!("item-{id}"),
            status: "publish".to_string(),
            published: date(2024, 1, 1),
            excerpt: String::new(),
            body: String::new(),
            featured_media: None,
        },
    }
}

/// Midnight UTC on the given day.
///
/// # Panics
///
/// Panics on an invalid calendar date.
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid test date")
}

/// A test item builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestItem {
    item: ContentItem,
}

impl TestItem {
    /// Set the slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.item.slug = slug.to_string();
        self
    }

    /// Set as draft.
    pub fn unpublished(self) -> Self {
        self.with_status("draft")
    }

    /// Set an arbitrary status.
    pub fn with_status(mut self, status: &str) -> Self {
        self.item.status = status.to_string();
        self
    }

    /// Set the publish date.
    pub fn published_on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.item.published = date(year, month, day);
        self
    }

    /// Set the block body.
    pub fn with_body(mut self, body: &str) -> Self {
        self.item.body = body.to_string();
        self
    }

    /// Set a manual excerpt.
    pub fn with_excerpt(mut self, excerpt: &str) -> Self {
        self.item.excerpt = excerpt.to_string();
        self
    }

    /// Set the featured image attachment.
    pub fn with_featured_media(mut self, attachment_id: i64) -> Self {
        self.item.featured_media = Some(attachment_id);
        self
    }

    /// Finish building.
    pub fn build(self) -> ContentItem {
        self.item
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value lacks a specific key.
    pub fn lacks_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_none(),
            "Expected JSON to lack key '{key}', got: {value}"
        );
    }

    /// Assert that a response body is the 404 envelope with the given code and message.
    pub fn not_found(body: &Value, code: &str, message: &str) {
        assert_eq!(body["code"], code, "unexpected error code in {body}");
        assert_eq!(body["message"], message, "unexpected message in {body}");
        assert_eq!(body["data"]["status"], 404, "unexpected status in {body}");
    }

    /// Collect the `id` of every record in a JSON array.
    pub fn ids(body: &Value) -> Vec<i64> {
        body.as_array()
            .map(|records| records.iter().filter_map(|r| r["id"].as_i64()).collect())
            .unwrap_or_default()
    }
}
