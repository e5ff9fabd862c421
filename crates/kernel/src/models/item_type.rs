//! Content type model.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::store::StoreError;

/// A registered content type (e.g. "post", "page", "event").
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentType {
    /// Machine name.
    pub name: String,

    /// Human-readable label.
    pub label: String,

    /// Whether the type is exposed publicly.
    #[serde(default = "default_public")]
    pub public: bool,

    /// Permalink prefix; `None` puts items at the site root.
    #[serde(default)]
    pub rewrite_slug: Option<String>,
}

fn default_public() -> bool {
    true
}

impl ContentType {
    /// Find a content type by machine name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, StoreError> {
        let content_type = sqlx::query_as::<_, Self>(
            "SELECT name, label, public, rewrite_slug FROM content_type WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(content_type)
    }

    /// List all content types in registration order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, StoreError> {
        let types = sqlx::query_as::<_, Self>(
            "SELECT name, label, public, rewrite_slug FROM content_type ORDER BY weight, name",
        )
        .fetch_all(pool)
        .await?;

        Ok(types)
    }
}
