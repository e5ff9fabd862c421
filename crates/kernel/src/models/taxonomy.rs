//! Taxonomy models: classification schemes and their terms.
//!
//! - Taxonomy: a named scheme registered for one or more content types
//! - Term: a value within a taxonomy, assigned to items
//! - Term meta: arbitrary key/value pairs stored against a term

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::item::STATUS_PUBLISH;
use crate::store::StoreError;

/// A taxonomy (e.g. "category", "post_tag").
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Taxonomy {
    /// Machine name.
    pub name: String,

    /// Human-readable label.
    pub label: String,

    /// Whether the taxonomy is exposed publicly.
    #[serde(default = "default_public")]
    pub public: bool,

    /// Content types this taxonomy is registered for.
    #[serde(default)]
    pub object_types: Vec<String>,
}

fn default_public() -> bool {
    true
}

impl Taxonomy {
    /// Check whether the taxonomy is registered for a content type.
    pub fn applies_to(&self, item_type: &str) -> bool {
        self.object_types.iter().any(|t| t == item_type)
    }
}

/// A term within a taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Term {
    /// Numeric identifier.
    pub id: i64,

    /// Taxonomy this term belongs to.
    pub taxonomy: String,

    /// Human-readable name.
    pub name: String,

    /// URL slug.
    pub slug: String,

    /// Number of published items carrying this term.
    #[serde(default)]
    pub count: i64,

    /// Stored term meta: key to raw values. Values keep insertion order.
    #[sqlx(skip)]
    #[serde(default)]
    pub meta: BTreeMap<String, Vec<String>>,
}

#[derive(sqlx::FromRow)]
struct TermMetaRow {
    term_id: i64,
    meta_key: String,
    meta_value: String,
}

const TAXONOMY_COLUMNS: &str = r#"
    tx.name, tx.label, tx.public,
    ARRAY(
        SELECT r.content_type FROM content_type_taxonomy r
        WHERE r.taxonomy = tx.name ORDER BY r.content_type
    ) AS object_types
"#;

impl Taxonomy {
    /// Find a taxonomy by machine name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, StoreError> {
        let taxonomy = sqlx::query_as::<_, Self>(&format!(
            "SELECT {TAXONOMY_COLUMNS} FROM taxonomy tx WHERE tx.name = $1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(taxonomy)
    }

    /// List the taxonomies registered for a content type, in registration order.
    pub async fn list_for_type(pool: &PgPool, item_type: &str) -> Result<Vec<Self>, StoreError> {
        let taxonomies = sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT {TAXONOMY_COLUMNS}
            FROM taxonomy tx
            JOIN content_type_taxonomy ctt ON ctt.taxonomy = tx.name
            WHERE ctt.content_type = $1
            ORDER BY ctt.weight, tx.name
            "#
        ))
        .bind(item_type)
        .fetch_all(pool)
        .await?;

        Ok(taxonomies)
    }
}

impl Term {
    /// List every term of a taxonomy, including terms with no items.
    ///
    /// Counts only published items. Meta is attached in a second query.
    pub async fn list_for_taxonomy(pool: &PgPool, taxonomy: &str) -> Result<Vec<Self>, StoreError> {
        let mut terms = sqlx::query_as::<_, Self>(
            r#"
            SELECT t.id, t.taxonomy, t.name, t.slug,
                (
                    SELECT COUNT(*) FROM item_term it
                    JOIN content_item i ON i.id = it.item_id
                    WHERE it.term_id = t.id AND i.status = $2
                ) AS count
            FROM term t
            WHERE t.taxonomy = $1
            ORDER BY t.name, t.id
            "#,
        )
        .bind(taxonomy)
        .bind(STATUS_PUBLISH)
        .fetch_all(pool)
        .await?;

        let rows = sqlx::query_as::<_, TermMetaRow>(
            r#"
            SELECT tm.term_id, tm.meta_key, tm.meta_value
            FROM term_meta tm
            JOIN term t ON t.id = tm.term_id
            WHERE t.taxonomy = $1
            ORDER BY tm.id
            "#,
        )
        .bind(taxonomy)
        .fetch_all(pool)
        .await?;

        for row in rows {
            if let Some(term) = terms.iter_mut().find(|t| t.id == row.term_id) {
                term.meta.entry(row.meta_key).or_default().push(row.meta_value);
            }
        }

        Ok(terms)
    }
}
