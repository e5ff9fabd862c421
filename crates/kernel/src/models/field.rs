//! Typed custom field definitions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::store::StoreError;

/// Value type a defined custom field resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Json,
    List,
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "json" => Ok(Self::Json),
            "list" => Ok(Self::List),
            other => Err(format!("unknown field type: {other}")),
        }
    }
}

/// A custom field definition: meta key plus the type its value resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
}

#[derive(sqlx::FromRow)]
struct FieldDefinitionRow {
    name: String,
    field_type: String,
}

impl FieldDefinition {
    /// List all field definitions. Rows with an unknown type are skipped.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, StoreError> {
        let rows = sqlx::query_as::<_, FieldDefinitionRow>(
            "SELECT name, field_type FROM field_definition ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match row.field_type.parse() {
                Ok(field_type) => Some(Self {
                    name: row.name,
                    field_type,
                }),
                Err(e) => {
                    tracing::warn!(field = %row.name, error = %e, "skipping field definition");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn field_type_names_match_serde() {
        for (name, ft) in [
            ("text", FieldType::Text),
            ("number", FieldType::Number),
            ("boolean", FieldType::Boolean),
            ("json", FieldType::Json),
            ("list", FieldType::List),
        ] {
            assert_eq!(name.parse::<FieldType>(), Ok(ft));
            assert_eq!(serde_json::to_value(ft).unwrap(), name);
        }
        assert!("date".parse::<FieldType>().is_err());
    }
}
