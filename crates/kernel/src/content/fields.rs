//! Custom field resolution.
//!
//! Raw meta values are strings. A [`FieldProvider`], when one is configured,
//! gets first say on a key and returns a typed JSON value; anything it does
//! not know falls back to [`deserialize_raw`].

use std::collections::HashMap;

use serde_json::{Number, Value};

use crate::models::{FieldDefinition, FieldType};
use crate::store::{ContentStore, StoreError};

/// Optional source of typed custom field values.
pub trait FieldProvider: Send + Sync {
    /// Typed value for `key`, or `None` when the provider has nothing for it.
    fn typed_value(&self, key: &str, raw: &str) -> Option<Value>;
}

/// Field provider driven by stored field definitions.
#[derive(Debug, Clone, Default)]
pub struct DefinedFieldProvider {
    definitions: HashMap<String, FieldType>,
}

impl DefinedFieldProvider {
    pub fn new(definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.name, d.field_type))
                .collect(),
        }
    }

    /// Load definitions from the content store.
    pub async fn load(store: &dyn ContentStore) -> Result<Self, StoreError> {
        Ok(Self::new(store.field_definitions().await?))
    }

    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }
}

impl FieldProvider for DefinedFieldProvider {
    fn typed_value(&self, key: &str, raw: &str) -> Option<Value> {
        let field_type = self.definitions.get(key)?;
        convert(*field_type, raw)
    }
}

/// Convert a raw value to `field_type`. `None` when it does not fit.
fn convert(field_type: FieldType, raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    match field_type {
        FieldType::Text => Some(Value::String(raw.to_string())),
        FieldType::Number => {
            if let Ok(n) = trimmed.parse::<i64>() {
                Some(Value::Number(n.into()))
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
            }
        }
        FieldType::Boolean => match trimmed.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(Value::Bool(true)),
            "" | "0" | "false" | "no" | "off" => Some(Value::Bool(false)),
            _ => None,
        },
        FieldType::Json => serde_json::from_str(trimmed).ok(),
        FieldType::List => match serde_json::from_str::<Value>(trimmed) {
            Ok(list @ Value::Array(_)) => Some(list),
            _ => Some(Value::Array(
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect(),
            )),
        },
    }
}

/// Deserialize a stored value.
///
/// Only structured values (JSON objects and arrays) are decoded. Scalars such
/// as `5`, `true` or `null` stay strings, as does anything that fails to parse.
pub fn deserialize_raw(raw: &str) -> Value {
    let raw_string = || Value::String(raw.to_string());
    if raw.trim_start().starts_with(['{', '[']) {
        serde_json::from_str(raw).unwrap_or_else(|_| raw_string())
    } else {
        raw_string()
    }
}
