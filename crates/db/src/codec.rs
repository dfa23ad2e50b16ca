//! JSON document encoding.
//!
//! Every collection is stored as a pretty-printed JSON array. Category
//! documents may also use the older grouped layout
//! `{"income": [...], "expense": [...]}`; those are flattened on read and
//! their display metadata is normalized.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use coinkeeper_core::category::style::{normalize_color, normalize_icon};
use coinkeeper_core::ledger::store::{Collection, StoreError};

/// Parses raw document bytes into a canonical JSON array.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if the bytes are not JSON or the
/// document has an unknown shape.
pub fn parse_document(key: &str, collection: Option<Collection>, bytes: &[u8]) -> Result<Value, StoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Array(Vec::new()));
    }
    let value: Value = serde_json::from_slice(bytes).map_err(|e| StoreError::corrupt(key, e))?;

    match collection {
        Some(Collection::Categories) => upgrade_categories(key, value),
        _ if value.is_array() => Ok(value),
        _ => Err(StoreError::corrupt(key, "expected a JSON array")),
    }
}

/// Decodes records from a canonical JSON array.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if a record does not match `T`.
pub fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> Result<Vec<T>, StoreError> {
    Vec::<T>::deserialize(value).map_err(|e| StoreError::corrupt(key, e))
}

/// Encodes records as a JSON array value.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if a record cannot be serialized.
pub fn encode<T: Serialize>(key: &str, records: &[T]) -> Result<Value, StoreError> {
    serde_json::to_value(records).map_err(|e| StoreError::encode(key, e))
}

/// Renders a document for writing.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if rendering fails.
pub fn render(key: &str, value: &Value) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec_pretty(value).map_err(|e| StoreError::encode(key, e))
}

fn upgrade_categories(key: &str, value: Value) -> Result<Value, StoreError> {
    let flat = match value {
        Value::Array(items) => items,
        Value::Object(mut groups) => {
            let mut items = Vec::new();
            for kind in ["income", "expense"] {
                let Some(group) = groups.remove(kind) else {
                    continue;
                };
                let Value::Array(group) = group else {
                    return Err(StoreError::corrupt(key, format!("'{kind}' group is not an array")));
                };
                for mut item in group {
                    if let Value::Object(fields) = &mut item {
                        fields
                            .entry("type")
                            .or_insert_with(|| Value::String(kind.to_string()));
                    }
                    items.push(item);
                }
            }
            items
        }
        _ => return Err(StoreError::corrupt(key, "expected categories array or groups")),
    };

    let items = flat
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(Value::Object(normalize_category(fields))),
            _ => Err(StoreError::corrupt(key, "category entry is not an object")),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(items))
}

fn normalize_category(mut fields: Map<String, Value>) -> Map<String, Value> {
    let color = normalize_color(fields.get("color").and_then(Value::as_str));
    let icon = normalize_icon(fields.get("icon").and_then(Value::as_str));
    if let Some(Value::String(name)) = fields.get_mut("name") {
        *name = name.trim().to_string();
    }
    fields.insert("color".to_string(), Value::String(color));
    fields.insert("icon".to_string(), Value::String(icon));
    fields
}
