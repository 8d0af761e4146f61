// crates/openprodoc-mcp/src/attrs.rs
// Typed custom attributes and field extraction from remote records

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Attribute data types known to the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AttributeType {
    #[serde(rename = "String")]
    Text,
    Date,
    Boolean,
    Integer,
    Decimal,
    TimeStamp,
    Thesaur,
}

impl AttributeType {
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeType::Text => "String",
            AttributeType::Date => "Date",
            AttributeType::Boolean => "Boolean",
            AttributeType::Integer => "Integer",
            AttributeType::Decimal => "Decimal",
            AttributeType::TimeStamp => "TimeStamp",
            AttributeType::Thesaur => "Thesaur",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, typed, possibly multi-valued custom field.
///
/// Serialized with the remote service's names (`Name`, `Type`, `Values`) so a
/// list of these is sent as-is in `ListAttr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    #[schemars(description = "Attribute name as defined by the folder/document type")]
    pub name: String,
    #[serde(rename = "Type")]
    #[schemars(description = "Attribute data type")]
    pub kind: AttributeType,
    #[serde(default, deserialize_with = "values_as_text")]
    #[schemars(with = "Vec<String>", description = "Attribute values (strings)")]
    pub values: Vec<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeType, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }
}

fn values_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter(|v| !v.is_null())
        .map(scalar_text)
        .collect())
}

/// String form of a JSON scalar: strings unquoted, everything else as JSON text
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read `field` from a record regardless of how the remote service shaped it.
///
/// Single-record responses are flat objects; list and search responses wrap
/// every field, fixed ones included, in an `Attrs` array. Lookup order is the
/// direct key (null counts as absent), then `Attrs`, then `ListAttr`, then `default`.
pub fn extract(record: &Value, field: &str, default: &str) -> String {
    let Some(obj) = record.as_object() else {
        return default.to_string();
    };

    if let Some(value) = obj.get(field).filter(|v| !v.is_null()) {
        return scalar_text(value);
    }

    for key in ["Attrs", "ListAttr"] {
        let Some(entries) = obj.get(key).and_then(Value::as_array) else {
            continue;
        };
        let found = entries
            .iter()
            .find(|entry| entry.get("Name").and_then(Value::as_str) == Some(field));
        if let Some(entry) = found {
            return entry
                .get("Values")
                .and_then(Value::as_array)
                .and_then(|values| values.first())
                .filter(|v| !v.is_null())
                .map(scalar_text)
                .unwrap_or_else(|| default.to_string());
        }
    }

    default.to_string()
}

/// Raw `ListAttr` entries of a record (empty when absent)
pub fn list_attr(record: &Value) -> &[Value] {
    record
        .get("ListAttr")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Display form of one `ListAttr` entry as the remote service sent it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSummary {
    pub name: String,
    pub kind: String,
    pub values: String,
}

/// Every custom attribute declared on a record, including entries with a
/// missing or unrecognised `Type`
pub fn custom_attributes(record: &Value) -> Vec<AttributeSummary> {
    list_attr(record)
        .iter()
        .map(|entry| {
            let text = |key: &str| {
                entry
                    .get(key)
                    .filter(|v| !v.is_null())
                    .map(scalar_text)
                    .unwrap_or_else(|| "Unknown".to_string())
            };
            let values = entry
                .get("Values")
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .filter(|v| !v.is_null())
                        .map(scalar_text)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            AttributeSummary {
                name: text("Name"),
                kind: text("Type"),
                values,
            }
        })
        .collect()
}
