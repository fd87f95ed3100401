//! # Serializer
//!
//! Converts entity state to and from the JSON:API wire envelope.
//!
//! - **Creation envelope**: `{data: {type, attributes}}` with every given attribute.
//! - **Update envelope**: `{data: {id, type, attributes}}` restricted to the modified keys.
//! - **Read side**: `{id, attributes, meta?, links?, relationships?}` → [`ResourceData`],
//!   missing optional members default to empty maps.
//! - **Hash view**: [`ResourceHash`], optional members present only when non-empty.

use crate::framework::error::ResourceError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Entity state parsed from one response record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    pub id: i64,
    pub attributes: Map<String, Value>,
    pub meta: Map<String, Value>,
    pub links: Map<String, Value>,
    pub relationships: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
    #[serde(default)]
    meta: Option<Map<String, Value>>,
    #[serde(default)]
    links: Option<Map<String, Value>>,
    #[serde(default)]
    relationships: Option<Map<String, Value>>,
}

impl ResourceData {
    /// Parse one record object.
    pub fn parse(record: &Value) -> Result<Self, ResourceError> {
        if !record.is_object() {
            return Err(ResourceError::MalformedResponse(format!(
                "expected a record object, got {record}"
            )));
        }
        let raw: RawRecord = serde_json::from_value(record.clone())
            .map_err(|e| ResourceError::MalformedResponse(e.to_string()))?;
        Ok(Self {
            id: coerce_id(&raw.id)?,
            attributes: raw.attributes.unwrap_or_default(),
            meta: raw.meta.unwrap_or_default(),
            links: raw.links.unwrap_or_default(),
            relationships: raw.relationships.unwrap_or_default(),
        })
    }

    /// Parse an array of records, keeping server order.
    pub fn parse_many(data: &Value) -> Result<Vec<Self>, ResourceError> {
        match data {
            Value::Array(records) => records.iter().map(Self::parse).collect(),
            other => Err(ResourceError::MalformedResponse(format!(
                "expected an array of records, got {other}"
            ))),
        }
    }
}

/// Integers pass through, integral floats are truncated, numeric strings are parsed.
fn coerce_id(id: &Value) -> Result<i64, ResourceError> {
    let coerced = match id {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| ResourceError::InvalidId(id.to_string()))
}

/// `{"data": {"type": ..., "attributes": ...}}`
pub fn creation_envelope(resource_type: &str, attributes: Map<String, Value>) -> Value {
    json!({
        "data": {
            "type": resource_type,
            "attributes": attributes,
        }
    })
}

/// `{"data": {"id": ..., "type": ..., "attributes": ...}}`
pub fn update_envelope(id: i64, resource_type: &str, attributes: Map<String, Value>) -> Value {
    json!({
        "data": {
            "id": id,
            "type": resource_type,
            "attributes": attributes,
        }
    })
}

/// External view of an entity, for inspection and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceHash {
    pub id: i64,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub links: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub relationships: Map<String, Value>,
}
