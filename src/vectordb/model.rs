use std::collections::HashMap;

use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{ListValue, ScoredPoint, Struct, Value};
use serde_json::Map;

use super::PAYLOAD_TEXT_KEY;

/// A document queued for indexing: raw text plus arbitrary scalar metadata.
#[derive(Debug, Clone)]
pub struct DocumentPoint {
    /// Point id (UUID string).
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: Map<String, serde_json::Value>,
}

impl DocumentPoint {
    pub fn new(id: impl Into<String>, vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vector,
            text: text.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Flattens text + metadata into a Qdrant payload map.
    pub(crate) fn into_payload(self) -> (String, Vec<f32>, HashMap<String, Value>) {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert(PAYLOAD_TEXT_KEY.to_string(), self.text.into());
        for (key, value) in self.metadata {
            payload.insert(key, json_to_qdrant_value(value));
        }
        (self.id, self.vector, payload)
    }
}

/// One similarity-search result: score plus a defensively converted
/// metadata map. Raw Qdrant payload values never leak past this type.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub score: f32,
    /// Document text (payload key `text`), empty if absent.
    pub text: String,
    /// Remaining payload entries as plain JSON.
    pub metadata: Map<String, serde_json::Value>,
}

impl SearchHit {
    pub fn from_scored_point(point: ScoredPoint) -> Self {
        let mut metadata = Map::new();
        let mut text = String::new();

        for (key, value) in point.payload {
            if key == PAYLOAD_TEXT_KEY {
                if let Some(s) = value.as_str() {
                    text = s.to_string();
                }
                continue;
            }
            metadata.insert(key, qdrant_value_to_json(value));
        }

        Self {
            score: point.score,
            text,
            metadata,
        }
    }

    /// Returns the metadata string at `key`, if present.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Returns the metadata integer at `key`.
    ///
    /// Accepts both JSON numbers and numeric strings; vector-store payloads
    /// are not consistent about which they use.
    pub fn meta_i64(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Converts a Qdrant payload value to plain JSON.
pub(crate) fn qdrant_value_to_json(value: Value) -> serde_json::Value {
    match value.kind {
        Some(Kind::NullValue(_)) | None => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::from(i),
        Some(Kind::DoubleValue(d)) => {
            serde_json::Number::from_f64(d).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => serde_json::Value::Array(
            list.values.into_iter().map(qdrant_value_to_json).collect(),
        ),
        Some(Kind::StructValue(fields)) => serde_json::Value::Object(
            fields
                .fields
                .into_iter()
                .map(|(k, v)| (k, qdrant_value_to_json(v)))
                .collect(),
        ),
    }
}

/// Converts plain JSON to a Qdrant payload value.
pub(crate) fn json_to_qdrant_value(value: serde_json::Value) -> Value {
    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Kind::IntegerValue(i)
            } else {
                Kind::DoubleValue(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Kind::StringValue(s),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.into_iter().map(json_to_qdrant_value).collect(),
        }),
        serde_json::Value::Object(fields) => Kind::StructValue(Struct {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k, json_to_qdrant_value(v)))
                .collect(),
        }),
    };

    Value { kind: Some(kind) }
}
