use serde::{Serialize, Serializer};

/// Scalar attribute value read from a backend record.
///
/// Serializes to plain JSON scalars. `Bytes` has no JSON representation and
/// is emitted as a lowercase hex string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL / JSON null.
    Null,
    /// Boolean column.
    Bool(bool),
    /// Integer column (signed 64-bit).
    Int(i64),
    /// Floating-point column (64-bit IEEE 754).
    Float(f64),
    /// Text column (UTF-8).
    String(String),
    /// Binary column (BLOB / bytea).
    Bytes(Vec<u8>),
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&hex::encode(b)),
        }
    }
}

impl From<serde_json::Value> for Value {
    /// Converts a JSON value into a scalar. Arrays and objects keep their
    /// JSON text, since attributes are flat.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::String(nested.to_string())
            }
        }
    }
}

/// A single named attribute of a resolved object, as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Field name in the backend.
    pub name: String,
    /// Display name: the configured alias, or `name` when none is set.
    pub alias: String,
    /// Field value.
    pub value: Value,
}
