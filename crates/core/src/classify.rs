//! Value kind detection and tagging.
//!
//! Flag definitions carry their values as untyped JSON. Only four kinds are
//! servable: booleans, strings, numbers that fit in an `i64`, and floating
//! point numbers. Everything else (null, arrays, objects, and integers that
//! only fit in a `u64`) is rejected.

use flagpress_model::{SettingType, SettingValue};
use serde_json::Value;

/// Map a value to its setting type, or `None` if it is not servable.
pub fn classify(value: &Value) -> Option<SettingType> {
    match value {
        Value::Bool(_) => Some(SettingType::Bool),
        Value::String(_) => Some(SettingType::String),
        Value::Number(n) if n.is_i64() => Some(SettingType::Int),
        Value::Number(n) if n.is_f64() => Some(SettingType::Float),
        _ => None,
    }
}

/// Wrap a value in its wire tag. `None` exactly when [`classify`] is `None`.
pub fn encode(value: &Value) -> Option<SettingValue> {
    match value {
        Value::Bool(b) => Some(SettingValue::Bool(*b)),
        Value::String(s) => Some(SettingValue::String(s.clone())),
        Value::Number(n) => match (n.as_i64(), n.is_f64()) {
            (Some(i), _) => Some(SettingValue::Int(i)),
            (None, true) => n.as_f64().map(SettingValue::Float),
            (None, false) => None,
        },
        _ => None,
    }
}

/// Short description of a value's kind for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::String(_) => "string",
        Value::Number(n) if n.is_i64() => "int",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "unsigned 64-bit integer",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
