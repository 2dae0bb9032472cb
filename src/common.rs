//! Lenient coercion of loosely typed JSON input.
//!
//! Client payloads and legacy store files carry ids and quantities either as
//! JSON numbers or as numeric strings. These helpers accept both.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Integer id from a JSON number or numeric string.
pub fn value_as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => str_as_id(s),
        _ => None,
    }
}

pub fn str_as_id(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// Finite number from a JSON number or numeric string.
pub fn value_as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|f| f.is_finite())
}

/// Trimmed string form of a scalar; blank strings, nulls, booleans and
/// containers yield `None`.
pub fn value_as_reference(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserialize a string field that may have been stored as a number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Deserialize an integer id that may have been stored as a numeric string.
pub fn id_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_as_id(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected integer id, got {}", value)))
}

/// Deserialize a number that may have been stored as a numeric string.
pub fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_as_number(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected number, got {}", value)))
}

/// Optional number; null, blank and non-numeric values read as `None`.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_as_number))
}
