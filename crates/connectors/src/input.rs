//! Boundary conversion from a resolved JSON mapping to typed connector input.
//!
//! Templates can hand a connector numbers where it wants strings and the
//! other way round; the coercion rules live here and nowhere else.

use serde_json::{Map, Number, Value};

/// Scalars are stringified, missing and `null` become `""`, containers are
/// rendered as JSON text.
pub fn string_field(input: &Map<String, Value>, key: &str) -> String {
    match input.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Like [`string_field`] but an empty result is `None`.
pub fn optional_string_field(input: &Map<String, Value>, key: &str) -> Option<String> {
    let value = string_field(input, key);
    (!value.is_empty()).then_some(value)
}

/// Numbers pass through, numeric strings are parsed, anything else is `0`.
/// Integral floats come back as integers.
pub fn number_field(input: &Map<String, Value>, key: &str) -> Number {
    match input.get(key) {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => number_from_f64(f),
            _ => n.clone(),
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(number_from_f64)
            .unwrap_or_else(|| Number::from(0)),
        _ => Number::from(0),
    }
}

/// Objects pass through, anything else is an empty mapping.
pub fn map_field(input: &Map<String, Value>, key: &str) -> Map<String, Value> {
    match input.get(key) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Unwraps an object literal; anything else becomes an empty mapping.
pub fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// Integral values stay integers so "1000" renders as 1000, not 1000.0.
fn number_from_f64(value: f64) -> Number {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Number::from(value as i64)
    } else {
        Number::from_f64(value).unwrap_or_else(|| Number::from(0))
    }
}
