//! Shared value and locale helpers.

use serde_json::{Map, Number, Value};

/// Convert a TOML value into the equivalent JSON value.
///
/// Datetimes become strings; non-finite floats become `null`.
pub fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number((*i).into()),
        toml::Value::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect::<Map<_, _>>(),
        ),
    }
}

/// The language part of a locale code (e.g. "en-US" -> "en").
pub fn locale_prefix(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}
