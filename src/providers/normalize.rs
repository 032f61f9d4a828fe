//! Mapping of provider-specific JSON objects onto [`Dependency`].
//!
//! Each provider describes its upstream field names with a [`FieldTable`]; the
//! functions here are the only place where the loose upstream values (strings,
//! numbers, nulls, missing keys) are turned into the strict record shape.

use super::{Dependency, FetchError, ProviderKind, UNKNOWN_VERSION};
use serde_json::{Map, Value};

/// Upstream field names for one provider, tried in order.
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    pub name: &'static [&'static str],
    pub version: &'static [&'static str],
    pub downloads: &'static [&'static str],
    pub repository: &'static [&'static str],
    pub homepage: &'static [&'static str],
}

/// The success body layouts a provider is known to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// A bare JSON array of package objects.
    Array,

    /// A bare array, or an object carrying the array under the named field.
    ArrayOrField(&'static str),
}

/// Pull the list of package objects out of a response body.
pub fn extract_entries(provider: ProviderKind, shape: BodyShape, body: Value) -> Result<Vec<Value>, FetchError> {
    match (body, shape) {
        (Value::Array(entries), _) => Ok(entries),
        (Value::Object(mut object), BodyShape::ArrayOrField(field)) => match object.remove(field) {
            Some(Value::Array(entries)) => Ok(entries),
            Some(_) => Err(FetchError::schema(provider, format!("field '{field}' is not an array"))),
            None => Err(FetchError::schema(provider, format!("expected an array or an object with a '{field}' array"))),
        },
        (other, _) => Err(FetchError::schema(provider, format!("expected an array, got {}", json_type_name(&other)))),
    }
}

/// Normalize every package object of a response, preserving upstream order.
pub fn normalize_entries(provider: ProviderKind, table: &FieldTable, entries: &[Value]) -> Result<Vec<Dependency>, FetchError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_entry(provider, table, index, entry))
        .collect()
}

/// Normalize a single package object.
pub fn normalize_entry(provider: ProviderKind, table: &FieldTable, index: usize, entry: &Value) -> Result<Dependency, FetchError> {
    let Value::Object(object) = entry else {
        return Err(FetchError::schema(
            provider,
            format!("entry {index} is {}, expected an object", json_type_name(entry)),
        ));
    };

    let name = first_text(object, table.name)
        .ok_or_else(|| FetchError::schema(provider, format!("entry {index} has no package name")))?;

    Ok(Dependency {
        name,
        version: first_text(object, table.version).unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        downloads: first_count(object, table.downloads),
        repository: first_text(object, table.repository),
        homepage: first_text(object, table.homepage),
    })
}

/// The first field that holds a non-empty string or a number, as text.
fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    })
}

/// The first field that holds a non-negative count, either as a number or as numeric text.
fn first_count(object: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(float_to_count)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| s.parse::<f64>().ok().and_then(float_to_count))
        }
        _ => None,
    })
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "value is checked to be finite and non-negative")]
fn float_to_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.round() as u64)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
