//! OpenAlex API response parsing.

use crate::error::{OpenAlexError, Result};
use crate::ids::short_id;
use crate::types::ListResponse;
use serde_json::Value;

/// Group keys are usually strings, but OpenAlex emits numbers and booleans
/// for some fields (`publication_year`, `is_oa`) and `null` for "unknown".
pub(crate) fn deserialize_group_key<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => "unknown".to_string(),
        other => other.to_string(),
    })
}

/// Parse a list (`/works?...`, `/authors?...`) response body.
pub fn parse_list_response(body: Value) -> Result<ListResponse> {
    if !body.is_object() {
        return Err(OpenAlexError::Parse(
            "expected a JSON object for a list response".to_string(),
        ));
    }
    serde_json::from_value(body)
        .map_err(|e| OpenAlexError::Parse(format!("Invalid list response: {}", e)))
}

/// Check that a single-entity response is an object and return it.
pub fn parse_entity(body: Value) -> Result<Value> {
    match body {
        Value::Object(_) => Ok(body),
        other => Err(OpenAlexError::Parse(format!(
            "expected a JSON object for an entity, got {}",
            kind_of(&other)
        ))),
    }
}

/// Short OpenAlex ID (`W123`) of an entity record.
pub fn entity_short_id(entity: &Value) -> Result<String> {
    entity
        .get("id")
        .and_then(Value::as_str)
        .map(|id| short_id(id).to_string())
        .ok_or_else(|| OpenAlexError::Parse("entity has no \"id\" field".to_string()))
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
