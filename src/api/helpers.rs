use serde_json::{Map, Value};

use super::error::ApiError;

pub type Params = Map<String, Value>;

/// Decodes a request body into a JSON object. An empty body reads as `{}` so
/// that it fails on required fields rather than on syntax.
pub fn parse_body(body: &[u8]) -> Result<Params, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Params::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::validation("Request body must be a JSON object.")),
        Err(e) => Err(ApiError::validation(format!("Malformed JSON body: {e}"))),
    }
}

pub fn reject_unknown_fields(params: &Params, allowed: &[&str]) -> Result<(), ApiError> {
    let mut unknown: Vec<&str> = params
        .keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(ApiError::validation(format!(
        "Unknown field(s): {}.",
        unknown.join(", ")
    )))
}

/// `None` for an absent, null or empty value; an error for anything that is
/// present but not a string. The value is returned untrimmed.
pub fn optional_text(params: &Params, key: &str) -> Result<Option<String>, ApiError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ApiError::validation(format!("{key} must be a string."))),
    }
}
