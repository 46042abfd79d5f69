//! Provider response parsing and validation.
//!
//! Two layers: extract the first completion's text from the chat-completions
//! envelope, then parse that text as a JSON object against the target type.
//! Only structural problems are errors - text that is not JSON, or JSON that
//! is not an object. An object with missing optional fields parses fine; the
//! serde defaults on the target types fill in empty values.

use serde::de::DeserializeOwned;

use crate::error::GenerateError;
use crate::types::GenerationResult;

/// Pull the first completion's text content out of the provider envelope.
pub fn completion_text(payload: &serde_json::Value) -> Result<&str, GenerateError> {
    payload
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .ok_or_else(|| GenerateError::Parse("no completion content in provider envelope".to_string()))
}

/// Parse the first completion as a JSON object of type `T`.
pub fn parse_completion<T: DeserializeOwned>(
    payload: &serde_json::Value,
) -> Result<T, GenerateError> {
    let text = completion_text(payload)?;

    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| GenerateError::Parse(format!("completion is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(GenerateError::Parse(
            "completion is valid JSON but not an object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| GenerateError::Parse(format!("completion does not match schema: {e}")))
}

/// Parse a taste-decoding completion.
pub fn parse_result(payload: &serde_json::Value) -> Result<GenerationResult, GenerateError> {
    parse_completion(payload)
}
