use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::error;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_recognition::value_objects::{ParsedContent, RawRecognitionResponse},
};

/// Unparseable content longer than this that does not end in `}` is
/// reported as truncated rather than malformed.
pub const TRUNCATION_THRESHOLD_CHARS: usize = 500;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*(.*?)\s*```").expect("fenced block pattern is valid")
});

static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```[A-Za-z0-9_-]*\s*").expect("opening fence pattern is valid")
});

/// Removes Markdown code fences the model may wrap its JSON in.
pub fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();

    if let Some(inner) = FENCED_BLOCK
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
    {
        return inner.as_str().trim().to_string();
    }

    // An opening fence without a closing one usually means the output was cut off.
    OPENING_FENCE.replace(trimmed, "").trim().to_string()
}

pub fn looks_truncated(text: &str) -> bool {
    text.chars().count() > TRUNCATION_THRESHOLD_CHARS && !text.trim_end().ends_with('}')
}

/// Parses the model's message content into either a decline or a raw recognition.
pub fn parse_content(content: &str) -> Result<ParsedContent, CoreError> {
    let cleaned = strip_code_fences(content);

    if cleaned.is_empty() {
        return Err(CoreError::EmptyResponse);
    }

    let parsed: Value = serde_json::from_str(&cleaned).map_err(|e| {
        if looks_truncated(&cleaned) {
            error!(
                kind = "E_TRUNCATED_RESPONSE",
                length = cleaned.len(),
                "Vision model response looks truncated"
            );
            CoreError::TruncatedResponse
        } else {
            error!(
                kind = "E_MALFORMED_RESPONSE",
                "Failed to parse vision model response: {}", e
            );
            CoreError::MalformedResponse(e.to_string())
        }
    })?;

    let Value::Object(object) = parsed else {
        error!(kind = "E_MALFORMED_RESPONSE", "Vision model response is not a JSON object");
        return Err(CoreError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    };

    match object.get("error") {
        Some(Value::Null) | None => Ok(ParsedContent::Recognition(
            RawRecognitionResponse::from_object(&object),
        )),
        Some(error) => {
            let message = match error {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            };
            let suggestion = object
                .get("suggestion")
                .and_then(Value::as_str)
                .map(str::to_string);

            Ok(ParsedContent::Declined {
                message,
                suggestion,
            })
        }
    }
}
