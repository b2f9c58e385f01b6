//! Two-layer decoding of the correction service response.
//!
//! The outer envelope is the transport-level JSON returned by the service.
//! Its first content block carries the model output as a *string*, and that
//! string must itself be a JSON object with `result` and `comments` keys.

use crate::{CoreResult, CorrectionError};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const RESULT_KEY: &str = "result";
const COMMENTS_KEY: &str = "comments";

/// Corrected text and an explanation of what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionResult {
    /// The corrected version of the source text.
    pub corrected_text: String,
    /// Model-written summary of the changes.
    pub change_summary: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Extract the raw model output from the outer envelope.
#[track_caller]
pub(crate) fn parse_envelope(body: &str) -> CoreResult<String> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| CorrectionError::TransportOrEnvelope {
            reason: format!("Response body is not a content envelope: {}", e),
            status: None,
            location: ErrorLocation::from(Location::caller()),
        })?;

    let first = envelope
        .content
        .into_iter()
        .next()
        .ok_or_else(|| CorrectionError::TransportOrEnvelope {
            reason: "Envelope content list is empty".to_string(),
            status: None,
            location: ErrorLocation::from(Location::caller()),
        })?;

    first
        .text
        .ok_or_else(|| CorrectionError::TransportOrEnvelope {
            reason: "First content block has no text field".to_string(),
            status: None,
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Decode the model output into a [`CorrectionResult`].
///
/// The output must be a JSON object carrying at least one of `result` and
/// `comments`. An absent or `null` key decodes to an empty string; a key
/// holding any other non-string value is rejected.
#[track_caller]
pub(crate) fn parse_inner_payload(raw: &str) -> CoreResult<CorrectionResult> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CorrectionError::MalformedInnerPayload {
            reason: format!("Model output is not valid JSON: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let Value::Object(object) = value else {
        return Err(CorrectionError::MalformedInnerPayload {
            reason: "Model output is not a JSON object".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    if !object.contains_key(RESULT_KEY) && !object.contains_key(COMMENTS_KEY) {
        return Err(CorrectionError::MalformedInnerPayload {
            reason: format!(
                "Model output has neither \"{}\" nor \"{}\"",
                RESULT_KEY, COMMENTS_KEY
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(CorrectionResult {
        corrected_text: string_field(&object, RESULT_KEY)?,
        change_summary: string_field(&object, COMMENTS_KEY)?,
    })
}

#[track_caller]
fn string_field(object: &Map<String, Value>, key: &str) -> CoreResult<String> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Ok(String::new()),
        Some(other) => Err(CorrectionError::MalformedInnerPayload {
            reason: format!("Key \"{}\" is not a string: {}", key, other),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
