use crate::{
    CorrectionError,
    correction::response::{parse_envelope, parse_inner_payload},
    tests::correction::mock_service::envelope,
};

/// WHAT: Envelope decoding returns the first block's text verbatim
/// WHY: The inner payload is a string and must not be re-encoded
#[test]
#[allow(clippy::unwrap_used)]
fn given_envelope_with_text_block_when_parsing_then_raw_text_returned() {
    // Given: An envelope whose text contains escaped JSON
    let inner = r#"{"result":"a \"quoted\" word","comments":"none"}"#;
    let body = envelope(inner);

    // When: Parsing the envelope
    let raw = parse_envelope(&body).unwrap();

    // Then: The exact inner string comes back
    assert_eq!(raw, inner);
}

/// WHAT: Only the first content block is read
/// WHY: Later blocks are ignored by contract
#[test]
#[allow(clippy::unwrap_used)]
fn given_multiple_content_blocks_when_parsing_then_first_text_wins() {
    // Given: Two text blocks
    let body = r#"{"content":[{"type":"text","text":"first"},{"type":"text","text":"second"}]}"#;

    // When: Parsing
    let raw = parse_envelope(body).unwrap();

    // Then: The first block is used
    assert_eq!(raw, "first");
}

/// WHAT: Every outer-layer defect maps to TransportOrEnvelope
/// WHY: Callers distinguish transport faults from model misbehavior
#[test]
fn given_malformed_envelopes_when_parsing_then_transport_or_envelope() {
    // Given: Bodies missing each required piece
    let bodies = [
        r#"{"id":"msg_1"}"#,
        r#"{"content":[]}"#,
        r#"{"content":[{"type":"tool_use","id":"x"}]}"#,
        r#"{"content":[{"text":42}]}"#,
        r#"{"content":"not a list"}"#,
        "<html>Bad Gateway</html>",
        "",
    ];

    for body in bodies {
        // When: Parsing
        let result = parse_envelope(body);

        // Then: Outer-layer failure
        assert!(
            matches!(result, Err(CorrectionError::TransportOrEnvelope { .. })),
            "body {:?} should be rejected",
            body
        );
    }
}

/// WHAT: Inner payload with both keys decodes into the result fields
/// WHY: This is the shape the prompt asks the model to produce
#[test]
#[allow(clippy::unwrap_used)]
fn given_inner_object_with_both_keys_when_parsing_then_fields_populated() {
    // Given: Model output with extra whitespace and an unknown key
    let raw = "\n  {\"result\": \"Fixed.\", \"comments\": \"- typo\\n- comma\", \"extra\": 1}\n";

    // When: Parsing
    let result = parse_inner_payload(raw).unwrap();

    // Then: Both strings decoded, extra key ignored
    assert_eq!(result.corrected_text, "Fixed.");
    assert_eq!(result.change_summary, "- typo\n- comma");
}

/// WHAT: Null values decode as empty strings
/// WHY: "Nothing to comment" is a valid model answer
#[test]
#[allow(clippy::unwrap_used)]
fn given_null_comments_when_parsing_then_empty_summary() {
    // Given: Comments explicitly null
    let raw = r#"{"result":"Already fine.","comments":null}"#;

    // When: Parsing
    let result = parse_inner_payload(raw).unwrap();

    // Then: Empty summary, result kept
    assert_eq!(result.corrected_text, "Already fine.");
    assert_eq!(result.change_summary, "");
}

/// WHAT: A missing key decodes as an empty string
/// WHY: A reply with only a result is still a usable correction
#[test]
#[allow(clippy::unwrap_used)]
fn given_inner_object_missing_one_key_when_parsing_then_missing_field_empty() {
    // Given: One reply without comments and one without a result
    let only_result = r#"{"result":"He goes to the store."}"#;
    let only_comments = r#"{"comments":"Nothing to fix."}"#;

    // When: Parsing both
    let with_result = parse_inner_payload(only_result).unwrap();
    let with_comments = parse_inner_payload(only_comments).unwrap();

    // Then: The present field is kept and the absent one is empty
    assert_eq!(with_result.corrected_text, "He goes to the store.");
    assert_eq!(with_result.change_summary, "");
    assert_eq!(with_comments.corrected_text, "");
    assert_eq!(with_comments.change_summary, "Nothing to fix.");
}

/// WHAT: Every inner-layer defect maps to MalformedInnerPayload
/// WHY: Model deviations must be recoverable, never a crash
#[test]
fn given_malformed_inner_payloads_when_parsing_then_malformed_inner_payload() {
    // Given: Outputs that violate the shape
    let outputs = [
        "Looks good to me.",
        "```json\n{\"result\":\"x\",\"comments\":\"y\"}\n```",
        r#"{"answer":"neither key"}"#,
        "{}",
        r#"{"result":["x"],"comments":"y"}"#,
        r#"["result","comments"]"#,
        r#""just a string""#,
        "",
    ];

    for raw in outputs {
        // When: Parsing
        let result = parse_inner_payload(raw);

        // Then: Inner-layer failure
        assert!(
            matches!(result, Err(CorrectionError::MalformedInnerPayload { .. })),
            "output {:?} should be rejected",
            raw
        );
    }
}
