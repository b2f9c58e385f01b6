use crate::CorrectionRequest;

/// WHAT: Source text is appended after the prompt with one space
/// WHY: The prompt's last sentence marks where the text begins
#[test]
fn given_prompt_and_text_when_building_message_then_single_space_separates_them() {
    // Given: A request
    let request = CorrectionRequest::new("Fix grammar.", "He go to store.");

    // When: Building the user message
    let message = request.user_message();

    // Then: Prompt, one space, text
    assert_eq!(message, "Fix grammar. He go to store.");
}

/// WHAT: Text is not escaped or trimmed before concatenation
/// WHY: Quotes and newlines in the selection must reach the model unchanged
#[test]
fn given_text_with_quotes_and_newlines_when_building_message_then_text_is_verbatim() {
    // Given: Text with JSON-significant characters and padding
    let text = "  \"Hello\",\n  she said {x}  ";
    let request = CorrectionRequest::new("P:", text);

    // When: Building the user message
    let message = request.user_message();

    // Then: Text follows the separator byte for byte
    assert_eq!(message, format!("P: {}", text));
}

/// WHAT: Wire body has one user message and the configured budget
/// WHY: The service expects exactly this body shape
#[test]
#[allow(clippy::unwrap_used)]
fn given_request_when_serializing_wire_body_then_shape_matches_service_contract() {
    // Given: A request
    let request = CorrectionRequest::new("Fix grammar.", "");

    // When: Serializing the wire body
    let body = serde_json::to_value(request.to_wire("model-x", 1024)).unwrap();

    // Then: Expected fields
    assert_eq!(
        body,
        serde_json::json!({
            "model": "model-x",
            "max_tokens": 1024,
            "messages": [ { "role": "user", "content": "Fix grammar. " } ]
        })
    );
}
