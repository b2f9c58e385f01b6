use crate::{
    CorrectionClient, CorrectionError, ServiceSettings, TextCorrector,
    tests::correction::mock_service::MockService,
};

use std::time::Duration;

use axum::http::StatusCode;

fn client_for(service: &MockService) -> CorrectionClient {
    client_with_key(service, Some("test-key"))
}

#[allow(clippy::unwrap_used)]
fn client_with_key(service: &MockService, api_key: Option<&str>) -> CorrectionClient {
    CorrectionClient::new(ServiceSettings {
        endpoint: service.endpoint(),
        api_key: api_key.map(str::to_string),
        timeout: Duration::from_secs(5),
        ..ServiceSettings::default()
    })
    .unwrap()
}

/// WHAT: Well-formed response yields the inner strings unchanged
/// WHY: The reference grammar example must round-trip through both JSON layers
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_well_formed_response_when_correcting_then_result_matches_inner_payload() {
    // Given: A service answering with the reference correction
    let service = MockService::with_inner_payload(
        r#"{"result":"He goes to the store.","comments":"Fixed subject-verb agreement."}"#,
    )
    .await;
    let client = client_for(&service);

    // When: Correcting the reference sentence
    let result = client.correct("Fix grammar.", "He go to store.").await.unwrap();

    // Then: Fields equal the inner payload strings
    assert_eq!(result.corrected_text, "He goes to the store.");
    assert_eq!(result.change_summary, "Fixed subject-verb agreement.");
}

/// WHAT: Request carries the required headers and body shape
/// WHY: The service rejects requests without credential and version headers
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_prompt_and_text_when_correcting_then_request_is_well_formed() {
    // Given: A recording service
    let service =
        MockService::with_inner_payload(r#"{"result":"ok","comments":"none"}"#).await;
    let client = client_for(&service);

    // When: Correcting
    client.correct("Fix grammar.", "He go to store.").await.unwrap();

    // Then: Exactly one request with the expected headers and body
    let captured = service.captured();
    assert_eq!(captured.len(), 1);
    let request = &captured[0];

    assert_eq!(request.headers["x-api-key"], "test-key");
    assert_eq!(request.headers["anthropic-version"], "2023-06-01");
    assert_eq!(request.headers["content-type"], "application/json");

    assert_eq!(request.body["model"], "claude-3-5-sonnet-20241022");
    assert_eq!(request.body["max_tokens"], 1024);
    let messages = request.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Fix grammar. He go to store.");
}

/// WHAT: Empty source text still produces a complete request
/// WHY: An empty clipboard submits "" and must not short-circuit
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_empty_text_when_correcting_then_prompt_and_separator_are_sent() {
    // Given: A recording service
    let service = MockService::with_inner_payload(r#"{"result":"","comments":""}"#).await;
    let client = client_for(&service);

    // When: Correcting an empty string
    let result = client.correct("Fix grammar.", "").await.unwrap();

    // Then: The message is the prompt plus a single space
    let captured = service.captured();
    assert_eq!(captured[0].body["messages"][0]["content"], "Fix grammar. ");
    assert_eq!(result.corrected_text, "");
}

/// WHAT: Non-200 status maps to TransportOrEnvelope with the status code
/// WHY: Auth and rate-limit failures must not be mistaken for bad payloads
#[tokio::test]
async fn given_unauthorized_status_when_correcting_then_transport_error_with_status() {
    // Given: A service rejecting the credential
    let service = MockService::start(
        StatusCode::UNAUTHORIZED,
        r#"{"type":"error","error":{"type":"authentication_error"}}"#,
    )
    .await;
    let client = client_for(&service);

    // When: Correcting
    let result = client.correct("Fix grammar.", "text").await;

    // Then: TransportOrEnvelope carrying 401
    assert!(matches!(
        result,
        Err(CorrectionError::TransportOrEnvelope {
            status: Some(401),
            ..
        })
    ));
}

/// WHAT: Missing content array maps to TransportOrEnvelope
/// WHY: The outer envelope is validated before the model output is read
#[tokio::test]
async fn given_response_without_content_when_correcting_then_transport_or_envelope() {
    // Given: A 200 response with no content list
    let service = MockService::start(StatusCode::OK, r#"{"id":"msg_1"}"#).await;
    let client = client_for(&service);

    // When: Correcting
    let result = client.correct("Fix grammar.", "text").await;

    // Then: Envelope failure
    assert!(matches!(
        result,
        Err(CorrectionError::TransportOrEnvelope { .. })
    ));
}

/// WHAT: Non-JSON model output maps to MalformedInnerPayload
/// WHY: The model may ignore the requested shape; that is recoverable
#[tokio::test]
async fn given_prose_model_output_when_correcting_then_malformed_inner_payload() {
    // Given: The model answered in prose
    let service = MockService::with_inner_payload("Your text looks fine to me!").await;
    let client = client_for(&service);

    // When: Correcting
    let result = client.correct("Fix grammar.", "text").await;

    // Then: Inner payload failure
    assert!(matches!(
        result,
        Err(CorrectionError::MalformedInnerPayload { .. })
    ));
}

/// WHAT: Missing API key fails before any request is sent
/// WHY: The credential is never hardcoded and must be configured explicitly
#[tokio::test]
async fn given_blank_api_key_when_correcting_then_missing_api_key_and_no_request() {
    // Given: A client whose key is whitespace only
    let service = MockService::with_inner_payload(r#"{"result":"x","comments":"y"}"#).await;
    let client = client_with_key(&service, Some("   "));

    // When: Correcting
    let result = client.correct("Fix grammar.", "text").await;

    // Then: MissingApiKey and the service saw nothing
    assert!(matches!(result, Err(CorrectionError::MissingApiKey { .. })));
    assert!(service.captured().is_empty());
}

/// WHAT: Unreachable endpoint maps to TransportOrEnvelope without a status
/// WHY: Network failures are reported, not propagated as panics
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_unreachable_endpoint_when_correcting_then_transport_error_without_status() {
    // Given: A port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CorrectionClient::new(ServiceSettings {
        endpoint: format!("http://{}/v1/messages", addr),
        api_key: Some("test-key".to_string()),
        timeout: Duration::from_secs(2),
        ..ServiceSettings::default()
    })
    .unwrap();

    // When: Correcting
    let result = client.correct("Fix grammar.", "text").await;

    // Then: Transport failure with no HTTP status
    assert!(matches!(
        result,
        Err(CorrectionError::TransportOrEnvelope { status: None, .. })
    ));
}
