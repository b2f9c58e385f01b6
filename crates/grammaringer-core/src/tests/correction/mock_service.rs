//! In-process stand-in for the correction service.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tokio::net::TcpListener;

/// A request as the mock service saw it.
#[derive(Debug, Clone)]
pub(crate) struct CapturedRequest {
    pub(crate) headers: HeaderMap,
    pub(crate) body: serde_json::Value,
}

struct MockState {
    status: StatusCode,
    body: String,
    captured: Mutex<Vec<CapturedRequest>>,
}

/// Serves one canned response for every POST to `/v1/messages`.
pub(crate) struct MockService {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockService {
    #[allow(clippy::unwrap_used)]
    pub(crate) async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let state = Arc::new(MockState {
            status,
            body: body.into(),
            captured: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/v1/messages", post(respond))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { addr, state }
    }

    /// Start a service answering 200 with an envelope around `inner`.
    pub(crate) async fn with_inner_payload(inner: &str) -> Self {
        Self::start(StatusCode::OK, envelope(inner)).await
    }

    pub(crate) fn endpoint(&self) -> String {
        format!("http://{}/v1/messages", self.addr)
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn captured(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().unwrap().clone()
    }
}

/// Wrap a model output string in a well-formed outer envelope.
pub(crate) fn envelope(inner: &str) -> String {
    serde_json::json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [ { "type": "text", "text": inner } ],
        "stop_reason": "end_turn"
    })
    .to_string()
}

async fn respond(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    state
        .captured
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(CapturedRequest { headers, body });

    (state.status, state.body.clone())
}
