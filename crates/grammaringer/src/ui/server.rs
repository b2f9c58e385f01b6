//! Local editor served over loopback HTTP.
//!
//! The page is a thin view: every edit and submit becomes an `AppCommand`,
//! and the page re-renders from snapshots pushed over a websocket. Nothing
//! here mutates `AppState` directly.
//!
//! Snapshots carry captured selections, and a submit spends API credit, so
//! only the editor's own origin is served. Browsers let any site open a
//! websocket or send a bodiless POST to loopback; requests with a foreign
//! `Origin`, or a `Host` other than the loopback address (DNS rebinding),
//! get `403 Forbidden`.

use crate::{AppCommand, AppError, AppResult, SubmitOrigin, ui::EditorSnapshot};

use std::{
    net::{Ipv4Addr, SocketAddr},
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{
        Request, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{
        HeaderMap, StatusCode,
        header::{HOST, ORIGIN},
    },
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
};
use error_location::ErrorLocation;
use serde::Deserialize;
use tokio::{
    net::TcpListener,
    sync::{mpsc, watch},
};
use tracing::{debug, info, instrument, warn};

const EDITOR_PAGE: &str = include_str!("../../resources/editor.html");

/// Shared handles for request handlers.
#[derive(Clone)]
pub(crate) struct EditorContext {
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) snapshot_rx: watch::Receiver<EditorSnapshot>,
    /// Number of editor pages with an open websocket.
    pub(crate) connections: Arc<AtomicUsize>,
}

#[derive(Debug, Deserialize)]
struct TextBody {
    text: String,
}

/// Build the editor routes for a server listening on `port`.
pub(crate) fn router(context: EditorContext, port: u16) -> Router {
    Router::new()
        .route("/", get(editor_page))
        .route("/api/state", get(current_state))
        .route("/api/prompt", put(edit_prompt))
        .route("/api/source", put(edit_source))
        .route("/api/submit", post(submit))
        .route("/api/ws", get(snapshot_socket))
        .layer(middleware::from_fn_with_state(port, reject_foreign_requests))
        .with_state(context)
}

async fn reject_foreign_requests(
    State(port): State<u16>,
    request: Request,
    next: Next,
) -> Response {
    if is_editor_origin(request.headers(), port) {
        return next.run(request).await;
    }

    warn!(
        host = ?request.headers().get(HOST),
        origin = ?request.headers().get(ORIGIN),
        path = %request.uri().path(),
        "Rejected editor request from a foreign origin"
    );

    StatusCode::FORBIDDEN.into_response()
}

/// `Host` must name the loopback editor; `Origin`, when sent, must be the
/// editor page itself.
pub(crate) fn is_editor_origin(headers: &HeaderMap, port: u16) -> bool {
    let authorities = [format!("127.0.0.1:{}", port), format!("localhost:{}", port)];

    let host_allowed = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|host| authorities.iter().any(|authority| authority == host));

    let origin_allowed = match headers.get(ORIGIN) {
        None => true,
        Some(value) => value.to_str().ok().is_some_and(|origin| {
            origin
                .strip_prefix("http://")
                .is_some_and(|rest| authorities.iter().any(|authority| authority == rest))
        }),
    };

    host_allowed && origin_allowed
}

/// Bind to loopback and serve until shutdown is signalled.
#[instrument(skip(context, shutdown_rx))]
pub(crate) async fn serve(
    port: u16,
    context: EditorContext,
    mut shutdown_rx: watch::Receiver<bool>,
) -> AppResult<()> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::ServerError {
            reason: format!("Failed to bind {}: {}", addr, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!(%addr, "Editor server listening");

    axum::serve(listener, router(context, port))
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await
        .map_err(|e| AppError::ServerError {
            reason: format!("Editor server stopped: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("Editor server shut down");

    Ok(())
}

async fn editor_page() -> Html<&'static str> {
    Html(EDITOR_PAGE)
}

async fn current_state(State(context): State<EditorContext>) -> Json<EditorSnapshot> {
    Json(context.snapshot_rx.borrow().clone())
}

async fn edit_prompt(
    State(context): State<EditorContext>,
    Json(body): Json<TextBody>,
) -> StatusCode {
    forward(&context, AppCommand::EditPrompt { text: body.text }).await
}

async fn edit_source(
    State(context): State<EditorContext>,
    Json(body): Json<TextBody>,
) -> StatusCode {
    forward(&context, AppCommand::EditSource { text: body.text }).await
}

async fn submit(State(context): State<EditorContext>) -> StatusCode {
    forward(
        &context,
        AppCommand::Submit {
            text: None,
            origin: SubmitOrigin::Manual,
        },
    )
    .await
}

async fn forward(context: &EditorContext, command: AppCommand) -> StatusCode {
    match context.command_tx.send(command).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            warn!(error = %e, "Application loop is gone, dropping editor command");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn snapshot_socket(
    State(context): State<EditorContext>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| push_snapshots(socket, context))
        .into_response()
}

async fn push_snapshots(mut socket: WebSocket, context: EditorContext) {
    let mut snapshot_rx = context.snapshot_rx.clone();
    context.connections.fetch_add(1, Ordering::SeqCst);
    debug!("Editor connected");

    loop {
        let payload = serde_json::to_string(&*snapshot_rx.borrow_and_update());
        let payload = match payload {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize editor snapshot");
                break;
            }
        };

        if socket.send(Message::Text(payload.into())).await.is_err() {
            break;
        }

        // Wait for the next state change; incoming frames only matter as a
        // close signal.
        let open = loop {
            tokio::select! {
                changed = snapshot_rx.changed() => break changed.is_ok(),
                incoming = socket.recv() => match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break false,
                    Some(Ok(_)) => continue,
                },
            }
        };

        if !open {
            break;
        }
    }

    context.connections.fetch_sub(1, Ordering::SeqCst);
    debug!("Editor disconnected");
}
