//! Global hotkey registration and capture dispatch.
//!
//! Registers one chord for the process lifetime. Each press captures the
//! current selection and forwards it to the subscriber as a submission.

use crate::{AppCommand, AppError, AppResult, SelectionSource, SubmitOrigin};

use std::{panic::Location, str::FromStr, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

/// Listens for the registered hotkey and dispatches captured text.
pub struct HotkeyHandler<S: SelectionSource> {
    hotkey_id: u32,
    selection: Arc<S>,
    subscriber: Option<mpsc::Sender<AppCommand>>,
}

impl<S: SelectionSource> HotkeyHandler<S> {
    /// Create a handler for a previously registered hotkey.
    ///
    /// The handler has no subscriber until [`subscribe`](Self::subscribe)
    /// is called; captures made before that are dropped.
    pub fn new(hotkey_id: u32, selection: S) -> Self {
        Self {
            hotkey_id,
            selection: Arc::new(selection),
            subscriber: None,
        }
    }

    /// Deliver captured text to `command_tx` as hotkey submissions.
    pub fn subscribe(&mut self, command_tx: mpsc::Sender<AppCommand>) {
        self.subscriber = Some(command_tx);
    }

    /// Run the hotkey handler event loop until shutdown is signalled.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task that forwards hotkey events.
        // The global receiver is a crossbeam channel with a blocking recv().
        //
        // Shutdown: when event_rx is dropped, the next blocking_send() fails
        // and the forwarder exits.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.id == self.hotkey_id && matches!(event.state, HotKeyState::Pressed) {
                        if let Err(e) = self.handle_hotkey_press().await {
                            error!(error = ?e, "Hotkey capture failed");
                        }
                    }
                }
            }
        }

        drop(event_rx);

        // Best-effort join: the forwarder may be parked in recv() until the
        // next hotkey event. The runtime cleans it up on exit regardless.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Capture the selection off the async runtime, then dispatch it.
    #[instrument(skip(self))]
    pub(crate) async fn handle_hotkey_press(&self) -> AppResult<()> {
        let selection = Arc::clone(&self.selection);

        let text = tokio::task::spawn_blocking(move || selection.capture_selection())
            .await
            .map_err(|e| AppError::ClipboardError {
                reason: format!("Capture task panicked: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })??;

        if text.is_empty() {
            debug!("Clipboard empty, submitting empty text");
        }

        self.dispatch(text).await
    }

    async fn dispatch(&self, text: String) -> AppResult<()> {
        let Some(command_tx) = &self.subscriber else {
            debug!(text_len = text.len(), "No subscriber, captured text dropped");
            return Ok(());
        };

        command_tx
            .send(AppCommand::Submit {
                text: Some(text),
                origin: SubmitOrigin::Hotkey,
            })
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send Submit: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Parse `chord` and register it as the global hotkey.
///
/// Must be called on a thread with a message pump (e.g. the main thread
/// running a `tao` event loop) so that `WM_HOTKEY` messages are
/// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
/// kept alive on that thread for the hotkey to remain registered.
#[track_caller]
#[instrument]
pub(crate) fn register_hotkey(chord: &str) -> AppResult<(GlobalHotKeyManager, u32)> {
    let hotkey = parse_chord(chord)?;

    let manager =
        GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
            reason: format!("Failed to create manager: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    manager
        .register(hotkey)
        .map_err(|e| AppError::HotkeyRegistrationFailed {
            reason: format!("Failed to register {}: {}", chord, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!(hotkey = chord, "Global hotkey registered");

    Ok((manager, hotkey.id()))
}

/// Parse a chord such as `CmdOrCtrl+Shift+KeyX`.
#[track_caller]
pub(crate) fn parse_chord(chord: &str) -> AppResult<HotKey> {
    HotKey::from_str(chord).map_err(|e| AppError::HotkeyRegistrationFailed {
        reason: format!("Invalid hotkey chord {:?}: {}", chord, e),
        location: ErrorLocation::from(Location::caller()),
    })
}
