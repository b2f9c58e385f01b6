use crate::{
    AppCommand, AppResult, SubmissionStatus, SubmitOrigin, TrayCommand, TrayIconState,
    ui::EditorSnapshot,
};

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use grammaringer_core::{AppState, CoreResult, CorrectionError, CorrectionResult, TextCorrector};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::{MenuEvent, MenuId};
use uuid::Uuid;

/// Main application state and the single owner of [`AppState`].
///
/// Runs on the async runtime thread. Every write to the editor fields
/// happens inside [`handle_command`](Self::handle_command) on this loop:
/// correction tasks report back with `AppCommand::CorrectionFinished`
/// instead of touching state themselves.
///
/// # Overlapping submissions
///
/// A submit is never blocked by one already in flight. Completions are
/// applied in arrival order, so the response that arrives last decides the
/// result fields, even if its request was issued first. Each completion
/// replaces both result fields together.
pub struct App<C: TextCorrector> {
    pub(crate) state: AppState,
    pub(crate) status: SubmissionStatus,
    pub(crate) in_flight: usize,
    pub(crate) corrections_applied: u64,
    pub(crate) corrector: Arc<C>,
    pub(crate) tray_tx: std::sync::mpsc::Sender<TrayCommand>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) snapshot_tx: watch::Sender<EditorSnapshot>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) editor_url: String,
    pub(crate) editor_connections: Arc<AtomicUsize>,
    pub(crate) reveal_editor_on_hotkey: bool,
    pub(crate) open_editor_menu_id: MenuId,
    pub(crate) exit_menu_id: MenuId,
}

impl<C: TextCorrector> App<C> {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Grammaringer starting");

        // Tray event forwarding via single persistent blocking task.
        //
        // MenuEvent::receiver() is a crossbeam channel with a blocking
        // recv(). When tray_event_rx is dropped the next blocking_send()
        // fails and the forwarder exits.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    self.handle_tray_event(event).await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd) {
                        info!("Shutdown requested");
                        break;
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(std::time::Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.shutdown_tx.send(true);
        info!("Grammaringer shut down successfully");

        Ok(())
    }

    /// Apply one command. Returns `false` when the loop should stop.
    pub(crate) fn handle_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Submit { text, origin } => {
                let text = text.unwrap_or_else(|| self.state.source_text().to_string());
                self.submit(text, origin);
            }
            AppCommand::CorrectionFinished {
                request_id,
                outcome,
            } => {
                self.finish_correction(request_id, outcome);
            }
            AppCommand::EditPrompt { text } => {
                self.state.set_instruction_prompt(text);
                self.publish();
            }
            AppCommand::EditSource { text } => {
                self.state.set_source_text(text);
                self.publish();
            }
            AppCommand::Shutdown => return false,
        }

        true
    }

    /// Record `text` as the source and start a correction for it.
    ///
    /// Hotkey and manual submissions both arrive here.
    #[instrument(skip(self, text, origin), fields(origin = %origin, text_len = text.len()))]
    fn submit(&mut self, text: String, origin: SubmitOrigin) {
        let request_id = Uuid::new_v4();
        let request = self.state.begin_submission(text);

        self.in_flight += 1;
        self.set_status(SubmissionStatus::Correcting {
            in_flight: self.in_flight,
        });

        if origin == SubmitOrigin::Hotkey {
            self.reveal_editor();
        }

        let corrector = Arc::clone(&self.corrector);
        let command_tx = self.command_tx.clone();

        tokio::spawn(async move {
            let outcome = corrector
                .correct(request.instruction_prompt(), request.source_text())
                .await;

            if command_tx
                .send(AppCommand::CorrectionFinished {
                    request_id,
                    outcome,
                })
                .await
                .is_err()
            {
                debug!(request_id = %request_id, "Application loop gone, correction discarded");
            }
        });

        info!(
            request_id = %request_id,
            in_flight = self.in_flight,
            "Submission started"
        );
    }

    #[instrument(skip(self, outcome))]
    fn finish_correction(&mut self, request_id: Uuid, outcome: CoreResult<CorrectionResult>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            Ok(result) => {
                self.state.apply_correction(result);
                self.corrections_applied += 1;
                info!(request_id = %request_id, "Correction applied");

                let status = if self.in_flight == 0 {
                    SubmissionStatus::Idle
                } else {
                    SubmissionStatus::Correcting {
                        in_flight: self.in_flight,
                    }
                };
                self.set_status(status);
            }
            Err(e) => {
                error!(
                    request_id = %request_id,
                    error = ?e,
                    in_flight = self.in_flight,
                    "Correction failed, keeping previous result"
                );

                // A later arrival still decides the outcome; only the last
                // completion reports a failure.
                let status = if self.in_flight == 0 {
                    SubmissionStatus::Failed {
                        message: failure_message(&e),
                    }
                } else {
                    SubmissionStatus::Correcting {
                        in_flight: self.in_flight,
                    }
                };
                self.set_status(status);
            }
        }
    }

    /// Replace the status, update the tray if its icon changes, and publish.
    fn set_status(&mut self, status: SubmissionStatus) {
        let previous = TrayIconState::from(&self.status);
        let next = TrayIconState::from(&status);
        self.status = status;

        if previous != next {
            let _ = self.tray_tx.send(TrayCommand::SetState(next));
        }

        self.publish();
    }

    fn publish(&self) {
        // send_replace never fails, even with no editor connected.
        self.snapshot_tx
            .send_replace(
                EditorSnapshot::new(&self.state, &self.status)
                    .with_corrections(self.corrections_applied),
            );
    }

    fn reveal_editor(&self) {
        if !self.reveal_editor_on_hotkey || self.editor_connections.load(Ordering::SeqCst) > 0 {
            return;
        }

        if let Err(e) = open::that_detached(&self.editor_url) {
            warn!(error = ?e, url = %self.editor_url, "Failed to open editor");
        }
    }

    /// Handle tray menu events.
    #[instrument(skip(self))]
    async fn handle_tray_event(&mut self, event: MenuEvent) {
        let event_id = &event.id;

        if *event_id == self.open_editor_menu_id {
            match open::that_detached(&self.editor_url) {
                Ok(()) => info!("Opened editor"),
                Err(e) => warn!(error = ?e, "Failed to open editor"),
            }
        } else if *event_id == self.exit_menu_id {
            info!("Exit requested from tray menu");
            let _ = self.tray_tx.send(TrayCommand::Shutdown);
            if let Err(e) = self.command_tx.send(AppCommand::Shutdown).await {
                error!(error = ?e, "Failed to send shutdown command");
            }
        }
    }
}

/// One-line description for the status indicator.
pub(crate) fn failure_message(error: &CorrectionError) -> String {
    match error {
        CorrectionError::MissingApiKey { .. } => {
            "No API key configured (set ANTHROPIC_API_KEY)".to_string()
        }
        CorrectionError::ClientInit { .. } => "HTTP client unavailable".to_string(),
        CorrectionError::TransportOrEnvelope {
            status: Some(status),
            ..
        } => format!("Correction service returned HTTP {}", status),
        CorrectionError::TransportOrEnvelope { .. } => {
            "Could not get a response from the correction service".to_string()
        }
        CorrectionError::MalformedInnerPayload { .. } => {
            "The model reply was not in the expected format".to_string()
        }
    }
}
