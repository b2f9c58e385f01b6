//! Test doubles for the correction service and the clipboard.

use crate::{
    App, AppError, AppResult, SelectionSource, SubmissionStatus, TrayCommand,
    ui::EditorSnapshot,
};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{Arc, Mutex, atomic::AtomicUsize},
    time::Duration,
};

use error_location::ErrorLocation;
use grammaringer_core::{AppState, CoreResult, CorrectionError, CorrectionResult, TextCorrector};
use tokio::sync::{mpsc, watch};
use tray_icon::menu::MenuId;

/// How the scripted service answers a given source text.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// Succeed with these result and comments strings.
    Fixed(&'static str, &'static str),
    /// Fail as if the model ignored the response shape.
    Malformed,
}

/// Answers each source text with a scripted reply after a scripted delay.
///
/// Unknown texts succeed immediately with `fixed: <text>`.
#[derive(Default)]
pub(crate) struct ScriptedCorrector {
    script: HashMap<String, (Duration, Reply)>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedCorrector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, text: &str, delay: Duration, reply: Reply) -> Self {
        self.script.insert(text.to_string(), (delay, reply));
        self
    }

    /// `(prompt, text)` pairs in call order.
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl TextCorrector for ScriptedCorrector {
    async fn correct(&self, prompt: &str, text: &str) -> CoreResult<CorrectionResult> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((prompt.to_string(), text.to_string()));

        let (delay, reply) = self
            .script
            .get(text)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::Fixed("", "")));

        tokio::time::sleep(delay).await;

        match reply {
            Reply::Fixed("", "") => Ok(CorrectionResult {
                corrected_text: format!("fixed: {}", text),
                change_summary: String::new(),
            }),
            Reply::Fixed(result, comments) => Ok(CorrectionResult {
                corrected_text: result.to_string(),
                change_summary: comments.to_string(),
            }),
            Reply::Malformed => Err(CorrectionError::MalformedInnerPayload {
                reason: "scripted".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Selection source returning canned text, or failing.
pub(crate) struct FakeSelection {
    pub(crate) text: Option<&'static str>,
}

impl SelectionSource for FakeSelection {
    fn capture_selection(&self) -> AppResult<String> {
        self.text
            .map(str::to_string)
            .ok_or_else(|| AppError::CopySimulationFailed {
                reason: "no accessibility permission".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// An app wired to test channels, plus the receivers the runtime would own.
pub(crate) struct TestApp {
    pub(crate) app: App<ScriptedCorrector>,
    pub(crate) corrector: Arc<ScriptedCorrector>,
    pub(crate) tray_rx: std::sync::mpsc::Receiver<TrayCommand>,
    pub(crate) snapshot_rx: watch::Receiver<EditorSnapshot>,
}

impl TestApp {
    pub(crate) fn new(prompt: &str, corrector: ScriptedCorrector) -> Self {
        let state = AppState::new(prompt);
        let status = SubmissionStatus::Idle;
        let corrector = Arc::new(corrector);

        let (command_tx, command_rx) = mpsc::channel(32);
        let (snapshot_tx, snapshot_rx) = watch::channel(EditorSnapshot::new(&state, &status));
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        let (tray_tx, tray_rx) = std::sync::mpsc::channel();

        let app = App {
            state,
            status,
            in_flight: 0,
            corrections_applied: 0,
            corrector: Arc::clone(&corrector),
            tray_tx,
            command_tx,
            command_rx,
            snapshot_tx,
            shutdown_tx,
            editor_url: "http://127.0.0.1:0".to_string(),
            editor_connections: Arc::new(AtomicUsize::new(0)),
            reveal_editor_on_hotkey: false,
            open_editor_menu_id: MenuId::new("open-editor"),
            exit_menu_id: MenuId::new("exit"),
        };

        Self {
            app,
            corrector,
            tray_rx,
            snapshot_rx,
        }
    }

    /// Receive the next queued command and apply it, as the run loop would.
    #[allow(clippy::unwrap_used)]
    pub(crate) async fn apply_next(&mut self) {
        let cmd = tokio::time::timeout(Duration::from_secs(5), self.app.command_rx.recv())
            .await
            .unwrap()
            .unwrap();
        self.app.handle_command(cmd);
    }

    /// Tray commands sent so far.
    pub(crate) fn tray_commands(&self) -> Vec<TrayCommand> {
        self.tray_rx.try_iter().collect()
    }
}
