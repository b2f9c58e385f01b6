use grammaringer_core::{CoreResult, CorrectionResult};

use std::fmt;

use uuid::Uuid;

/// Where a submission came from. Both origins run the same code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOrigin {
    /// Captured by the global hotkey.
    Hotkey,
    /// Submit button in the editor.
    Manual,
}

impl fmt::Display for SubmitOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOrigin::Hotkey => f.write_str("hotkey"),
            SubmitOrigin::Manual => f.write_str("manual"),
        }
    }
}

/// Commands processed by the application loop, the sole owner of `AppState`.
#[derive(Debug)]
pub enum AppCommand {
    /// Correct `text`, or the current source field when `None`.
    Submit {
        /// Captured text; `None` reads the source field.
        text: Option<String>,
        /// Origin, for logging.
        origin: SubmitOrigin,
    },
    /// A correction task finished. Sent by the task back to the loop.
    CorrectionFinished {
        /// Id assigned when the submission started.
        request_id: Uuid,
        /// Outcome of the single correction attempt.
        outcome: CoreResult<CorrectionResult>,
    },
    /// User edited the prompt field.
    EditPrompt {
        /// New prompt text.
        text: String,
    },
    /// User edited the source field.
    EditSource {
        /// New source text.
        text: String,
    },
    /// Request application shutdown.
    Shutdown,
}
