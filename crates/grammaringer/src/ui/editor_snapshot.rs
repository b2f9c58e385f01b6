use crate::SubmissionStatus;

use grammaringer_core::AppState;
use serde::Serialize;

/// Everything the editor page renders, published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorSnapshot {
    /// The four editor fields.
    #[serde(flatten)]
    pub state: AppState,
    /// Transient status line.
    pub status: SubmissionStatus,
    /// Number of corrections applied so far. The page replaces its result
    /// and comments regions only when this changes.
    pub corrections_applied: u64,
}

impl EditorSnapshot {
    /// Snapshot of `state` with the given status.
    pub fn new(state: &AppState, status: &SubmissionStatus) -> Self {
        Self {
            state: state.clone(),
            status: status.clone(),
            corrections_applied: 0,
        }
    }

    /// Tag the snapshot with the number of corrections applied.
    pub fn with_corrections(mut self, corrections_applied: u64) -> Self {
        self.corrections_applied = corrections_applied;
        self
    }
}
