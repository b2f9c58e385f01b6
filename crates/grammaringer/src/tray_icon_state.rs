use crate::SubmissionStatus;

/// Tray icon states mirroring the submission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready for a capture.
    Idle,
    /// Waiting on the correction service.
    Correcting,
    /// Last correction failed.
    Failed,
}

impl From<&SubmissionStatus> for TrayIconState {
    fn from(status: &SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Idle => TrayIconState::Idle,
            SubmissionStatus::Correcting { .. } => TrayIconState::Correcting,
            SubmissionStatus::Failed { .. } => TrayIconState::Failed,
        }
    }
}
