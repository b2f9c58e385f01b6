use serde::Serialize;

/// Transient status shown next to the editor and in the tray.
///
/// Purely informational: it never changes the four editor fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Nothing in flight.
    Idle,
    /// One or more corrections in flight.
    Correcting {
        /// Number of requests awaiting a response.
        in_flight: usize,
    },
    /// The most recent completion failed; previous results are kept.
    Failed {
        /// Short description of the failure.
        message: String,
    },
}
