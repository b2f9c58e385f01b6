use crate::{CorrectionRequest, CorrectionResult, DEFAULT_INSTRUCTION_PROMPT};

use serde::Serialize;

/// The four text fields behind the editor.
///
/// # Ownership
///
/// Exactly one component owns an `AppState` and applies every write. The
/// result fields change only through [`apply_correction`](Self::apply_correction),
/// which writes both at once, so a reader never observes a result paired
/// with a summary from a different response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppState {
    instruction_prompt: String,
    source_text: String,
    corrected_text: String,
    change_summary: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUCTION_PROMPT)
    }
}

impl AppState {
    /// Create an empty state seeded with the given instruction prompt.
    pub fn new(instruction_prompt: impl Into<String>) -> Self {
        Self {
            instruction_prompt: instruction_prompt.into(),
            source_text: String::new(),
            corrected_text: String::new(),
            change_summary: String::new(),
        }
    }

    /// Current instruction prompt.
    pub fn instruction_prompt(&self) -> &str {
        &self.instruction_prompt
    }

    /// Text most recently submitted or typed into the source field.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Corrected text from the last applied result.
    pub fn corrected_text(&self) -> &str {
        &self.corrected_text
    }

    /// Change summary from the last applied result.
    pub fn change_summary(&self) -> &str {
        &self.change_summary
    }

    /// User edit of the prompt field.
    pub fn set_instruction_prompt(&mut self, prompt: impl Into<String>) {
        self.instruction_prompt = prompt.into();
    }

    /// User edit of the source field.
    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
    }

    /// Record `text` as the source and build the request to send for it.
    ///
    /// The request snapshots the prompt as it is now; later prompt edits do
    /// not affect a submission already in flight.
    pub fn begin_submission(&mut self, text: impl Into<String>) -> CorrectionRequest {
        self.source_text = text.into();
        CorrectionRequest::new(self.instruction_prompt.clone(), self.source_text.clone())
    }

    /// Replace both result fields with a successful correction.
    pub fn apply_correction(&mut self, result: CorrectionResult) {
        let CorrectionResult {
            corrected_text,
            change_summary,
        } = result;
        self.corrected_text = corrected_text;
        self.change_summary = change_summary;
    }
}
