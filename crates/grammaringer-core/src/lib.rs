//! Grammaringer Core Library
//!
//! Text-correction pipeline: request construction, the two-layer response
//! decoder, and the editor state it feeds.
//!
//! # Example
//!
//! ```no_run
//! use grammaringer_core::{
//!     AppState, CoreResult, CorrectionClient, ServiceSettings, TextCorrector,
//! };
//!
//! async fn run() -> CoreResult<()> {
//!     let settings = ServiceSettings {
//!         api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
//!         ..ServiceSettings::default()
//!     };
//!     let client = CorrectionClient::new(settings)?;
//!     let mut state = AppState::new("Fix grammar.");
//!
//!     let request = state.begin_submission("He go to store.");
//!     let result = client
//!         .correct(request.instruction_prompt(), request.source_text())
//!         .await?;
//!     state.apply_correction(result);
//!
//!     println!("Corrected: {}", state.corrected_text());
//!     Ok(())
//! }
//! ```

mod correction;
mod error;
mod state;

pub use {
    correction::{
        CorrectionClient, CorrectionRequest, CorrectionResult, DEFAULT_API_VERSION,
        DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT, ServiceSettings,
        TextCorrector,
    },
    error::CorrectionError,
    error::Result as CoreResult,
    state::{AppState, DEFAULT_INSTRUCTION_PROMPT},
};

#[cfg(test)]
mod tests;
