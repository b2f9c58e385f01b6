use crate::{CoreResult, CorrectionResult};

use std::future::Future;

/// Anything that can turn a prompt and a piece of text into a correction.
///
/// [`CorrectionClient`](crate::CorrectionClient) is the production
/// implementation. The orchestrator only depends on this trait, so the wire
/// protocol can change without touching state handling.
pub trait TextCorrector: Send + Sync + 'static {
    /// Run one correction attempt. Never retries.
    fn correct(
        &self,
        prompt: &str,
        text: &str,
    ) -> impl Future<Output = CoreResult<CorrectionResult>> + Send;
}
