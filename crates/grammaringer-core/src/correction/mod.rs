mod client;
mod corrector;
pub(crate) mod request;
pub(crate) mod response;
mod settings;

pub use {
    client::CorrectionClient,
    corrector::TextCorrector,
    request::CorrectionRequest,
    response::CorrectionResult,
    settings::{
        DEFAULT_API_VERSION, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
        DEFAULT_TIMEOUT, ServiceSettings,
    },
};
