use error_location::ErrorLocation;
use thiserror::Error;

/// Correction pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum CorrectionError {
    /// No API credential was configured for the correction service.
    #[error("No API key configured for the correction service {location}")]
    MissingApiKey {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to initialize HTTP client: {reason} {location}")]
    ClientInit {
        /// Description of the initialization failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Network failure, non-200 status, or a malformed outer envelope.
    #[error("Transport or envelope error: {reason} {location}")]
    TransportOrEnvelope {
        /// Description of what went wrong at the transport layer.
        reason: String,
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The model output did not follow the `{ result, comments }` shape.
    #[error("Malformed inner payload: {reason} {location}")]
    MalformedInnerPayload {
        /// Description of the shape violation.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CorrectionError`].
pub type Result<T> = std::result::Result<T, CorrectionError>;
