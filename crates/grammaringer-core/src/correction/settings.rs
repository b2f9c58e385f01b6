use std::time::Duration;

/// Messages endpoint of the correction service.
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
/// Model used for corrections.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
/// Value of the `anthropic-version` header.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
/// Output token budget per correction.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Upper bound on a single request/response cycle.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the correction service.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Full URL of the messages endpoint.
    pub endpoint: String,
    /// Model identifier sent in every request.
    pub model: String,
    /// Maximum output tokens requested.
    pub max_tokens: u32,
    /// API version header value.
    pub api_version: String,
    /// API credential. `None` or blank fails every call with `MissingApiKey`.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceSettings {
    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
