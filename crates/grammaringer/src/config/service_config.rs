use crate::config::{
    default_api_version, default_endpoint, default_max_tokens, default_model,
    default_timeout_secs,
};

use std::time::Duration;

use grammaringer_core::ServiceSettings;
use serde::{Deserialize, Serialize};

/// Correction service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Messages endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Output token budget per correction.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// `anthropic-version` header value.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key. The `ANTHROPIC_API_KEY` environment variable takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl ServiceConfig {
    /// Build client settings, preferring a non-blank `env_api_key`.
    pub fn to_settings(&self, env_api_key: Option<String>) -> ServiceSettings {
        ServiceSettings {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            api_version: self.api_version.clone(),
            api_key: resolve_api_key(self.api_key.as_deref(), env_api_key),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Pick the credential: environment first, then the config file.
pub(crate) fn resolve_api_key(file_key: Option<&str>, env_key: Option<String>) -> Option<String> {
    env_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            file_key
                .filter(|key| !key.trim().is_empty())
                .map(str::to_string)
        })
}
