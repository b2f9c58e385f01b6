mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod hotkey_config;
mod prompt_config;
mod server_config;
pub(crate) mod service_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, hotkey_config::HotkeyConfig,
    prompt_config::PromptConfig, server_config::ServerConfig, service_config::ServiceConfig,
};

use grammaringer_core::{
    DEFAULT_API_VERSION, DEFAULT_ENDPOINT, DEFAULT_INSTRUCTION_PROMPT, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_TIMEOUT,
};

pub(crate) const DEFAULT_CHORD: &str = "CmdOrCtrl+Shift+KeyX";
pub(crate) const DEFAULT_SETTLE_DELAY_MS: u64 = 100;
pub(crate) const MIN_SETTLE_DELAY_MS: u64 = 100;
pub(crate) const MAX_SETTLE_DELAY_MS: u64 = 500;
pub(crate) const DEFAULT_PORT: u16 = 7879;
pub(crate) const DEFAULT_REVEAL_EDITOR_ON_HOTKEY: bool = true;

/// Environment variable that overrides `service.api_key`.
pub(crate) const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

pub(crate) fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub(crate) fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

pub(crate) fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

pub(crate) fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

pub(crate) fn default_chord() -> String {
    DEFAULT_CHORD.to_string()
}

pub(crate) fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

pub(crate) fn default_template() -> String {
    DEFAULT_INSTRUCTION_PROMPT.to_string()
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_reveal_editor_on_hotkey() -> bool {
    DEFAULT_REVEAL_EDITOR_ON_HOTKEY
}
