//! Configuration management for grammaringer.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, startup validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        API_KEY_ENV, BehaviourConfig, HotkeyConfig, MAX_SETTLE_DELAY_MS, MIN_SETTLE_DELAY_MS,
        PromptConfig, ServerConfig, ServiceConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use grammaringer_core::ServiceSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Correction service configuration.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Global hotkey and capture configuration.
    #[serde(default)]
    pub hotkey: HotkeyConfig,
    /// Instruction prompt configuration.
    #[serde(default)]
    pub prompt: PromptConfig,
    /// Local editor server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Application behavior settings.
    #[serde(default)]
    pub behavior: BehaviourConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load and parse a configuration file. Missing fields take defaults.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Check values that would otherwise fail later in surprising ways.
    ///
    /// The API key is deliberately not checked here: the app starts without
    /// one so the editor is usable, and each correction reports the missing
    /// credential.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        let delay = self.hotkey.settle_delay_ms;
        if !(MIN_SETTLE_DELAY_MS..=MAX_SETTLE_DELAY_MS).contains(&delay) {
            return Err(AppError::ConfigError {
                reason: format!(
                    "hotkey.settle_delay_ms must be between {} and {}, got {}",
                    MIN_SETTLE_DELAY_MS, MAX_SETTLE_DELAY_MS, delay
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.service.max_tokens == 0 {
            return Err(AppError::ConfigError {
                reason: "service.max_tokens must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.service.timeout_secs == 0 {
            return Err(AppError::ConfigError {
                reason: "service.timeout_secs must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.service.endpoint.trim().is_empty() {
            return Err(AppError::ConfigError {
                reason: "service.endpoint must not be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // The editor checks request origins against this exact port.
        if self.server.port == 0 {
            return Err(AppError::ConfigError {
                reason: "server.port must be a fixed port, not 0".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Save configuration using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Client settings with the API key resolved from the environment.
    pub fn service_settings(&self) -> ServiceSettings {
        self.service.to_settings(std::env::var(API_KEY_ENV).ok())
    }

    /// URL of the local editor.
    pub fn editor_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.server.port)
    }

    /// Directory for rolling log files, created if missing.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let log_dir = proj_dirs.data_dir().join("logs");

        if !log_dir.exists() {
            fs::create_dir_all(&log_dir)?;
        }

        Ok(log_dir)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "grammaringer", "Grammaringer").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
