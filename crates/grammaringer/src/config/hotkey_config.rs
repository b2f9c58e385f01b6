use crate::config::{default_chord, default_settle_delay_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global hotkey and capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Chord in `global-hotkey` syntax, e.g. `CmdOrCtrl+Shift+KeyX`.
    #[serde(default = "default_chord")]
    pub chord: String,

    /// Wait between the simulated copy and the clipboard read.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            chord: default_chord(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl HotkeyConfig {
    /// Settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
