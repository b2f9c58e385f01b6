use crate::config::default_reveal_editor_on_hotkey;

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Open the editor in the browser on a hotkey capture when no editor
    /// page is connected.
    #[serde(default = "default_reveal_editor_on_hotkey")]
    pub reveal_editor_on_hotkey: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            reveal_editor_on_hotkey: default_reveal_editor_on_hotkey(),
        }
    }
}
