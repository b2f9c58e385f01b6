use crate::config::default_template;

use serde::{Deserialize, Serialize};

/// Instruction prompt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Text seeded into the prompt field at startup.
    #[serde(default = "default_template")]
    pub template: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
        }
    }
}
