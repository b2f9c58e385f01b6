mod app_state;
mod prompt;

pub use {app_state::AppState, prompt::DEFAULT_INSTRUCTION_PROMPT};
