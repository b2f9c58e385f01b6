use serde::Serialize;

/// Role attached to the single message sent to the service.
const USER_ROLE: &str = "user";

/// Separator placed between the instruction prompt and the source text.
pub(crate) const PROMPT_SEPARATOR: &str = " ";

/// A single correction request: instruction prompt followed by the text to fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRequest {
    instruction_prompt: String,
    source_text: String,
}

impl CorrectionRequest {
    /// Create a request from a prompt and the text it applies to.
    pub fn new(instruction_prompt: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            instruction_prompt: instruction_prompt.into(),
            source_text: source_text.into(),
        }
    }

    /// The instruction prompt.
    pub fn instruction_prompt(&self) -> &str {
        &self.instruction_prompt
    }

    /// The text to be corrected.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// The user message sent to the service.
    ///
    /// The source text is appended verbatim after the prompt. Nothing is
    /// escaped: the prompt itself tells the model where the text begins.
    pub fn user_message(&self) -> String {
        let mut message = String::with_capacity(
            self.instruction_prompt.len() + PROMPT_SEPARATOR.len() + self.source_text.len(),
        );
        message.push_str(&self.instruction_prompt);
        message.push_str(PROMPT_SEPARATOR);
        message.push_str(&self.source_text);
        message
    }

    pub(crate) fn to_wire(&self, model: &str, max_tokens: u32) -> MessagesRequest {
        MessagesRequest {
            model: model.to_string(),
            max_tokens,
            messages: vec![WireMessage {
                role: USER_ROLE,
                content: self.user_message(),
            }],
        }
    }
}

/// Request body of the messages endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest {
    pub(crate) model: String,
    pub(crate) max_tokens: u32,
    pub(crate) messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage {
    pub(crate) role: &'static str,
    pub(crate) content: String,
}
