use crate::domain::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

/// A hosted chat-completion model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the prompt and returns the generated text unchanged.
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    /// The end user's turn. Chat-completion providers call this role `user`.
    #[serde(rename = "user")]
    Human,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The prompt sent to the chat model: a fixed system instruction followed by
/// the caller's text as the human turn. Nothing else is carried between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    messages: Vec<ChatMessage>,
}

impl ChatPrompt {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: Role::Human,
                    content: text.into(),
                },
            ],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
