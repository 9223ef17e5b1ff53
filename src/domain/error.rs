use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of a chat-completion call. All of them reach the client as a 500,
/// the split exists for logging and for callers that want to tell them apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),
    #[error("LLM network error: {0}")]
    Network(String),
    #[error("LLM provider error: {0}")]
    Provider(String),
}
