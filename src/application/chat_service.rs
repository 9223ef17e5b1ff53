use crate::domain::chat::{ChatModel, ChatPrompt, ChatRequest};
use crate::domain::error::DomainError;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub const EMPTY_TEXT: &str = "Text is required";

/// Forwards one message to the chat model. Stateless between calls.
pub struct ChatService<M: ChatModel + ?Sized> {
    model: Arc<M>,
}

impl<M: ChatModel + ?Sized> ChatService<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    #[instrument(skip(self, req), fields(text_len = req.text.len()))]
    pub async fn reply(&self, req: ChatRequest) -> Result<String> {
        if req.text.is_empty() {
            return Err(DomainError::Validation(EMPTY_TEXT.to_string()).into());
        }

        let prompt = ChatPrompt::from_text(req.text);
        let content = self.model.complete(&prompt).await.map_err(|e| {
            error!(error = %e, "Chat model call failed");
            DomainError::Llm(e)
        })?;

        info!(response_len = content.len(), "Chat reply generated");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::Role;
    use crate::domain::error::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingModel {
        prompts: Mutex<Vec<ChatPrompt>>,
        failure: Option<LlmError>,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn complete(&self, prompt: &ChatPrompt) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(format!("echo: {}", prompt.messages()[1].content)),
            }
        }
    }

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_reply_returns_model_content_unchanged() {
        let model = Arc::new(RecordingModel::default());
        let service = ChatService::new(model.clone());

        let reply = service.reply(request("How do I sleep better?")).await.unwrap();

        assert_eq!(reply, "echo: How do I sleep better?");
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].messages()[0].role, Role::System);
        assert_eq!(prompts[0].messages()[1].role, Role::Human);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_without_model_call() {
        let model = Arc::new(RecordingModel::default());
        let service = ChatService::new(model.clone());

        let err = service.reply(request("")).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(msg)) if msg == EMPTY_TEXT
        ));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_text_is_forwarded() {
        let model = Arc::new(RecordingModel::default());
        let service = ChatService::new(model.clone());

        assert!(service.reply(request("  ")).await.is_ok());
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_model_failure_keeps_its_kind() {
        let model = Arc::new(RecordingModel {
            failure: Some(LlmError::Network("connection reset".to_string())),
            ..RecordingModel::default()
        });
        let service = ChatService::new(model);

        let err = service.reply(request("hi")).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Llm(LlmError::Network(msg))) if msg == "connection reset"
        ));
    }
}
