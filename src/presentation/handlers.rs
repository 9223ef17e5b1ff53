use crate::application::auth_service::AuthService;
use crate::application::chat_service::ChatService;
use crate::domain::chat::{ChatModel, ChatRequest, ChatResponse};
use crate::domain::error::{DomainError, LlmError};
use crate::domain::repository::UserRepository;
use crate::domain::security::PasswordHasher;
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderValue, WWW_AUTHENTICATE};
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub const WELCOME_MESSAGE: &str = "Welcome to the MindEase Campus API";

pub struct AppState {
    pub auth_service: AuthService<dyn UserRepository, dyn PasswordHasher>,
    pub chat_service: ChatService<dyn ChatModel>,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        chat_model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(user_repository, hasher),
            chat_service: ChatService::new(chat_model),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    detail: &'a str,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Llm(LlmError),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Text sent to the client. Chat model failures are passed through as-is;
    /// database and internal failures are not.
    fn detail(&self) -> String {
        match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::InvalidPayload(msg) => msg.clone(),
            ApiError::Llm(err) => err.to_string(),
            ApiError::Database(_) | ApiError::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Llm(_) | ApiError::Database(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        if status.is_server_error() {
            error!(error = %error_msg, status = %status, "Request failed");
        } else {
            warn!(error = %error_msg, status = %status, "Request rejected");
        }

        let detail = self.detail();
        let mut response = HttpResponse::build(status);
        if let ApiError::Unauthorized(_) = self {
            response.insert_header((WWW_AUTHENTICATE, HeaderValue::from_static("Bearer")));
        }
        response.json(ErrorResponse { detail: &detail })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Llm(err) => ApiError::Llm(err),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(other) => ApiError::Database(format!("{:#}", other)),
        }
    }
}

#[instrument]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: WELCOME_MESSAGE,
    })
}

#[instrument(skip(state, req))]
pub async fn chatbot(
    state: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(text_len = req.text.len(), "Chatbot request received");

    let response = state.chat_service.reply(req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ChatResponse { response }))
}
