use crate::domain::user::UserCreate;
use crate::presentation::handlers::{ApiError, AppState, MessageResponse};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

pub const LOGIN_SUCCESS: &str = "Login successful";

/// Responds with the created row, password hash included.
#[instrument(skip(state, req), fields(username = %req.username))]
pub async fn signup(
    state: web::Data<AppState>,
    req: web::Json<UserCreate>,
) -> Result<HttpResponse, ApiError> {
    info!("Signup request received");

    let user = state.auth_service.signup(req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[instrument(skip(state, req), fields(username = %req.username))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<UserCreate>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    state.auth_service.login(req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: LOGIN_SUCCESS,
    }))
}
