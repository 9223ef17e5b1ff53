use crate::presentation::auth::{login, signup};
use crate::presentation::handlers::{ApiError, chatbot, root};
use actix_cors::Cors;
use actix_web::web;

/// Registers every route plus the JSON body rules. Shared by `main` and the
/// HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::InvalidPayload(err.to_string()).into());

    cfg.app_data(json_config)
        .route("/", web::get().to(root))
        .service(web::resource(vec!["/signup/", "/signup"]).route(web::post().to(signup)))
        .service(web::resource(vec!["/login/", "/login"]).route(web::post().to(login)))
        .service(web::resource(vec!["/chatbot/", "/chatbot"]).route(web::post().to(chatbot)));
}

/// Any origin, method and header, credentials included.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
