use actix_web::{App, HttpServer, web};
use mindease_api::data::postgres::PgUserRepository;
use mindease_api::infrastructure::config::AppConfig;
use mindease_api::infrastructure::database::init_pool;
use mindease_api::infrastructure::groq::GroqClient;
use mindease_api::infrastructure::logging::init_logging;
use mindease_api::infrastructure::security::BcryptHasher;
use mindease_api::presentation::handlers::AppState;
use mindease_api::presentation::middleware::RequestTracing;
use mindease_api::presentation::routes::{configure, cors};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    info!(groq = ?config.groq, "Configuration loaded");
    if config.groq.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set, chatbot requests will fail");
    }

    let pool = init_pool(&config.database).await?;
    let repository = PgUserRepository::new(pool);
    repository.ensure_schema().await?;

    let chat_model = GroqClient::new(config.groq.clone())?;
    let state = web::Data::new(AppState::new(
        Arc::new(repository),
        Arc::new(BcryptHasher::new(config.bcrypt_cost)),
        Arc::new(chat_model),
    ));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors())
            .wrap(RequestTracing)
            .configure(configure)
    });

    let bind_addr = (config.server.host.as_str(), config.server.port);
    let server = server.bind(bind_addr)?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        routes = %"GET /, POST /signup/, POST /login/, POST /chatbot/",
        "Starting HTTP server"
    );
    server.run().await?;
    Ok(())
}
