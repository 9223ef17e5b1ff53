//! Process configuration read from the environment.
//!
//! `main` loads a `.env` file first (if any), so every variable below can also
//! live there.

use anyhow::Result;
use std::str::FromStr;

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_GROQ_TEMPERATURE: f32 = 0.7;

/// Work factors bcrypt accepts.
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub groq: GroqConfig,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Pool acquire timeout in seconds
    pub connection_timeout: u64,
}

#[derive(Clone)]
pub struct GroqConfig {
    /// Missing keys are reported per chatbot request, not at startup.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            model: DEFAULT_GROQ_MODEL.to_string(),
            temperature: DEFAULT_GROQ_TEMPERATURE,
        }
    }
}

// The key never shows up in logs.
impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// # Environment Variables
    /// - `DATABASE_URL`: PostgreSQL connection URL (required)
    /// - `DATABASE_MAX_CONNECTIONS` (default: 10)
    /// - `DATABASE_MIN_CONNECTIONS` (default: 1)
    /// - `DATABASE_CONNECTION_TIMEOUT` in seconds (default: 30)
    /// - `HOST` / `PORT` (default: `0.0.0.0` / `8000`)
    /// - `GROQ_API_KEY`, `GROQ_BASE_URL`, `GROQ_MODEL`, `GROQ_TEMPERATURE`
    /// - `BCRYPT_COST` (default: `bcrypt::DEFAULT_COST`, must lie in 4..=31)
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;

        let database = DatabaseConfig {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            min_connections: env_or("DATABASE_MIN_CONNECTIONS", 1),
            connection_timeout: env_or("DATABASE_CONNECTION_TIMEOUT", 30),
        };

        let server = ServerConfig {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 8000),
        };

        let groq = GroqConfig {
            api_key: std::env::var("GROQ_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            base_url: env_or("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL.to_string()),
            model: env_or("GROQ_MODEL", DEFAULT_GROQ_MODEL.to_string()),
            temperature: env_or("GROQ_TEMPERATURE", DEFAULT_GROQ_TEMPERATURE),
        };

        let bcrypt_cost = env_or("BCRYPT_COST", bcrypt::DEFAULT_COST);
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            anyhow::bail!(
                "BCRYPT_COST must be between {} and {}, got {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end(),
                bcrypt_cost
            );
        }

        Ok(Self {
            server,
            database,
            groq,
            bcrypt_cost,
        })
    }
}
