pub mod config;
pub mod database;
pub mod groq;
pub mod logging;
pub mod security;
