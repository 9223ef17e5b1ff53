pub mod chat;
pub mod error;
pub mod repository;
pub mod security;
pub mod user;
