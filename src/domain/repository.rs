use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive match on `username`.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Inserts the row and returns it with its assigned id.
    ///
    /// Returns `Ok(None)` when the username is already taken, checked
    /// atomically with the insert.
    async fn insert_user(&self, new_user: NewUser) -> Result<Option<User>>;
}
