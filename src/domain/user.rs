use serde::{Deserialize, Serialize};

/// A row of the `users` table.
///
/// Serialized as-is in the signup response, stored hash included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub hashed_password: String,
}

/// Insert payload: the storage layer assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub hashed_password: String,
}

/// Credentials body shared by signup and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
}
