//! `users` table access through a shared sqlx connection pool.
//!
//! Every call checks a connection out of the pool for the duration of one
//! statement and hands it back on drop, whether the statement succeeded or not.

use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `users` table and its username index when they are missing.
    /// Existing tables are left untouched.
    pub async fn ensure_schema(&self) -> Result<()> {
        info!("Ensuring users table exists");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                username VARCHAR NOT NULL UNIQUE,
                hashed_password VARCHAR NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS ix_users_username ON users (username)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS ix_users_id ON users (id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        hashed_password: row.try_get("hashed_password")?,
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, hashed_password
            FROM users
            WHERE username = $1
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let user = row.as_ref().map(user_from_row).transpose()?;
        debug!(found = user.is_some(), "Looked up user by username");
        Ok(user)
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    async fn insert_user(&self, new_user: NewUser) -> Result<Option<User>> {
        // A concurrent insert of the same username lands in ON CONFLICT and
        // returns no row instead of a unique-violation error.
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, hashed_password)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, hashed_password
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.hashed_password)
        .fetch_optional(&self.pool)
        .await?;

        let user = row.as_ref().map(user_from_row).transpose()?;
        match &user {
            Some(u) => debug!(user_id = u.id, "User row inserted"),
            None => debug!("Username conflict, no row inserted"),
        }
        Ok(user)
    }
}
