use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Default)]
struct UserTable {
    rows: HashMap<String, User>,
    last_id: i32,
}

/// Process-local stand-in for the `users` table, keyed by username.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.storage.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.rows.get(username).cloned();
        match &user {
            Some(u) => debug!(user_id = u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    async fn insert_user(&self, new_user: NewUser) -> Result<Option<User>> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if storage.rows.contains_key(&new_user.username) {
            debug!("Username already present, nothing inserted");
            return Ok(None);
        }

        storage.last_id += 1;
        let user = User {
            id: storage.last_id,
            username: new_user.username,
            hashed_password: new_user.hashed_password,
        };
        storage.rows.insert(user.username.clone(), user.clone());
        debug!(user_id = user.id, "User saved to memory storage");
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, hash: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            hashed_password: hash.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_user_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.insert_user(new_user("alice", "h1")).await.unwrap().unwrap();
        let second = repo.insert_user(new_user("bob", "h2")).await.unwrap().unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.username, "bob");
        assert_eq!(second.hashed_password, "h2");
    }

    #[tokio::test]
    async fn test_find_by_username_returns_inserted_user() {
        let repo = InMemoryUserRepository::new();
        let inserted = repo.insert_user(new_user("carol", "hash")).await.unwrap().unwrap();

        let found = repo.find_by_username("carol").await.unwrap();

        assert_eq!(found, Some(inserted));
    }

    #[tokio::test]
    async fn test_find_by_username_returns_none_for_unknown_user() {
        let repo = InMemoryUserRepository::new();

        let found = repo.find_by_username("nobody").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_user_rejects_duplicate_username() {
        let repo = InMemoryUserRepository::new();
        repo.insert_user(new_user("dave", "first")).await.unwrap();

        let duplicate = repo.insert_user(new_user("dave", "second")).await.unwrap();

        assert!(duplicate.is_none());
        assert_eq!(repo.count().await, 1);
        let stored = repo.find_by_username("dave").await.unwrap().unwrap();
        assert_eq!(stored.hashed_password, "first");
    }

    #[tokio::test]
    async fn test_find_by_username_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.insert_user(new_user("Erin", "hash")).await.unwrap();

        assert!(repo.find_by_username("Erin").await.unwrap().is_some());
        assert!(repo.find_by_username("erin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_of_same_username_store_one_row() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                let user = new_user("racer", &format!("hash{}", i));
                tokio::spawn(async move { repo_clone.insert_user(user).await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(repo.count().await, 1);
    }
}
