use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::security::PasswordHasher;
use crate::domain::user::{NewUser, User, UserCreate};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument, trace, warn};

pub const DUPLICATE_USERNAME: &str = "Username already registered";
pub const BAD_CREDENTIALS: &str = "Incorrect username or password";

pub struct AuthService<R: UserRepository + ?Sized, H: PasswordHasher + ?Sized> {
    user_repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository + ?Sized, H: PasswordHasher + ?Sized> AuthService<R, H> {
    pub fn new(user_repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            user_repository,
            hasher,
        }
    }

    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn signup(&self, req: UserCreate) -> Result<User> {
        trace!("Starting signup");

        if self
            .user_repository
            .find_by_username(&req.username)
            .await?
            .is_some()
        {
            warn!("Username already registered");
            return Err(DomainError::Validation(DUPLICATE_USERNAME.to_string()).into());
        }

        let hashed_password = self.hasher.hash(&req.password).map_err(|e| {
            if e.is::<DomainError>() {
                warn!(error = %e, "Password rejected by hasher");
                return e;
            }
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e)).into()
        })?;

        let new_user = NewUser {
            username: req.username,
            hashed_password,
        };

        // The pre-check above can race with another signup; the insert is the
        // authoritative uniqueness check.
        let user = self
            .user_repository
            .insert_user(new_user)
            .await?
            .ok_or_else(|| {
                warn!("Username taken by a concurrent signup");
                DomainError::Validation(DUPLICATE_USERNAME.to_string())
            })?;

        info!(user_id = user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    /// Checks the credentials. Nothing is issued on success.
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn login(&self, req: UserCreate) -> Result<()> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_by_username(&req.username)
            .await?
            .ok_or_else(|| {
                warn!("User not found during login");
                DomainError::Unauthorized(BAD_CREDENTIALS.to_string())
            })?;

        let is_valid = self
            .hasher
            .verify(&req.password, &user.hashed_password)
            .map_err(|e| {
                error!(user_id = user.id, error = %e, "Failed to verify password");
                DomainError::Internal(format!("Failed to verify password: {}", e))
            })?;

        if !is_valid {
            warn!(user_id = user.id, "Invalid password during login");
            return Err(DomainError::Unauthorized(BAD_CREDENTIALS.to_string()).into());
        }

        info!(user_id = user.id, "Login successful");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::domain::user::NewUser;
    use crate::infrastructure::security::{BcryptHasher, PASSWORD_TOO_LONG};
    use async_trait::async_trait;

    fn credentials(username: &str, password: &str) -> UserCreate {
        UserCreate {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn service() -> (
        AuthService<InMemoryUserRepository, BcryptHasher>,
        Arc<InMemoryUserRepository>,
    ) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = AuthService::new(repo.clone(), Arc::new(BcryptHasher::new(4)));
        (service, repo)
    }

    fn domain_error(err: &anyhow::Error) -> &DomainError {
        err.downcast_ref::<DomainError>().expect("domain error")
    }

    #[tokio::test]
    async fn test_signup_stores_verifiable_hash() {
        let (service, repo) = service();

        let user = service.signup(credentials("alice", "s3cret")).await.unwrap();

        assert_eq!(user.username, "alice");
        assert_ne!(user.hashed_password, "s3cret");
        let stored = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored, user);
        let hasher = BcryptHasher::new(4);
        assert!(hasher.verify("s3cret", &stored.hashed_password).unwrap());
        assert!(!hasher.verify("s3cret!", &stored.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn test_signup_duplicate_username_is_validation_error() {
        let (service, repo) = service();
        service.signup(credentials("bob", "first")).await.unwrap();

        let err = service.signup(credentials("bob", "second")).await.unwrap_err();

        assert!(matches!(
            domain_error(&err),
            DomainError::Validation(msg) if msg == DUPLICATE_USERNAME
        ));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_signup_password_over_72_bytes_is_validation_error() {
        let (service, repo) = service();
        let long = "x".repeat(73);

        let err = service.signup(credentials("grace", &long)).await.unwrap_err();

        assert!(matches!(
            domain_error(&err),
            DomainError::Validation(msg) if msg == PASSWORD_TOO_LONG
        ));
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_login_with_correct_password() {
        let (service, _) = service();
        service.signup(credentials("carol", "pw")).await.unwrap();

        assert!(service.login(credentials("carol", "pw")).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_are_unauthorized() {
        let (service, _) = service();
        service.signup(credentials("dave", "pw")).await.unwrap();

        for attempt in [credentials("dave", "nope"), credentials("nobody", "pw")] {
            let err = service.login(attempt).await.unwrap_err();
            assert!(matches!(
                domain_error(&err),
                DomainError::Unauthorized(msg) if msg == BAD_CREDENTIALS
            ));
        }
    }

    #[tokio::test]
    async fn test_login_with_corrupt_stored_hash_is_internal_error() {
        let (service, repo) = service();
        repo.insert_user(NewUser {
            username: "erin".to_string(),
            hashed_password: "plaintext".to_string(),
        })
        .await
        .unwrap();

        let err = service.login(credentials("erin", "plaintext")).await.unwrap_err();

        assert!(matches!(domain_error(&err), DomainError::Internal(_)));
    }

    /// Reports every username as free, so the insert is the only guard left.
    struct BlindPrecheckRepository(InMemoryUserRepository);

    #[async_trait]
    impl UserRepository for BlindPrecheckRepository {
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>> {
            Ok(None)
        }

        async fn insert_user(&self, new_user: NewUser) -> Result<Option<User>> {
            self.0.insert_user(new_user).await
        }
    }

    #[tokio::test]
    async fn test_signup_lost_race_maps_to_duplicate_username() {
        let inner = InMemoryUserRepository::new();
        let service = AuthService::new(
            Arc::new(BlindPrecheckRepository(inner.clone())),
            Arc::new(BcryptHasher::new(4)),
        );
        service.signup(credentials("frank", "a")).await.unwrap();

        let err = service.signup(credentials("frank", "b")).await.unwrap_err();

        assert!(matches!(
            domain_error(&err),
            DomainError::Validation(msg) if msg == DUPLICATE_USERNAME
        ));
        assert_eq!(inner.count().await, 1);
    }
}
