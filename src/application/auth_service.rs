use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{AuthSession, CreateUser, LoginRequest, User, UserSummary};
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl_secs: u64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, token_ttl_secs: u64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl_secs,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    fn issue_session(&self, user: &User) -> Result<AuthSession> {
        let token = generate_token(&user.id, &self.jwt_secret, self.token_ttl_secs).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;
        Ok(AuthSession {
            token,
            user: UserSummary::from(user),
        })
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register_user(&self, req: CreateUser) -> Result<AuthSession> {
        trace!("Starting user registration");

        let name = req.name.trim();
        let email = req.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(DomainError::Validation("Name and email are required".to_string()).into());
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ))
            .into());
        }

        // Early exit before hashing; the store enforces uniqueness on save.
        if self.user_repository.find_user_by_email(email).await?.is_some() {
            warn!(email = %email, "User already exists");
            return Err(
                DomainError::Validation("User with this email already exists".to_string()).into(),
            );
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        self.issue_session(&user)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthSession> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_user_by_email(req.email.trim())
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::Unauthorized("Invalid email or password".to_string())
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::Unauthorized("Invalid email or password".to_string()).into());
        }

        info!(user_id = %user.id, "Login successful");
        self.issue_session(&user)
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: &str) -> Result<UserSummary> {
        let user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;
        Ok(UserSummary::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::infrastructure::security::validate_token;

    fn service() -> AuthService<InMemoryUserRepository> {
        AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            "unit-test-secret".to_string(),
            3600,
        )
    }

    fn signup(name: &str, email: &str, password: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn domain_err(err: &anyhow::Error) -> Option<&DomainError> {
        err.downcast_ref::<DomainError>()
    }

    #[tokio::test]
    async fn test_register_returns_session_for_new_user() {
        let auth = service();
        let session = auth
            .register_user(signup(" Alice ", "alice@example.com", "secret123"))
            .await
            .unwrap();

        assert_eq!(session.user.name, "Alice");
        assert_eq!(
            validate_token(&session.token, auth.jwt_secret()).unwrap(),
            session.user.id
        );
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_bad_input() {
        let auth = service();
        auth.register_user(signup("Alice", "alice@example.com", "secret123"))
            .await
            .unwrap();

        for req in [
            signup("Alice 2", "alice@example.com", "secret123"),
            signup("", "bob@example.com", "secret123"),
            signup("Bob", "bob@example.com", "123"),
        ] {
            let err = auth.register_user(req).await.unwrap_err();
            assert!(matches!(domain_err(&err), Some(DomainError::Validation(_))));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_with_same_email() {
        let auth = Arc::new(service());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let auth = auth.clone();
                tokio::spawn(async move {
                    auth.register_user(signup(
                        &format!("Racer {}", i),
                        "dup@example.com",
                        "secret123",
                    ))
                    .await
                })
            })
            .collect();

        let mut registered = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => registered += 1,
                Err(err) => {
                    assert!(matches!(domain_err(&err), Some(DomainError::Validation(_))))
                }
            }
        }
        assert_eq!(registered, 1);

        let session = auth
            .login(LoginRequest {
                email: "dup@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.user.email, "dup@example.com");
    }

    #[tokio::test]
    async fn test_login_and_current_user() {
        let auth = service();
        let registered = auth
            .register_user(signup("Carol", "carol@example.com", "hunter22"))
            .await
            .unwrap();

        let session = auth
            .login(LoginRequest {
                email: "carol@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.user, registered.user);

        let me = auth.current_user(&session.user.id).await.unwrap();
        assert_eq!(me.email, "carol@example.com");

        let err = auth
            .login(LoginRequest {
                email: "carol@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(domain_err(&err), Some(DomainError::Unauthorized(_))));
    }
}
