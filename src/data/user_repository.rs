use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn save_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        // Email is unique; checked under the write lock so concurrent saves cannot both pass.
        if storage
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            warn!("Email already taken");
            return Err(
                DomainError::Validation("User with this email already exists".to_string()).into(),
            );
        }
        debug!(user_id = %user.id, name = %user.name, "User saved to memory storage");
        storage.insert(user.id.clone(), user);
        Ok(())
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, "User found by email"),
            None => trace!(email = email, "No user with this email"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.get(id).cloned();
        if user.is_none() {
            trace!(user_id = id, "User not found in storage");
        }
        Ok(user)
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn find_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let users: Vec<User> = ids.iter().filter_map(|id| storage.get(id).cloned()).collect();
        debug!(found = users.len(), "Resolved user references");
        Ok(users)
    }
}
