use crate::domain::error::DomainError;
use crate::domain::models::{Story, StoryFilter};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

/// In-place edit applied to a single story document under the store's write lock.
pub type StoryMutation = Box<dyn FnOnce(&mut Story) -> Result<(), DomainError> + Send>;

#[async_trait]
pub trait StoryRepository: Send + Sync {
    async fn insert(&self, story: Story) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Story>>;
    /// Newest first.
    async fn list(&self, filter: &StoryFilter) -> Result<Vec<Story>>;
    /// Atomic read-modify-write. A failed mutation leaves the stored story untouched.
    async fn modify(&self, id: &str, mutation: StoryMutation) -> Result<Story>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>>;
}
