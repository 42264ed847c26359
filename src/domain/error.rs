use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn story_not_found() -> Self {
        DomainError::NotFound("Story not found".to_string())
    }

    pub fn not_authorized() -> Self {
        DomainError::Forbidden("Not authorized".to_string())
    }
}
