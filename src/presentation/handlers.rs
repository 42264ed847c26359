use crate::application::auth_service::AuthService;
use crate::application::story_service::StoryService;
use crate::data::story_repository::InMemoryStoryRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::models::{AddComment, StoryFields, StoryFilter, StoryPatch};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub story_service: StoryService<InMemoryStoryRepository, InMemoryUserRepository>,
    pub auth_service: AuthService<InMemoryUserRepository>,
}

impl AppState {
    /// Both services share one user store so comment snapshots and auth see the same users.
    pub fn in_memory(jwt_secret: String, token_ttl_secs: u64) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let stories = Arc::new(InMemoryStoryRepository::new());
        Self {
            story_service: StoryService::new(stories, users.clone()),
            auth_service: AuthService::new(users, jwt_secret, token_ttl_secs),
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    // Detail is logged, never sent to the client
    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        let message = match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => {
                warn!(error = %error_msg, status = %status, "Request rejected");
                msg.clone()
            }
            ApiError::Internal(detail) => {
                error!(error = %detail, status = %status, "Internal error");
                error_msg.clone()
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_msg,
            details: serde_json::json!({ "message": message }),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Forbidden(msg)) => ApiError::Forbidden(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Internal(format!("{:#}", err)),
        }
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| ApiError::Unauthorized("User not authenticated".to_string())))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn create_story(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<StoryFields>,
) -> Result<HttpResponse, ApiError> {
    info!("Creating story");
    let story = state
        .story_service
        .create(&user.user_id, req.into_inner())
        .await?;
    info!(story_id = %story.id, "Story created successfully");
    Ok(HttpResponse::Created().json(story))
}

#[instrument(skip(state))]
pub async fn list_stories(
    state: web::Data<AppState>,
    query: web::Query<StoryFilter>,
) -> Result<HttpResponse, ApiError> {
    let stories = state.story_service.list(&query).await.map_err(|e| {
        error!(error = %e, "Failed to list stories");
        e
    })?;
    info!(count = stories.len(), "Stories listed");
    Ok(HttpResponse::Ok().json(stories))
}

#[instrument(skip(state), fields(story_id = %*path))]
pub async fn get_story(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let story = state.story_service.get(&path).await?;
    Ok(HttpResponse::Ok().json(story))
}

#[instrument(skip(state, user, req), fields(story_id = %*path, user_id = %user.user_id))]
pub async fn update_story(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<StoryPatch>,
) -> Result<HttpResponse, ApiError> {
    let story = state
        .story_service
        .update(&path, &user.user_id, req.into_inner())
        .await?;
    info!(story_id = %story.id, "Story updated successfully");
    Ok(HttpResponse::Ok().json(story))
}

#[instrument(skip(state, user), fields(story_id = %*path, user_id = %user.user_id))]
pub async fn delete_story(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state.story_service.delete(&path, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Story deleted")))
}

#[instrument(skip(state, user), fields(story_id = %*path, user_id = %user.user_id))]
pub async fn toggle_like(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let story = state
        .story_service
        .toggle_like(&path, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(story))
}

#[instrument(skip(state, user, path), fields(user_id = %user.user_id))]
pub async fn remove_like(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (story_id, target_user_id) = path.into_inner();
    info!(story_id = %story_id, target_user_id = %target_user_id, "Owner removing like");
    let story = state
        .story_service
        .remove_like(&story_id, &user.user_id, &target_user_id)
        .await?;
    Ok(HttpResponse::Ok().json(story))
}

#[instrument(skip(state, user, req), fields(story_id = %*path, user_id = %user.user_id))]
pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<AddComment>,
) -> Result<HttpResponse, ApiError> {
    let story = state
        .story_service
        .add_comment(&path, &user.user_id, &req.text)
        .await?;
    Ok(HttpResponse::Ok().json(story))
}

#[instrument(skip(state, user, path), fields(user_id = %user.user_id))]
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (story_id, comment_id) = path.into_inner();
    state
        .story_service
        .remove_comment(&story_id, &user.user_id, &comment_id)
        .await?;
    info!(story_id = %story_id, comment_id = %comment_id, "Comment deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted")))
}
