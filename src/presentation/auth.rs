use crate::domain::user::{CreateUser, LoginRequest};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::{error, info, instrument};

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let session = state
        .auth_service
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = %session.user.id, "User registered successfully");
    Ok(HttpResponse::Created().json(session))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let session = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to login");
            ApiError::from(e)
        })?;

    info!(user_id = %session.user.id, "Login successful");
    Ok(HttpResponse::Ok().json(session))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.auth_service.current_user(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
