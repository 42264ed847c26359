use crate::presentation::auth::{login, me, register};
use crate::presentation::handlers::{
    ApiError, add_comment, create_story, delete_comment, delete_story, get_story, health_check,
    list_stories, remove_like, toggle_like, update_story,
};
use actix_web::web;

/// Mounts the whole HTTP surface under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

    cfg.app_data(json_config).app_data(query_config).service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))
            .route("/auth/me", web::get().to(me))
            .service(
                web::resource("/stories")
                    .route(web::get().to(list_stories))
                    .route(web::post().to(create_story)),
            )
            .route("/stories/like/{id}", web::put().to(toggle_like))
            .route("/stories/comment/{id}", web::post().to(add_comment))
            .route(
                "/stories/comment/{story_id}/{comment_id}",
                web::delete().to(delete_comment),
            )
            .route(
                "/stories/{story_id}/remove-like/{user_id}",
                web::put().to(remove_like),
            )
            .service(
                web::resource("/stories/{id}")
                    .route(web::get().to(get_story))
                    .route(web::put().to(update_story))
                    .route(web::delete().to(delete_story)),
            ),
    );
}
