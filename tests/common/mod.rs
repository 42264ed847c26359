#![allow(unused_macros)]

pub const TEST_SECRET: &str = "test-secret-key-for-story-tests";

macro_rules! setup_app {
    () => {{
        let state = ::actix_web::web::Data::new(
            ::story_share_api::presentation::handlers::AppState::in_memory(
                common::TEST_SECRET.to_string(),
                3600,
            ),
        );
        ::actix_web::test::init_service(
            ::actix_web::App::new()
                .app_data(state.clone())
                .wrap(::story_share_api::presentation::middleware::JwtAuthMiddleware::new(
                    common::TEST_SECRET,
                ))
                .wrap(::story_share_api::presentation::middleware::TimingMiddleware)
                .wrap(::story_share_api::presentation::middleware::RequestIdMiddleware)
                .configure(::story_share_api::presentation::routes::configure),
        )
        .await
    }};
}

/// Registers a user and yields `(token, user_id)`.
macro_rules! register_user {
    ($app:expr, $name:expr, $email:expr) => {{
        let req = ::actix_web::test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(::serde_json::json!({
                "name": $name,
                "email": $email,
                "password": "password123",
            }))
            .to_request();
        let resp = ::actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), ::actix_web::http::StatusCode::CREATED);
        let session: ::story_share_api::domain::user::AuthSession =
            ::actix_web::test::read_body_json(resp).await;
        (session.token, session.user.id)
    }};
}

/// Creates a story as the given user and yields the resolved story.
macro_rules! create_story {
    ($app:expr, $token:expr, $body:expr) => {{
        let req = ::actix_web::test::TestRequest::post()
            .uri("/api/stories")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json($body)
            .to_request();
        let resp = ::actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), ::actix_web::http::StatusCode::CREATED);
        let story: ::story_share_api::domain::models::StoryView =
            ::actix_web::test::read_body_json(resp).await;
        story
    }};
}
