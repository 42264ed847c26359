#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use story_share_api::infrastructure::security::generate_token;

#[actix_web::test]
async fn test_health_check() {
    let app = setup_app!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert!(resp.headers().contains_key("x-response-time"));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_inbound_request_id_is_echoed() {
    let app = setup_app!();

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("x-request-id", "trace-abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-abc-123");
}

#[actix_web::test]
async fn test_unauthorized_access() {
    let app = setup_app!();

    let req = test::TestRequest::post()
        .uri("/api/stories")
        .set_json(serde_json::json!({ "title": "Sneaky" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["message"], "User not authenticated");
}

#[actix_web::test]
async fn test_bad_tokens_are_rejected_even_on_public_routes() {
    let app = setup_app!();
    let forged = generate_token("someone", "a-different-secret", 3600).unwrap();

    for header in [
        format!("Bearer {}", forged),
        "Bearer not.a.jwt".to_string(),
        "Token abc".to_string(),
        "Bearer ".to_string(),
    ] {
        let req = test::TestRequest::get()
            .uri("/api/stories")
            .insert_header(("Authorization", header))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key("x-request-id"));
    }
}

#[actix_web::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = setup_app!();
    let (token, _) = register_user!(app, "Json", "json@example.com");

    let req = test::TestRequest::post()
        .uri("/api/stories")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
