//! Router-level tests for the validation query service.

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use signupd::api::{self, store::UserStore};
use tower::ServiceExt;

fn app() -> Router {
    api::app(UserStore::seeded())
}

async fn post_json(app: Router, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, payload))
}

#[tokio::test]
async fn username_taken_matches_exactly() -> Result<()> {
    let (status, payload) = post_json(
        app(),
        "/users/username-taken",
        json!({ "username": "Omar Yehia" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload, json!({ "usernameTaken": true }));

    // Case-sensitive: a different casing is a different username.
    let (status, payload) = post_json(
        app(),
        "/users/username-taken",
        json!({ "username": "omar yehia" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload, json!({ "usernameTaken": false }));

    Ok(())
}

#[tokio::test]
async fn email_taken_checks_the_seeded_record() -> Result<()> {
    let (status, payload) =
        post_json(app(), "/users/email-taken", json!({ "email": "a@b" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload, json!({ "emailTaken": true }));

    let (_, payload) =
        post_json(app(), "/users/email-taken", json!({ "email": "free@email.com" })).await?;
    assert_eq!(payload, json!({ "emailTaken": false }));

    Ok(())
}

#[tokio::test]
async fn empty_store_has_nothing_taken() -> Result<()> {
    let app = api::app(UserStore::default());
    let (status, payload) = post_json(
        app,
        "/users/username-taken",
        json!({ "username": "Omar Yehia" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload, json!({ "usernameTaken": false }));

    Ok(())
}

#[tokio::test]
async fn missing_password_is_a_bad_request() -> Result<()> {
    let (status, payload) = post_json(app(), "/users/password-strength", json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        payload,
        json!({ "success": false, "message": "Missing password" })
    );

    // An empty string counts as missing.
    let (status, _) = post_json(
        app(),
        "/users/password-strength",
        json!({ "password": "" }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn password_strength_scores_within_range() -> Result<()> {
    for password in ["abc", "correct horse battery staple", "fAke_pAssword@123"] {
        let (status, payload) = post_json(
            app(),
            "/users/password-strength",
            json!({ "password": password }),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);

        let score = payload["score"].as_u64().expect("score should be a number");
        assert!(score <= 4, "score {score} out of range for {password:?}");
        assert!(payload["warning"].is_string());
        assert!(payload["suggestions"].is_array());
    }

    Ok(())
}

#[tokio::test]
async fn signup_appends_and_reports_the_new_record() -> Result<()> {
    let store = UserStore::seeded();
    let app = api::app(store);

    let (status, payload) = post_json(
        app.clone(),
        "/users/signup",
        json!({
            "username": "Fake Name",
            "email": "fake@email.com",
            "password": "fAke_pAssword@123",
            "tos": true,
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["message"], json!("User added successfully!"));

    let users = payload["users"].as_array().expect("users should be a list");
    assert_eq!(users.len(), 2);
    assert_eq!(users[1]["username"], json!("Fake Name"));

    // The same username is now reported as taken.
    let (_, payload) = post_json(
        app,
        "/users/username-taken",
        json!({ "username": "Fake Name" }),
    )
    .await?;
    assert_eq!(payload, json!({ "usernameTaken": true }));

    Ok(())
}

#[tokio::test]
async fn signup_does_not_enforce_uniqueness() -> Result<()> {
    let app = api::app(UserStore::seeded());

    // The mock appends unconditionally, even for the seeded username.
    let (status, payload) = post_json(
        app,
        "/users/signup",
        json!({ "username": "Omar Yehia", "email": "a@b" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["users"].as_array().map(Vec::len), Some(2));

    Ok(())
}

#[tokio::test]
async fn missing_payload_is_a_bad_request() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/username-taken")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn unmatched_route_returns_the_catch_all() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/nonexistent")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let payload: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(
        payload,
        json!({ "success": false, "message": "This route is not available" })
    );

    Ok(())
}

#[tokio::test]
async fn health_reports_build_info() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let payload: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(payload["name"], json!("signupd"));

    Ok(())
}
