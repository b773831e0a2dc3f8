// SPDX-License-Identifier: MIT

//! Signup/login input validation tests.
//!
//! All of these reject before any database access, so they run against
//! the offline mock DB.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signup_missing_fields() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_post(
            "/api/auth/signup",
            serde_json::json!({ "email": "ana@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "missing_fields");
    let missing = body["missing_fields"].as_array().unwrap();
    assert!(missing.contains(&serde_json::json!("full_name")));
    assert!(missing.contains(&serde_json::json!("password")));
}

#[tokio::test]
async fn test_signup_short_password_blocked_before_database() {
    let (app, _) = common::create_test_app();

    // The mock DB errors on any access; a 400 here proves validation
    // happened first.
    let response = app
        .oneshot(json_post(
            "/api/auth/signup",
            serde_json::json!({
                "full_name": "Ana Souza",
                "email": "ana@example.com",
                "password": "12345"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_post(
            "/api/auth/signup",
            serde_json::json!({
                "full_name": "Ana Souza",
                "email": "not-an-email",
                "password": "123456"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_post(
            "/api/auth/login",
            serde_json::json!({ "email": "", "password": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "missing_fields");
}

#[tokio::test]
async fn test_onboarding_missing_fields_lists_each_one() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/users/onboarding")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(
                    serde_json::json!({
                        "full_name": "Ana Souza",
                        "bio": "",
                        "native_language": "portuguese"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    let missing = body["missing_fields"].as_array().unwrap();
    assert!(missing.contains(&serde_json::json!("bio")));
    assert!(missing.contains(&serde_json::json!("learning_language")));
    assert!(missing.contains(&serde_json::json!("location")));
    assert!(!missing.contains(&serde_json::json!("full_name")));
}
