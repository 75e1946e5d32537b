// ABOUTME: Integration tests for the auth gate
// ABOUTME: 401/403 behavior, allow-list case-insensitivity, and single-account semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{default_context, token_for, token_with_wrong_audience, ALLOWED_EMAIL};
use tower::ServiceExt;

fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn missing_token_is_401() {
    let ctx = default_context().await;

    let response = ctx
        .router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unverifiable_token_is_401() {
    let ctx = default_context().await;

    let response = ctx
        .router()
        .oneshot(authed_get("/api/profile", "not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_audience_is_401() {
    let ctx = default_context().await;
    let token = token_with_wrong_audience(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(authed_get("/api/profile", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verified_but_not_allow_listed_is_403() {
    let ctx = default_context().await;
    let token = token_for("stranger@example.com", "sub-stranger");

    let response = ctx
        .router()
        .oneshot(authed_get("/api/profile", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn allow_list_membership_is_case_insensitive() {
    let ctx = default_context().await;
    let token = token_for("Coach@Example.COM", "sub-1");

    let response = ctx
        .router()
        .oneshot(authed_get("/api/profile", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn first_login_creates_exactly_one_user() {
    let ctx = default_context().await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(authed_get("/api/profile", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.resources.database.count_users().await.unwrap(), 1);

    let user = ctx
        .resources
        .database
        .get_user_by_google_sub("sub-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, ALLOWED_EMAIL);
    assert_eq!(user.display_name.as_deref(), Some("Test Rider"));
}

#[tokio::test]
async fn repeat_logins_reuse_the_account() {
    let ctx = default_context().await;

    for _ in 0..3 {
        let token = token_for(ALLOWED_EMAIL, "sub-1");
        let response = ctx
            .router()
            .oneshot(authed_get("/api/profile", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Case-variant email, same subject: still the same account.
    let token = token_for("COACH@example.com", "sub-1");
    let response = ctx
        .router()
        .oneshot(authed_get("/api/profile", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(ctx.resources.database.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn welcome_and_health_need_no_auth() {
    let ctx = default_context().await;

    let response = ctx
        .router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["message"], "Welcome to the Training Chef API");

    let response = ctx
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
