// ABOUTME: Integration tests for the chat route and orchestrator
// ABOUTME: Fallback policy, persona assembly against a stub model, and the tool loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{
    default_context, spawn_app, spawn_model_stub, test_context, token_for, StubModelMode,
    TestContextOptions, ALLOWED_EMAIL,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use training_chef::constants::messages::CHAT_UNAVAILABLE;
use training_chef::mcp::ToolServer;
use training_chef::tools::ToolRegistry;

fn chat_request(token: &str, message: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/chat?message={message}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn save_profile(ctx: &common::TestContext, token: &str) {
    let body = json!({
        "weight_kg": 72.5,
        "height_cm": 181.0,
        "ftp": 260,
        "body_type": "mesomorph"
    });
    let response = ctx
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/profile")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_without_api_key_returns_fallback_with_200() {
    let ctx = test_context(TestContextOptions {
        gemini_api_key: None,
        ..TestContextOptions::default()
    })
    .await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(chat_request(&token, "hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["response"], CHAT_UNAVAILABLE);
}

#[tokio::test]
async fn chat_with_unreachable_model_returns_fallback_with_200() {
    // Default context points the model at a dead port.
    let ctx = default_context().await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(chat_request(&token, "hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["response"], CHAT_UNAVAILABLE);
}

#[tokio::test]
async fn chat_returns_model_text() {
    let (model_url, _stub) = spawn_model_stub(StubModelMode::Text).await;
    let ctx = test_context(TestContextOptions {
        gemini_base_url: Some(model_url),
        ..TestContextOptions::default()
    })
    .await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(chat_request(&token, "what%20should%20I%20eat"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await["response"],
        "Fuel with rice and keep the cadence high."
    );
}

#[tokio::test]
async fn persona_embeds_stored_profile() {
    let (model_url, stub) = spawn_model_stub(StubModelMode::Text).await;
    let ctx = test_context(TestContextOptions {
        gemini_base_url: Some(model_url),
        ..TestContextOptions::default()
    })
    .await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");
    save_profile(&ctx, &token).await;

    let response = ctx
        .router()
        .oneshot(chat_request(&token, "plan%20my%20week"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let seen = stub.last_request.lock().unwrap().clone().unwrap();
    let persona = seen["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(persona.contains("mesomorph"));
    assert!(persona.contains("72.5 kg"));
    assert!(persona.contains("260 watts"));
}

#[tokio::test]
async fn persona_without_profile_is_generic() {
    let (model_url, stub) = spawn_model_stub(StubModelMode::Text).await;
    let ctx = test_context(TestContextOptions {
        gemini_base_url: Some(model_url),
        ..TestContextOptions::default()
    })
    .await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(chat_request(&token, "hi"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let seen = stub.last_request.lock().unwrap().clone().unwrap();
    let persona = seen["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(persona.contains("not shared a profile"));
}

#[tokio::test]
async fn model_tool_calls_are_dispatched_through_the_tool_server() {
    let tool_server = ToolServer::new(ToolRegistry::with_default_tools());
    let tools_url = spawn_app(tool_server.router()).await;

    let (model_url, stub) = spawn_model_stub(StubModelMode::ToolCall).await;
    let ctx = test_context(TestContextOptions {
        gemini_base_url: Some(model_url),
        tools_server_url: Some(tools_url),
        ..TestContextOptions::default()
    })
    .await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(chat_request(&token, "how%20was%20my%20week"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let reply = read_json(response).await["response"].as_str().unwrap().to_owned();
    assert!(reply.contains("rode 150km this week"), "reply was: {reply}");

    // The model was offered the advertised tools as function declarations.
    let seen = stub.last_request.lock().unwrap().clone().unwrap();
    let declared: Vec<&str> = seen["tools"][0]["functionDeclarations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert!(declared.contains(&"get_strava_stats"));
    assert!(declared.contains(&"estimate_ride_calories"));
}

#[tokio::test]
async fn unreachable_tool_server_degrades_to_fallback() {
    let (model_url, _stub) = spawn_model_stub(StubModelMode::Text).await;
    let ctx = test_context(TestContextOptions {
        gemini_base_url: Some(model_url),
        tools_server_url: Some("http://127.0.0.1:9".to_owned()),
        ..TestContextOptions::default()
    })
    .await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(chat_request(&token, "hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["response"], CHAT_UNAVAILABLE);
}

#[tokio::test]
async fn chat_requires_auth() {
    let ctx = default_context().await;

    let response = ctx
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat?message=hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let ctx = default_context().await;
    let token = token_for(ALLOWED_EMAIL, "sub-1");

    let response = ctx
        .router()
        .oneshot(chat_request(&token, "%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
