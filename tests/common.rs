// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Stub identity and model endpoints, test resources, and request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(dead_code)]

//! Shared test utilities for `training_chef`.
//!
//! The stub identity endpoint echoes whatever claims the test encodes
//! into the bearer token (as JSON), so auth scenarios need no real
//! Google. The stub Gemini endpoint records the last request body and
//! replies with canned text or a scripted function call.

use std::sync::{Arc, Mutex, Once};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

use training_chef::config::environment::{
    AuthConfig, DatabaseConfig, LlmConfig, LogFormat, ServerConfig, ToolsConfig,
};
use training_chef::server::{ChefServer, ServerResources};

/// OAuth client id every test token must carry in `aud`
pub const TEST_CLIENT_ID: &str = "test-client";

/// Allow-listed email used by most tests
pub const ALLOWED_EMAIL: &str = "coach@example.com";

/// Second allow-listed email, for multi-user scenarios
pub const OTHER_ALLOWED_EMAIL: &str = "rider@example.com";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let filter = std::env::var("TEST_LOG").unwrap_or_else(|_| "warn".to_owned());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Bind a router on an ephemeral local port and serve it in the background.
///
/// Returns the base URL, e.g. `http://127.0.0.1:49152`.
pub async fn spawn_app(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// ============================================================================
// Stub identity provider
// ============================================================================

/// Build a bearer token the stub verifier will accept: the claims JSON
/// itself, echoed back by the stub tokeninfo endpoint.
pub fn token_for(email: &str, sub: &str) -> String {
    json!({
        "aud": TEST_CLIENT_ID,
        "sub": sub,
        "email": email,
        "name": "Test Rider",
    })
    .to_string()
}

/// Token with an audience the gate must reject
pub fn token_with_wrong_audience(email: &str, sub: &str) -> String {
    json!({ "aud": "someone-else", "sub": sub, "email": email }).to_string()
}

#[derive(serde::Deserialize)]
struct TokeninfoQuery {
    #[serde(default)]
    id_token: String,
}

async fn tokeninfo_handler(Query(params): Query<TokeninfoQuery>) -> impl IntoResponse {
    serde_json::from_str::<Value>(&params.id_token).map_or_else(
        |_| (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_token"}))),
        |claims| (StatusCode::OK, Json(claims)),
    )
}

/// Spawn a stub tokeninfo endpoint; returns its URL
pub async fn spawn_identity_stub() -> String {
    let router = Router::new().route("/tokeninfo", get(tokeninfo_handler));
    let base = spawn_app(router).await;
    format!("{base}/tokeninfo")
}

// ============================================================================
// Stub Gemini endpoint
// ============================================================================

/// How the stub model behaves
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StubModelMode {
    /// Always reply with fixed text
    Text,
    /// First request a `get_strava_stats` call, then echo the tool result
    ToolCall,
}

/// Shared state of the stub model endpoint
pub struct StubModel {
    /// Last request body received, for persona/tool assertions
    pub last_request: Mutex<Option<Value>>,
    mode: StubModelMode,
}

impl StubModel {
    fn reply(&self, body: &Value) -> Value {
        let has_function_response = body["contents"]
            .as_array()
            .into_iter()
            .flatten()
            .flat_map(|c| c["parts"].as_array().into_iter().flatten())
            .any(|p| p.get("functionResponse").is_some());

        let parts = if self.mode == StubModelMode::ToolCall && !has_function_response {
            json!([{ "functionCall": { "name": "get_strava_stats", "args": { "user_id": "42" } } }])
        } else if has_function_response {
            let tool_text = body["contents"]
                .as_array()
                .into_iter()
                .flatten()
                .flat_map(|c| c["parts"].as_array().into_iter().flatten())
                .find_map(|p| p["functionResponse"]["response"]["content"].as_str())
                .unwrap_or_default()
                .to_owned();
            json!([{ "text": format!("Your week so far: {tool_text}") }])
        } else {
            json!([{ "text": "Fuel with rice and keep the cadence high." }])
        };

        json!({
            "candidates": [{ "content": { "role": "model", "parts": parts } }]
        })
    }
}

async fn stub_model_handler(
    State(stub): State<Arc<StubModel>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let reply = stub.reply(&body);
    *stub.last_request.lock().unwrap() = Some(body);
    Json(reply)
}

/// Spawn a stub Gemini endpoint; returns its base URL and shared state
pub async fn spawn_model_stub(mode: StubModelMode) -> (String, Arc<StubModel>) {
    let stub = Arc::new(StubModel {
        last_request: Mutex::new(None),
        mode,
    });
    let router = Router::new()
        .fallback(stub_model_handler)
        .with_state(Arc::clone(&stub));
    (spawn_app(router).await, stub)
}

// ============================================================================
// Test resources
// ============================================================================

/// Everything a route test needs, with the temp database kept alive
pub struct TestContext {
    pub resources: Arc<ServerResources>,
    _db_file: NamedTempFile,
}

impl TestContext {
    /// The application router under test
    pub fn router(&self) -> Router {
        ChefServer::new(Arc::clone(&self.resources)).router()
    }
}

/// Options for building test resources
pub struct TestContextOptions {
    /// Stub tokeninfo URL; created automatically when `None`
    pub tokeninfo_url: Option<String>,
    /// Gemini API key; `None` exercises the unconfigured-key fallback
    pub gemini_api_key: Option<String>,
    /// Stub Gemini base URL
    pub gemini_base_url: Option<String>,
    /// MCP tool server base URL
    pub tools_server_url: Option<String>,
}

impl Default for TestContextOptions {
    fn default() -> Self {
        Self {
            tokeninfo_url: None,
            gemini_api_key: Some("test-api-key".to_owned()),
            gemini_base_url: None,
            tools_server_url: None,
        }
    }
}

/// Build server resources against stub endpoints and a temp database
pub async fn test_context(options: TestContextOptions) -> TestContext {
    init_test_logging();

    let tokeninfo_url = match options.tokeninfo_url {
        Some(url) => url,
        None => spawn_identity_stub().await,
    };

    let db_file = NamedTempFile::new().unwrap();
    let database_url = format!("sqlite:{}", db_file.path().display());

    let config = ServerConfig {
        http_port: 0,
        database: DatabaseConfig { url: database_url },
        auth: AuthConfig {
            google_client_id: TEST_CLIENT_ID.to_owned(),
            tokeninfo_url,
            allowed_emails: ServerConfig::parse_allow_list(&format!(
                "{ALLOWED_EMAIL},{OTHER_ALLOWED_EMAIL}"
            )),
        },
        llm: LlmConfig {
            gemini_api_key: options.gemini_api_key,
            model: "gemini-2.5-flash".to_owned(),
            base_url: options
                .gemini_base_url
                .unwrap_or_else(|| "http://127.0.0.1:9".to_owned()),
        },
        tools: ToolsConfig {
            server_url: options.tools_server_url,
            port: 0,
        },
        log_format: LogFormat::Plain,
    };

    let resources = ServerResources::from_config(config).await.unwrap();
    TestContext {
        resources,
        _db_file: db_file,
    }
}

/// Shorthand for the default context
pub async fn default_context() -> TestContext {
    test_context(TestContextOptions::default()).await
}
