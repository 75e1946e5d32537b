// ABOUTME: MCP tool server with SSE session transport
// ABOUTME: Sessions open an SSE stream, POST JSON-RPC to the endpoint it announces, and read responses off the stream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! The tool server.
//!
//! One session per SSE connection. The first event on the stream is an
//! `endpoint` event naming the message URL (with the session id baked
//! in); every JSON-RPC response is then delivered as a `message` event.
//! Sessions hold no state beyond their delivery channel and are removed
//! once the channel is gone. No authentication, nothing persisted.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dashmap::DashMap;
use futures_util::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::errors::{ERROR_INVALID_PARAMS, ERROR_METHOD_NOT_FOUND};
use crate::constants::service_names::TOOL_SERVER;
use crate::errors::{AppError, AppResult};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::schema::{CallToolParams, CallToolResult, InitializeResult, ListToolsResult};
use crate::tools::ToolRegistry;

/// Delivery channel for one open session
type SessionSender = mpsc::Sender<JsonRpcResponse>;

/// MCP tool server
#[derive(Clone)]
pub struct ToolServer {
    registry: Arc<ToolRegistry>,
    sessions: Arc<DashMap<String, SessionSender>>,
}

#[derive(Deserialize)]
struct MessageQuery {
    session_id: String,
}

impl ToolServer {
    /// Create a server over the given registry
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Build the axum router
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/sse", get(Self::handle_sse))
            .route("/messages", post(Self::handle_message))
            .route("/health", get(Self::handle_health))
            .with_state(self.clone())
    }

    /// Bind and serve until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn run(self, port: u16) -> AppResult<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let app = self.router().layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        info!("MCP tool server listening on {addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| AppError::internal(format!("Tool server failed: {e}")))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({ "status": "ok", "service": TOOL_SERVER }))
    }

    /// Open a session and stream responses to it
    async fn handle_sse(
        State(server): State<Self>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        let session_id = Uuid::new_v4().to_string();
        let (tx, mut rx) = mpsc::channel::<JsonRpcResponse>(32);
        server.sessions.insert(session_id.clone(), tx);
        info!(session_id = %session_id, "tool session opened");

        let sessions = Arc::clone(&server.sessions);
        let stream = async_stream::stream! {
            yield Ok(Event::default()
                .event("endpoint")
                .data(format!("/messages?session_id={session_id}")));

            while let Some(response) = rx.recv().await {
                match serde_json::to_string(&response) {
                    Ok(data) => yield Ok(Event::default().event("message").data(data)),
                    Err(e) => warn!(session_id = %session_id, error = %e, "dropping unserializable response"),
                }
            }

            sessions.remove(&session_id);
            debug!(session_id = %session_id, "tool session closed");
        };

        Sse::new(stream).keep_alive(KeepAlive::default())
    }

    /// Accept a JSON-RPC request for an open session
    async fn handle_message(
        State(server): State<Self>,
        Query(query): Query<MessageQuery>,
        Json(request): Json<JsonRpcRequest>,
    ) -> Result<Response, AppError> {
        let sender = server
            .sessions
            .get(&query.session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found("Unknown session"))?;

        debug!(session_id = %query.session_id, method = %request.method, "tool request");

        if let Some(response) = server.dispatch(request).await {
            if sender.send(response).await.is_err() {
                server.sessions.remove(&query.session_id);
                return Err(AppError::not_found("Session closed"));
            }
        }

        Ok((StatusCode::ACCEPTED, "Accepted").into_response())
    }

    /// Route a request to its handler; notifications yield no response
    async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                serde_json::to_value(InitializeResult::for_server(TOOL_SERVER)).ok()?,
            ),
            "tools/list" => {
                let result = ListToolsResult {
                    tools: self.registry.descriptors(),
                };
                JsonRpcResponse::success(id, serde_json::to_value(result).ok()?)
            }
            "tools/call" => self.dispatch_tool_call(id, request.params).await,
            other => JsonRpcResponse::error(
                id,
                ERROR_METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };

        Some(response)
    }

    /// Execute a tool call; tool failures are reported in-band with `isError`
    async fn dispatch_tool_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(p)) => p,
            Ok(None) => {
                return JsonRpcResponse::error(id, ERROR_INVALID_PARAMS, "Missing params");
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    ERROR_INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                );
            }
        };

        let result = match self.registry.get(&params.name) {
            Some(tool) => match tool.call(&params.arguments).await {
                Ok(text) => CallToolResult::success(text),
                Err(e) => CallToolResult::failure(e.to_string()),
            },
            None => CallToolResult::failure(format!("Unknown tool: {}", params.name)),
        };

        serde_json::to_value(result).map_or_else(
            |e| {
                JsonRpcResponse::error(
                    id.clone(),
                    ERROR_INVALID_PARAMS,
                    format!("Unserializable result: {e}"),
                )
            },
            |value| JsonRpcResponse::success(id.clone(), value),
        )
    }
}
