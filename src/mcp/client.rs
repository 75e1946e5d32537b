// ABOUTME: MCP session client used by the chat orchestrator
// ABOUTME: Opens the SSE stream, discovers the message endpoint, correlates responses by request id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! The tool client.
//!
//! One client per chat request: connect, handshake, list tools, dispatch
//! whatever the model asks for, and drop. Responses arrive on the SSE
//! stream, so a background reader routes them to pending requests by
//! JSON-RPC id. Every await is bounded by a timeout so an unreachable
//! tool server degrades into the chat fallback instead of hanging.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use crate::constants::defaults::TOOL_REQUEST_TIMEOUT_SECS;
use crate::constants::protocol::MCP_PROTOCOL_VERSION;
use crate::constants::service_names::API_SERVER;
use crate::errors::{AppError, AppResult};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::schema::{CallToolResult, InitializeResult, ListToolsResult, ToolDescriptor};

type PendingMap = Arc<DashMap<i64, oneshot::Sender<JsonRpcResponse>>>;

/// Connected MCP session
pub struct ToolClient {
    http: Client,
    message_url: Url,
    pending: PendingMap,
    next_id: AtomicI64,
    reader: JoinHandle<()>,
}

impl ToolClient {
    /// Connect to a tool server and complete the initialize handshake.
    ///
    /// # Errors
    ///
    /// Returns an external-service error if the SSE stream cannot be
    /// opened, the endpoint event never arrives, or the handshake fails.
    pub async fn connect(base_url: &str) -> AppResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| AppError::external_service(format!("Invalid tool server URL: {e}")))?;
        let sse_url = base
            .join("/sse")
            .map_err(|e| AppError::external_service(format!("Invalid tool server URL: {e}")))?;

        let http = Client::new();
        let response = http
            .get(sse_url)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Tool server unreachable: {e}")))?;
        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Tool server rejected session: {}",
                response.status()
            )));
        }

        let mut events = response.bytes_stream().eventsource();

        // The first real event names the per-session message endpoint.
        let endpoint = timeout(Duration::from_secs(TOOL_REQUEST_TIMEOUT_SECS), async {
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) if event.event == "endpoint" => return Some(event.data),
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "tool session stream error before endpoint");
                        return None;
                    }
                }
            }
            None
        })
        .await
        .ok()
        .flatten()
        .ok_or_else(|| AppError::external_service("Tool server sent no endpoint event"))?;

        let message_url = base
            .join(&endpoint)
            .map_err(|e| AppError::external_service(format!("Bad endpoint event: {e}")))?;
        debug!(message_url = %message_url, "tool session established");

        let pending: PendingMap = Arc::new(DashMap::new());
        let reader_pending = Arc::clone(&pending);
        let reader = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let Ok(event) = event else { break };
                if event.event != "message" {
                    continue;
                }
                match serde_json::from_str::<JsonRpcResponse>(&event.data) {
                    Ok(response) => {
                        if let Some(id) = response.id.as_i64() {
                            if let Some((_, sender)) = reader_pending.remove(&id) {
                                let _ = sender.send(response);
                            }
                        }
                    }
                    Err(e) => warn!(error = %e, "ignoring malformed tool server message"),
                }
            }
        });

        let client = Self {
            http,
            message_url,
            pending,
            next_id: AtomicI64::new(1),
            reader,
        };

        client.initialize().await?;
        Ok(client)
    }

    /// List the tools the server advertises.
    ///
    /// # Errors
    ///
    /// Returns an external-service error on transport or protocol failure.
    pub async fn list_tools(&self) -> AppResult<Vec<ToolDescriptor>> {
        let result = self.request("tools/list", None).await?;
        let listed: ListToolsResult = serde_json::from_value(result)
            .map_err(|e| AppError::external_service(format!("Malformed tools/list result: {e}")))?;
        Ok(listed.tools)
    }

    /// Invoke a tool by name.
    ///
    /// # Errors
    ///
    /// Returns an external-service error on transport or protocol
    /// failure; tool-level failures come back as `is_error` results.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> AppResult<CallToolResult> {
        let params = json!({ "name": name, "arguments": arguments });
        let result = self.request("tools/call", Some(params)).await?;
        serde_json::from_value(result)
            .map_err(|e| AppError::external_service(format!("Malformed tools/call result: {e}")))
    }

    /// Run the initialize handshake and confirm it
    async fn initialize(&self) -> AppResult<InitializeResult> {
        let params = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": { "name": API_SERVER, "version": env!("CARGO_PKG_VERSION") }
        });
        let result = self.request("initialize", Some(params)).await?;
        let initialized: InitializeResult = serde_json::from_value(result)
            .map_err(|e| AppError::external_service(format!("Malformed initialize result: {e}")))?;

        self.notify("notifications/initialized").await?;
        Ok(initialized)
    }

    /// Send a request and await its correlated response
    async fn request(&self, method: &str, params: Option<Value>) -> AppResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);

        let request = JsonRpcRequest::new(id, method, params);
        let post = self
            .http
            .post(self.message_url.clone())
            .json(&request)
            .send()
            .await;

        if let Err(e) = post {
            self.pending.remove(&id);
            return Err(AppError::external_service(format!(
                "Tool request failed: {e}"
            )));
        }

        let response = timeout(Duration::from_secs(TOOL_REQUEST_TIMEOUT_SECS), rx)
            .await
            .map_err(|_| {
                self.pending.remove(&id);
                AppError::external_service(format!("Tool request timed out: {method}"))
            })?
            .map_err(|_| AppError::external_service("Tool session closed mid-request"))?;

        if let Some(error) = response.error {
            return Err(AppError::external_service(format!(
                "Tool server error {}: {}",
                error.code, error.message
            )));
        }
        response
            .result
            .ok_or_else(|| AppError::external_service("Tool response had no result"))
    }

    /// Fire a notification; no response is expected
    async fn notify(&self, method: &str) -> AppResult<()> {
        let note = JsonRpcRequest::notification(method);
        self.http
            .post(self.message_url.clone())
            .json(&note)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Tool notification failed: {e}")))?;
        Ok(())
    }
}

impl Drop for ToolClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
