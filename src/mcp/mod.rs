// ABOUTME: Model Context Protocol module root
// ABOUTME: Wire schema, the SSE tool server, and the session client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Model Context Protocol support.
//!
//! The tool server advertises callable tools over a session-oriented
//! JSON-RPC transport: clients open an SSE stream, learn their message
//! endpoint from the first event, POST requests to it, and read responses
//! off the stream. The client half lives in the chat orchestrator.

/// Session client used by the chat orchestrator
pub mod client;
/// MCP payload types
pub mod schema;
/// SSE session transport and dispatch
pub mod server;

pub use client::ToolClient;
pub use schema::{CallToolResult, InitializeResult, ToolContent, ToolDescriptor};
pub use server::ToolServer;
