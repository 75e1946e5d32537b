// ABOUTME: Main library entry point for the Training Chef backend
// ABOUTME: Provides the REST API, auth gate, chat orchestrator, and MCP tool server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

#![deny(unsafe_code)]

//! # Training Chef
//!
//! Backend for a fitness-nutrition chat assistant. The HTTP API stores a
//! per-user training profile, gates every request behind Google identity
//! tokens plus an email allow-list, and forwards chat messages (with a
//! profile-derived persona) to the Gemini generative model. A separate
//! tool server advertises callable functions over the Model Context
//! Protocol (MCP) so the model can request live data mid-conversation.
//!
//! ## Components
//!
//! - **Profile store**: single-record-per-user CRUD backed by `SQLite`
//! - **Auth gate**: Google ID token verification + email allow-list
//! - **Chat orchestrator**: persona assembly, Gemini function calling,
//!   MCP tool dispatch
//! - **Tool server**: session-based JSON-RPC over SSE on its own port
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use training_chef::config::environment::ServerConfig;
//! use training_chef::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Training Chef API on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Application constants and fixed messages
pub mod constants;

/// Configuration management (environment-only)
pub mod config;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Production logging setup
pub mod logging;

/// Common data models (users, profiles)
pub mod models;

/// Database access over `sqlx` with embedded migrations
pub mod database;

/// Google identity verification and the request auth gate
pub mod auth;

/// LLM provider client for AI chat integration
pub mod llm;

/// JSON-RPC 2.0 envelopes shared by the MCP client and server
pub mod jsonrpc;

/// Model Context Protocol session transport (server and client)
pub mod mcp;

/// Callable tools advertised by the tool server
pub mod tools;

/// HTTP routes for profile and chat endpoints
pub mod routes;

/// Server resources and HTTP server assembly
pub mod server;
