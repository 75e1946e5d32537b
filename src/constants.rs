// ABOUTME: Application constants shared across modules
// ABOUTME: Protocol versions, service names, default endpoints, and fixed user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Application-wide constants.

/// Service names used in logs and health payloads
pub mod service_names {
    /// The HTTP API server
    pub const API_SERVER: &str = "training-chef-server";
    /// The MCP tool server
    pub const TOOL_SERVER: &str = "training-chef-tools";
}

/// Protocol constants for JSON-RPC and MCP
pub mod protocol {
    /// JSON-RPC protocol version
    pub const JSONRPC_VERSION: &str = "2.0";
    /// MCP protocol revision spoken by both ends
    pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
}

/// JSON-RPC error codes
pub mod errors {
    /// Method not found
    pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params
    pub const ERROR_INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const ERROR_INTERNAL_ERROR: i32 = -32603;
    /// Parse error
    pub const ERROR_PARSE: i32 = -32700;
}

/// Fixed user-facing messages
pub mod messages {
    /// Welcome payload for `GET /`
    pub const WELCOME: &str = "Welcome to the Training Chef API";

    /// Returned with HTTP 200 whenever the chat path hits a downstream
    /// failure (missing API key, model error, tool server unreachable).
    pub const CHAT_UNAVAILABLE: &str =
        "Sorry, the Training Chef kitchen is closed right now. Please try again in a moment.";
}

/// Default endpoints for external services
pub mod endpoints {
    /// Google's ID token verification endpoint
    pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
    /// Gemini inference API base
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// Default ports and limits
pub mod defaults {
    /// HTTP API port
    pub const HTTP_PORT: u16 = 8000;
    /// MCP tool server port
    pub const TOOLS_PORT: u16 = 8080;
    /// Default Gemini model
    pub const GEMINI_MODEL: &str = "gemini-2.5-flash";
    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:./data/training_chef.db";
    /// Per-request timeout on MCP client awaits, seconds
    pub const TOOL_REQUEST_TIMEOUT_SECS: u64 = 30;
}
