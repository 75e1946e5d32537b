// ABOUTME: MCP payload types for initialize, tools/list, and tools/call
// ABOUTME: Serialized with the protocol's camelCase field names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! MCP wire schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A tool advertised by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name, matched exactly on `tools/call`
    pub name: String,
    /// Natural-language description shown to the model
    pub description: String,
    /// JSON Schema for the arguments object
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Server identity reported during the handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Result of the `initialize` handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Protocol revision
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capability advertisement
    pub capabilities: Value,
    /// Server identity
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

impl InitializeResult {
    /// Handshake payload for this server
    #[must_use]
    pub fn for_server(name: &str) -> Self {
        Self {
            protocol_version: crate::constants::protocol::MCP_PROTOCOL_VERSION.to_owned(),
            capabilities: json!({ "tools": {} }),
            server_info: ServerInfo {
                name: name.to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
            },
        }
    }
}

/// Result of `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Advertised tools
    pub tools: Vec<ToolDescriptor>,
}

/// Parameters of `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Tool name
    pub name: String,
    /// Arguments object
    #[serde(default)]
    pub arguments: Value,
}

/// One content block in a tool result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolContent {
    /// Content type, currently always "text"
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text payload
    pub text: String,
}

impl ToolContent {
    /// A text content block
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_owned(),
            text: text.into(),
        }
    }
}

/// Result of `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    /// Result content blocks
    pub content: Vec<ToolContent>,
    /// Whether the tool itself failed
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl CallToolResult {
    /// A successful text result
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }

    /// A tool-level failure, reported in-band per the protocol
    #[must_use]
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: true,
        }
    }

    /// Concatenated text of all content blocks
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
