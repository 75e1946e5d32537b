// ABOUTME: LLM provider abstraction for AI chat integration
// ABOUTME: Message, tool-declaration, and function-call types shared with the chat routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! LLM chat types and the Gemini provider.

/// Gemini inference client
pub mod gemini;

pub use gemini::GeminiProvider;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// The human (or a tool result relayed on their behalf)
    User,
    /// The model
    Model,
}

/// A tool the model may call, in JSON-Schema form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    /// Tool name
    pub name: String,
    /// Natural-language description
    pub description: String,
    /// JSON Schema for the arguments object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// A structured call the model asked us to perform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name
    pub name: String,
    /// Arguments object
    #[serde(default)]
    pub args: Value,
}

/// The result of a dispatched call, fed back to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Tool name the result belongs to
    pub name: String,
    /// Result payload
    pub response: Value,
}

/// One unit of conversation content
#[derive(Debug, Clone)]
pub enum MessageContent {
    /// Plain text
    Text(String),
    /// A model-issued function call (echoed back into history)
    FunctionCall(FunctionCall),
    /// A tool result
    FunctionResponse(FunctionResponse),
}

/// A single conversation turn
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Message author
    pub role: MessageRole,
    /// Message payload
    pub content: MessageContent,
}

impl ChatMessage {
    /// A user text message
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A model text message
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A model function call, for echoing into history
    #[must_use]
    pub const fn function_call(call: FunctionCall) -> Self {
        Self {
            role: MessageRole::Model,
            content: MessageContent::FunctionCall(call),
        }
    }

    /// A tool result relayed back to the model
    #[must_use]
    pub const fn function_response(response: FunctionResponse) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::FunctionResponse(response),
        }
    }
}

/// A complete inference request
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// System instruction (the persona)
    pub system_instruction: Option<String>,
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Tools the model may call
    pub tools: Vec<FunctionDeclaration>,
}

/// What the model returned
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Text content, if any
    pub text: Option<String>,
    /// Structured calls the model wants dispatched
    pub function_calls: Vec<FunctionCall>,
}
