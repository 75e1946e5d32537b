// ABOUTME: Gemini generateContent client
// ABOUTME: Maps crate chat types onto the Gemini REST wire format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Gemini inference client.
//!
//! Speaks the `generateContent` REST endpoint. The base URL is taken from
//! configuration so tests can point the provider at a stub model.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    ChatMessage, ChatRequest, ChatResponse, FunctionCall, FunctionDeclaration, MessageContent,
    MessageRole,
};
use crate::config::environment::LlmConfig;
use crate::errors::{AppError, AppResult};

/// Gemini chat provider
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Build the provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error if no API key is configured.
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| AppError::config("GEMINI_API_KEY is not configured"))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Run one inference round.
    ///
    /// # Errors
    ///
    /// Returns an external-service error if the request fails, the model
    /// rejects it, or the response cannot be decoded.
    pub async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let body = WireRequest::from_chat_request(request);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Gemini returned {status}: {detail}"
            )));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Malformed Gemini response: {e}")))?;

        Ok(wire.into_chat_response())
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireToolGroup>,
}

#[derive(Serialize, Deserialize)]
struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<WireFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<WireFunctionResponse>,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireToolGroup {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Deserialize)]
struct WireCandidate {
    content: Option<WireContent>,
}

impl WireRequest {
    fn from_chat_request(request: &ChatRequest) -> Self {
        let system_instruction = request.system_instruction.as_ref().map(|text| WireContent {
            role: None,
            parts: vec![WirePart {
                text: Some(text.clone()),
                ..WirePart::default()
            }],
        });

        let contents = request.messages.iter().map(wire_content).collect();

        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![WireToolGroup {
                function_declarations: request.tools.clone(),
            }]
        };

        Self {
            system_instruction,
            contents,
            tools,
        }
    }
}

fn wire_content(message: &ChatMessage) -> WireContent {
    let role = match message.role {
        MessageRole::User => "user",
        MessageRole::Model => "model",
    };

    let part = match &message.content {
        MessageContent::Text(text) => WirePart {
            text: Some(text.clone()),
            ..WirePart::default()
        },
        MessageContent::FunctionCall(call) => WirePart {
            function_call: Some(WireFunctionCall {
                name: call.name.clone(),
                args: call.args.clone(),
            }),
            ..WirePart::default()
        },
        MessageContent::FunctionResponse(response) => WirePart {
            function_response: Some(WireFunctionResponse {
                name: response.name.clone(),
                response: response.response.clone(),
            }),
            ..WirePart::default()
        },
    };

    WireContent {
        role: Some(role.to_owned()),
        parts: vec![part],
    }
}

impl WireResponse {
    fn into_chat_response(self) -> ChatResponse {
        let mut out = ChatResponse::default();

        let Some(content) = self.candidates.into_iter().next().and_then(|c| c.content) else {
            return out;
        };

        let mut text_parts: Vec<String> = Vec::new();
        for part in content.parts {
            if let Some(text) = part.text {
                text_parts.push(text);
            }
            if let Some(call) = part.function_call {
                out.function_calls.push(FunctionCall {
                    name: call.name,
                    args: call.args,
                });
            }
        }

        if !text_parts.is_empty() {
            out.text = Some(text_parts.join(""));
        }
        out
    }
}
