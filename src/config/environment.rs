// ABOUTME: Environment-variable configuration for both binaries
// ABOUTME: Single source of truth for ports, database URL, auth, LLM, and tool server settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Environment-only server configuration.
//!
//! Everything is read from the process environment; there are no
//! configuration files. Defaults are documented per field.

use std::env;

use tracing::warn;

use crate::constants::{defaults, endpoints};
use crate::errors::{AppError, AppResult};

/// Log output format selected via `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human-readable output
    #[default]
    Plain,
    /// Newline-delimited JSON
    Json,
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `sqlx` connection URL (`DATABASE_URL`)
    pub url: String,
}

/// Auth gate settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth client id checked against the token audience (`GOOGLE_CLIENT_ID`)
    pub google_client_id: String,
    /// Verification endpoint (`GOOGLE_TOKENINFO_URL`); overridable for tests
    pub tokeninfo_url: String,
    /// Lower-cased allow-listed emails (`ALLOWED_EMAILS`, comma-separated)
    pub allowed_emails: Vec<String>,
}

/// Generative model settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key (`GEMINI_API_KEY`); absent means chat degrades to the fallback
    pub gemini_api_key: Option<String>,
    /// Model name (`GEMINI_MODEL`)
    pub model: String,
    /// Inference API base (`GEMINI_BASE_URL`); overridable for tests
    pub base_url: String,
}

/// Tool server settings
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Base URL of the MCP tool server (`TOOLS_SERVER_URL`); absent disables tools
    pub server_url: Option<String>,
    /// Bind port for the tool server binary (`TOOLS_PORT`)
    pub port: u16,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP API bind port (`HTTP_PORT`)
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Auth gate settings
    pub auth: AuthConfig,
    /// Generative model settings
    pub llm: LlmConfig,
    /// Tool server settings
    pub tools: ToolsConfig,
    /// Log output format (`LOG_FORMAT`: `plain` or `json`)
    pub log_format: LogFormat,
}

impl LogFormat {
    /// Read `LOG_FORMAT` directly; used before full config parsing so
    /// logging is up when config warnings fire.
    #[must_use]
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            _ => Self::Plain,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `GOOGLE_CLIENT_ID` or `ALLOWED_EMAILS` is
    /// missing, or if a numeric variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = parse_port("HTTP_PORT", defaults::HTTP_PORT)?;
        let tools_port = parse_port("TOOLS_PORT", defaults::TOOLS_PORT)?;

        let google_client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| AppError::config("GOOGLE_CLIENT_ID must be set"))?;

        let allowed_emails = env::var("ALLOWED_EMAILS")
            .map_err(|_| AppError::config("ALLOWED_EMAILS must be set"))
            .map(|raw| Self::parse_allow_list(&raw))?;
        if allowed_emails.is_empty() {
            warn!("ALLOWED_EMAILS is empty; every login will be rejected with 403");
        }

        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        if gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set; chat will return the fallback message");
        }

        Ok(Self {
            http_port,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| defaults::DATABASE_URL.to_owned()),
            },
            auth: AuthConfig {
                google_client_id,
                tokeninfo_url: env::var("GOOGLE_TOKENINFO_URL")
                    .unwrap_or_else(|_| endpoints::GOOGLE_TOKENINFO_URL.to_owned()),
                allowed_emails,
            },
            llm: LlmConfig {
                gemini_api_key,
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| defaults::GEMINI_MODEL.to_owned()),
                base_url: env::var("GEMINI_BASE_URL")
                    .unwrap_or_else(|_| endpoints::GEMINI_BASE_URL.to_owned()),
            },
            tools: ToolsConfig {
                server_url: env::var("TOOLS_SERVER_URL").ok().filter(|u| !u.is_empty()),
                port: tools_port,
            },
            log_format: LogFormat::from_env(),
        })
    }

    /// Split, trim, and lower-case the comma-separated allow-list.
    ///
    /// Membership checks are case-insensitive, so emails are normalized
    /// once here.
    #[must_use]
    pub fn parse_allow_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }

    /// Case-insensitive allow-list membership check
    #[must_use]
    pub fn email_allowed(&self, email: &str) -> bool {
        let needle = email.trim().to_lowercase();
        self.auth.allowed_emails.iter().any(|e| *e == needle)
    }
}

fn parse_port(var: &str, default: u16) -> AppResult<u16> {
    match env::var(var) {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|_| AppError::config(format!("{var} must be a valid port, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}
