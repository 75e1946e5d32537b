// ABOUTME: Unified error handling system with standard error codes and HTTP responses
// ABOUTME: Provides AppError/ErrorCode/AppResult used by every module in the crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Unified error handling.
//!
//! Every fallible operation in the crate returns [`AppResult`]. Handlers
//! can return [`AppError`] directly; its `IntoResponse` impl maps the
//! error code to the right HTTP status with a JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Stable error codes, each with a canonical HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No credential was presented
    AuthRequired,
    /// The credential failed verification
    AuthInvalid,
    /// Credential verified but the caller is not permitted
    PermissionDenied,
    /// Request payload failed validation
    InvalidInput,
    /// The requested resource does not exist
    ResourceNotFound,
    /// Database operation failed
    DatabaseError,
    /// An upstream service call failed
    ExternalServiceError,
    /// The server is misconfigured
    ConfigError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// Canonical HTTP status for this code
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::AuthRequired | Self::AuthInvalid => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::ExternalServiceError => StatusCode::BAD_GATEWAY,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable string form used in JSON error bodies
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthRequired => "auth_required",
            Self::AuthInvalid => "auth_invalid",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidInput => "invalid_input",
            Self::ResourceNotFound => "not_found",
            Self::DatabaseError => "database_error",
            Self::ExternalServiceError => "external_service_error",
            Self::ConfigError => "config_error",
            Self::InternalError => "internal_error",
        }
    }
}

/// Application error carrying a stable code and a human-readable message
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    /// Stable error code
    pub code: ErrorCode,
    /// Human-readable detail
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Missing credential
    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthRequired, message)
    }

    /// Invalid credential
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authenticated but not permitted
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Request validation failure
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing resource
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Database failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Upstream service failure
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceError, message)
    }

    /// Configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// JSON error body returned to HTTP callers
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        if status.is_server_error() {
            tracing::error!(code = self.code.as_str(), error = %self.message, "request failed");
        }
        let body = ErrorBody {
            error: self.code.as_str(),
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_codes_map_to_401() {
        assert_eq!(
            AppError::auth_required("no header").code.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::auth_invalid("bad token").code.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn permission_denied_maps_to_403() {
        let err = AppError::permission_denied("not on the list");
        assert_eq!(err.code.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(err.code.as_str(), "permission_denied");
    }

    #[test]
    fn display_uses_message() {
        let err = AppError::invalid_input("weight_kg must be positive");
        assert_eq!(err.to_string(), "weight_kg must be positive");
    }
}
