// ABOUTME: Google identity verification and the per-request auth gate
// ABOUTME: Verifies bearer ID tokens remotely, checks the allow-list, resolves the local user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Authentication gate.
//!
//! Every protected route passes through [`AuthGate::authenticate`]: the
//! bearer token is verified against Google's tokeninfo endpoint, the
//! email is checked against the allow-list, and the local [`User`] is
//! found or created. Verification is delegated wholesale to the identity
//! provider; this service issues no credentials of its own.

use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Claims extracted from a verified Google ID token
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClaims {
    /// Stable subject id
    pub sub: String,
    /// Intended audience (OAuth client id)
    pub aud: String,
    /// Email address, when the token carries one
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, when the token carries one
    #[serde(default)]
    pub name: Option<String>,
    /// Expiry as a unix timestamp string, as tokeninfo returns it
    #[serde(default)]
    pub exp: Option<String>,
}

/// Remote verifier for Google ID tokens
#[derive(Debug, Clone)]
pub struct GoogleAuth {
    client: Client,
    client_id: String,
    tokeninfo_url: String,
}

impl GoogleAuth {
    /// Create a verifier for the given OAuth client id and endpoint
    #[must_use]
    pub fn new(client_id: String, tokeninfo_url: String) -> Self {
        Self {
            client: Client::new(),
            client_id,
            tokeninfo_url,
        }
    }

    /// Verify an ID token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns an auth error if the verifier rejects the token, the
    /// audience does not match our client id, or the token is expired.
    pub async fn validate_token(&self, id_token: &str) -> AppResult<GoogleClaims> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::auth_invalid(format!("Token verification failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::auth_invalid(format!(
                "Identity provider rejected token: {}",
                response.status()
            )));
        }

        let claims: GoogleClaims = response
            .json()
            .await
            .map_err(|e| AppError::auth_invalid(format!("Malformed tokeninfo response: {e}")))?;

        if claims.aud != self.client_id {
            return Err(AppError::auth_invalid("Token audience mismatch"));
        }

        if let Some(exp) = claims.exp.as_deref().and_then(|e| e.parse::<i64>().ok()) {
            if exp < Utc::now().timestamp() {
                return Err(AppError::auth_invalid("Token expired"));
            }
        }

        Ok(claims)
    }
}

/// The resolved caller, handed to downstream handlers
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Local user record for the verified caller
    pub user: User,
}

/// Request authentication gate: verifier + allow-list + user resolution
#[derive(Clone)]
pub struct AuthGate {
    config: Arc<ServerConfig>,
    database: Database,
    google: GoogleAuth,
}

impl AuthGate {
    /// Build the gate from server configuration
    #[must_use]
    pub fn new(config: Arc<ServerConfig>, database: Database) -> Self {
        let google = GoogleAuth::new(
            config.auth.google_client_id.clone(),
            config.auth.tokeninfo_url.clone(),
        );
        Self {
            config,
            database,
            google,
        }
    }

    /// Authenticate a request from its headers.
    ///
    /// # Errors
    ///
    /// - 401 when the bearer token is missing, malformed, or fails
    ///   verification, or when the token lacks email/subject claims
    /// - 403 when the verified email is not allow-listed
    /// - 500-class errors on database failures
    pub async fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let token = Self::extract_bearer(headers)?;
        let claims = self.google.validate_token(token).await?;

        if claims.sub.is_empty() {
            return Err(AppError::auth_invalid("Token missing subject claim"));
        }
        let email = claims
            .email
            .as_deref()
            .ok_or_else(|| AppError::auth_invalid("Token missing email claim"))?;

        if !self.config.email_allowed(email) {
            warn!(email = %email, "login rejected: email not allow-listed");
            return Err(AppError::permission_denied("Email is not allow-listed"));
        }

        let user = self.find_or_create_user(&claims, email).await?;
        self.database.update_last_active(user.id).await?;

        Ok(AuthResult { user })
    }

    /// Find the local user for verified claims, or create one.
    ///
    /// Lookup order: subject id first, then email (linking the subject id
    /// to a pre-existing account), then a fresh insert. Emails are stored
    /// lower-cased so lookups match the allow-list's case-insensitivity.
    async fn find_or_create_user(&self, claims: &GoogleClaims, email: &str) -> AppResult<User> {
        let email = email.trim().to_lowercase();

        if let Some(user) = self.database.get_user_by_google_sub(&claims.sub).await? {
            debug!(user_id = %user.id, "found user by subject id");
            return Ok(user);
        }

        if let Some(mut user) = self.database.get_user_by_email(&email).await? {
            info!(user_id = %user.id, "linking existing account to Google subject id");
            self.database.link_google_sub(user.id, &claims.sub).await?;
            user.google_sub.clone_from(&claims.sub);
            return Ok(user);
        }

        let user = User::new(email, claims.sub.clone(), claims.name.clone());
        self.database.create_user(&user).await?;
        info!(user_id = %user.id, "created user on first login");
        Ok(user)
    }

    fn extract_bearer(headers: &HeaderMap) -> AppResult<&str> {
        let value = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::auth_required("Missing authorization header"))?;

        value
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::auth_required("Authorization header is not a bearer token"))
    }
}
