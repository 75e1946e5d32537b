// ABOUTME: Profile route handlers
// ABOUTME: Authenticated create-or-update and read of the caller's training profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Profile routes.
//!
//! `POST /api/profile` overwrites the caller's single profile record;
//! `GET /api/profile` returns it, or an empty object when none exists —
//! absence is never an error.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::errors::{AppError, AppResult};
use crate::models::ProfileAttributes;
use crate::server::ServerResources;

/// Request body for `POST /api/profile`
#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Functional Threshold Power in watts
    pub ftp: i64,
    /// Body-type classification
    pub body_type: String,
}

impl SaveProfileRequest {
    /// Validate scalars and convert into storable attributes.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error on non-positive numbers or an
    /// empty body type.
    pub fn validate(self) -> AppResult<ProfileAttributes> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(AppError::invalid_input("weight_kg must be positive"));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(AppError::invalid_input("height_cm must be positive"));
        }
        if self.ftp <= 0 {
            return Err(AppError::invalid_input("ftp must be positive"));
        }
        let body_type = self.body_type.trim().to_owned();
        if body_type.is_empty() {
            return Err(AppError::invalid_input("body_type must not be empty"));
        }

        Ok(ProfileAttributes {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            ftp: self.ftp,
            body_type,
        })
    }
}

/// Profile routes
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/profile",
                get(Self::handle_get).post(Self::handle_save),
            )
            .with_state(resources)
    }

    /// Handle `POST /api/profile`: create or overwrite the caller's record
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SaveProfileRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers).await?;
        let attributes = request.validate()?;

        let profile = resources
            .database
            .upsert_profile(auth.user.id, &attributes)
            .await?;

        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle `GET /api/profile`: the record, or `{}` when absent
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth.authenticate(&headers).await?;

        let body = match resources.database.get_profile(auth.user.id).await? {
            Some(profile) => json!(profile),
            None => json!({}),
        };

        Ok((StatusCode::OK, Json(body)).into_response())
    }
}
