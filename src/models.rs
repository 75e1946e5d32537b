// ABOUTME: Common data models for users and training profiles
// ABOUTME: Pure data types; persistence lives in the database module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Domain data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A local user account, created on first successful authenticated login.
///
/// Identity lives with Google; the local record only ties the external
/// subject id to an email and owns at most one [`Profile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Local user id
    pub id: Uuid,
    /// Unique email address
    pub email: String,
    /// Unique Google subject id (`sub` claim)
    pub google_sub: String,
    /// Display name from the identity token, if the provider sent one
    pub display_name: Option<String>,
    /// When the account was first created
    pub created_at: DateTime<Utc>,
    /// Last successful authenticated request
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Create a new user record with fresh timestamps
    #[must_use]
    pub fn new(email: String, google_sub: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            google_sub,
            display_name,
            created_at: now,
            last_active: now,
        }
    }
}

/// The writable scalar attributes of a training profile.
///
/// All fields are required; there is no cross-field validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAttributes {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Functional Threshold Power in watts
    pub ftp: i64,
    /// Body-type classification (free-form, e.g. "ectomorph")
    pub body_type: String,
}

/// A stored training profile. Each user owns at most one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user
    pub user_id: Uuid,
    /// Physiological attributes
    #[serde(flatten)]
    pub attributes: ProfileAttributes,
    /// When the record was first created
    pub created_at: DateTime<Utc>,
    /// Last overwrite
    pub updated_at: DateTime<Utc>,
}
