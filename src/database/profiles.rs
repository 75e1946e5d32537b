// ABOUTME: Training profile database operations
// ABOUTME: Per-user single-record upsert and read; reads never error on absence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Profile, ProfileAttributes};

impl Database {
    /// Create or overwrite the caller's profile.
    ///
    /// The UNIQUE constraint on `user_id` makes this a single-statement
    /// upsert; repeated saves overwrite scalars in place and never create
    /// a second row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        attributes: &ProfileAttributes,
    ) -> AppResult<Profile> {
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO profiles (user_id, weight_kg, height_cm, ftp, body_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (user_id)
            DO UPDATE SET
                weight_kg = EXCLUDED.weight_kg,
                height_cm = EXCLUDED.height_cm,
                ftp = EXCLUDED.ftp,
                body_type = EXCLUDED.body_type,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(user_id.to_string())
        .bind(attributes.weight_kg)
        .bind(attributes.height_cm)
        .bind(attributes.ftp)
        .bind(&attributes.body_type)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to save profile: {e}")))?;

        self.get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::database("Profile missing immediately after upsert"))
    }

    /// Get the caller's profile; absence is `None`, never an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query(
            r"
            SELECT user_id, weight_kg, height_cm, ftp, body_type, created_at, updated_at
            FROM profiles WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row.map(|row| Self::row_to_profile(&row)).transpose()
    }

    /// Count profile rows. Used by tests asserting upsert semantics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_profiles(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM profiles")
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to count profiles: {e}")))?;
        Ok(row.get("n"))
    }

    fn row_to_profile(row: &SqliteRow) -> AppResult<Profile> {
        let user_id: String = row.get("user_id");
        let created_at: DateTime<Utc> = row.get("created_at");
        let updated_at: DateTime<Utc> = row.get("updated_at");

        Ok(Profile {
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::internal(format!("Failed to parse profile owner UUID: {e}")))?,
            attributes: ProfileAttributes {
                weight_kg: row.get("weight_kg"),
                height_cm: row.get("height_cm"),
                ftp: row.get("ftp"),
                body_type: row.get("body_type"),
            },
            created_at,
            updated_at,
        })
    }
}
