// ABOUTME: User account database operations
// ABOUTME: Find-or-create lookups keyed by Google subject id and email
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;

impl Database {
    /// Insert a new user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the email or subject id is already taken, or
    /// the database operation fails.
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, google_sub, display_name, created_at, last_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.google_sub)
        .bind(&user.display_name)
        .bind(user.created_at)
        .bind(user.last_active)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(user.id)
    }

    /// Get a user by local id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let user_id_str = user_id.to_string();
        self.get_user_by_field("id", &user_id_str).await
    }

    /// Get a user by Google subject id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_google_sub(&self, google_sub: &str) -> AppResult<Option<User>> {
        self.get_user_by_field("google_sub", google_sub).await
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.get_user_by_field("email", email).await
    }

    /// Attach a Google subject id to an existing account.
    ///
    /// Used when an allow-listed email was seen before its Google login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn link_google_sub(&self, user_id: Uuid, google_sub: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET google_sub = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(google_sub)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to link google_sub: {e}")))?;
        Ok(())
    }

    /// Stamp a successful authenticated request
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update_last_active(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_active = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(Utc::now())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update last_active: {e}")))?;
        Ok(())
    }

    /// Count user rows. Used by tests asserting single-account semantics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_users(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;
        Ok(row.get("n"))
    }

    async fn get_user_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!(
            r"
            SELECT id, email, google_sub, display_name, created_at, last_active
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by {field}: {e}")))?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.get("id");
        let created_at: DateTime<Utc> = row.get("created_at");
        let last_active: DateTime<Utc> = row.get("last_active");

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse user id UUID: {e}")))?,
            email: row.get("email"),
            google_sub: row.get("google_sub"),
            display_name: row.get("display_name"),
            created_at,
            last_active,
        })
    }
}
