// ABOUTME: Core database management with embedded migrations for SQLite
// ABOUTME: Owns the connection pool; per-concern operations live in sibling modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Database access layer.
//!
//! [`Database`] wraps a `sqlx` pool. Operations are split per concern:
//! user lookups in [`users`], profile storage in [`profiles`]. A
//! connection is checked out per statement and returned to the pool,
//! which is the only resource-scoping discipline this service needs.

/// Profile storage and retrieval
pub mod profiles;
/// User account management
pub mod users;

use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the connection fails,
    /// or a migration fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run all pending migrations embedded at compile time from ./migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails.
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        info!("Database migrations completed");
        Ok(())
    }
}
