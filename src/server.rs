// ABOUTME: Server resources and HTTP server assembly
// ABOUTME: Bundles config, database, and auth gate; merges routers and serves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! HTTP server assembly.
//!
//! [`ServerResources`] is the dependency-injection bundle handed to every
//! route module as axum state. [`ChefServer`] composes the routers and
//! runs the listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthGate;
use crate::config::environment::ServerConfig;
use crate::constants::messages::WELCOME;
use crate::constants::service_names::API_SERVER;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::routes::{ChatRoutes, ProfileRoutes};

/// Shared dependencies injected into every route handler
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Database pool
    pub database: Database,
    /// Request authentication gate
    pub auth: AuthGate,
}

impl ServerResources {
    /// Build resources from configuration: connect the database and wire
    /// the auth gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection or migration fails.
    pub async fn from_config(config: ServerConfig) -> AppResult<Arc<Self>> {
        let config = Arc::new(config);
        let database = Database::new(&config.database.url).await?;
        let auth = AuthGate::new(Arc::clone(&config), database.clone());

        Ok(Arc::new(Self {
            config,
            database,
            auth,
        }))
    }
}

/// The Training Chef HTTP API server
pub struct ChefServer {
    resources: Arc<ServerResources>,
}

impl ChefServer {
    /// Create a server with pre-built resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Compose the full application router
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .merge(Self::base_routes())
            .merge(ProfileRoutes::routes(Arc::clone(&self.resources)))
            .merge(ChatRoutes::routes(Arc::clone(&self.resources)))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Bind and serve until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn run(self) -> AppResult<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.resources.config.http_port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        info!("Training Chef API listening on {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| AppError::internal(format!("Server failed: {e}")))
    }

    /// Welcome and health routes, always enabled
    fn base_routes() -> Router {
        async fn welcome_handler() -> Json<Value> {
            Json(json!({ "message": WELCOME }))
        }

        async fn health_handler() -> Json<Value> {
            Json(json!({ "status": "ok", "service": API_SERVER }))
        }

        Router::new()
            .route("/", get(welcome_handler))
            .route("/health", get(health_handler))
    }
}
