// ABOUTME: Training Chef API server binary
// ABOUTME: Loads environment configuration and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! # Training Chef API Server
//!
//! Serves the profile and chat endpoints behind the Google-identity auth
//! gate. Configuration is environment-only; see `ServerConfig`.
//!
//! ## Usage
//!
//! ```bash
//! # Start with environment configuration
//! cargo run --bin training-chef-server
//!
//! # Override the port
//! cargo run --bin training-chef-server -- --port 9000
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use training_chef::config::environment::{LogFormat, ServerConfig};
use training_chef::constants::service_names::API_SERVER;
use training_chef::logging;
use training_chef::server::{ChefServer, ServerResources};

#[derive(Parser)]
#[command(name = "training-chef-server", about = "Training Chef HTTP API server")]
struct Args {
    /// Override the HTTP port (`HTTP_PORT`)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init(LogFormat::from_env());
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }

    info!(service = API_SERVER, port = config.http_port, "starting");
    let resources = ServerResources::from_config(config).await?;
    ChefServer::new(resources).run().await?;
    Ok(())
}
