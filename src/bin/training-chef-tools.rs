// ABOUTME: MCP tool server binary
// ABOUTME: Serves the built-in tool registry over the SSE session transport
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! # Training Chef Tool Server
//!
//! Advertises the built-in tools over MCP so the chat orchestrator (or
//! any MCP client) can list and invoke them. Listens on its own port and
//! needs none of the API server's configuration.
//!
//! ## Usage
//!
//! ```bash
//! # Start on the default port (8080, or TOOLS_PORT)
//! cargo run --bin training-chef-tools
//!
//! # Override the port
//! cargo run --bin training-chef-tools -- --port 9090
//! ```

use std::env;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use training_chef::config::environment::LogFormat;
use training_chef::constants::defaults::TOOLS_PORT;
use training_chef::constants::service_names::TOOL_SERVER;
use training_chef::logging;
use training_chef::mcp::ToolServer;
use training_chef::tools::ToolRegistry;

#[derive(Parser)]
#[command(name = "training-chef-tools", about = "Training Chef MCP tool server")]
struct Args {
    /// Override the bind port (`TOOLS_PORT`)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init(LogFormat::from_env());
    let args = Args::parse();

    let port = match args.port {
        Some(port) => port,
        None => env::var("TOOLS_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(TOOLS_PORT),
    };

    let registry = ToolRegistry::with_default_tools();
    info!(service = TOOL_SERVER, port, "starting");
    ToolServer::new(registry).run(port).await?;
    Ok(())
}
