// ABOUTME: Tool registry advertised by the MCP tool server
// ABOUTME: Trait seam for callable tools plus name-based lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Callable tools.
//!
//! Tools are pure functions over simple scalar arguments returning text.
//! The registry holds trait objects so the tool server can list and
//! dispatch them uniformly.

/// Concrete tool implementations
pub mod implementations;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppResult;
use crate::mcp::schema::ToolDescriptor;

use self::implementations::{RideCaloriesTool, StravaStatsTool};

/// A callable tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Wire descriptor advertised on `tools/list`
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute with the given arguments object.
    ///
    /// # Errors
    ///
    /// Returns an error on missing or ill-typed arguments; the server
    /// reports it in-band as a failed tool result.
    async fn call(&self, args: &Value) -> AppResult<String>;
}

/// Name-indexed collection of tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry with the built-in tool set
    #[must_use]
    pub fn with_default_tools() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StravaStatsTool));
        registry.register(Arc::new(RideCaloriesTool));
        registry
    }

    /// Add a tool
    pub fn register(&mut self, tool: Arc<dyn ToolHandler>) {
        self.tools.push(tool);
    }

    /// Descriptors for every registered tool
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Look up a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.iter().find(|t| t.descriptor().name == name)
    }
}
