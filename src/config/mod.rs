// ABOUTME: Configuration module root
// ABOUTME: Environment-only configuration; no config files are read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! Configuration management.

/// Environment-variable-backed server configuration
pub mod environment;

pub use environment::ServerConfig;
