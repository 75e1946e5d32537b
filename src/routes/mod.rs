// ABOUTME: Route module organization for the Training Chef HTTP API
// ABOUTME: Each domain module holds route definitions and thin handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

//! HTTP routes, organized by domain.

/// Chat endpoint and orchestration
pub mod chat;
/// Profile create-or-update and read endpoints
pub mod profile;

pub use chat::ChatRoutes;
pub use profile::ProfileRoutes;
