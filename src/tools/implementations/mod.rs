// ABOUTME: Built-in tool implementations
// ABOUTME: Ride statistics and calorie estimation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

/// Energy-expenditure estimate from FTP
pub mod nutrition;
/// Recent ride statistics
pub mod stats;

pub use nutrition::RideCaloriesTool;
pub use stats::StravaStatsTool;
