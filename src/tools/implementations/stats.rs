// ABOUTME: Ride statistics tool
// ABOUTME: Returns the user's recent ride summary; data is stubbed until the Strava integration lands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::{AppError, AppResult};
use crate::mcp::schema::ToolDescriptor;
use crate::tools::ToolHandler;

/// Fetches the user's recent ride statistics.
pub struct StravaStatsTool;

#[async_trait]
impl ToolHandler for StravaStatsTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_strava_stats".to_owned(),
            description: "Fetches the user's recent ride statistics from Strava.".to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": { "type": "string", "description": "The user to look up" }
                },
                "required": ["user_id"]
            }),
        }
    }

    async fn call(&self, args: &Value) -> AppResult<String> {
        let user_id = args
            .get("user_id")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::invalid_input("user_id is required"))?;

        // TODO: replace with a real Strava API call once provider credentials exist
        Ok(format!(
            "User {user_id} rode 150km this week with 2000m elevation gain."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_weekly_summary() {
        let out = StravaStatsTool
            .call(&json!({"user_id": "athlete-1"}))
            .await
            .unwrap();
        assert_eq!(
            out,
            "User athlete-1 rode 150km this week with 2000m elevation gain."
        );
    }

    #[tokio::test]
    async fn rejects_missing_user_id() {
        assert!(StravaStatsTool.call(&json!({})).await.is_err());
    }
}
