// ABOUTME: Calorie estimation tool
// ABOUTME: Pure energy-expenditure estimate from FTP and ride duration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Training Chef

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::{AppError, AppResult};
use crate::mcp::schema::ToolDescriptor;
use crate::tools::ToolHandler;

/// Estimates calories burned on a ride held at FTP.
///
/// Mechanical work in kJ is watts x hours x 3.6; with typical gross
/// cycling efficiency the kcal burned come out numerically close to the
/// kJ of work, so that approximation is used.
pub struct RideCaloriesTool;

#[async_trait]
impl ToolHandler for RideCaloriesTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "estimate_ride_calories".to_owned(),
            description:
                "Estimates calories burned for a ride of the given duration held at the given FTP."
                    .to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "ftp_watts": { "type": "number", "description": "Functional Threshold Power in watts" },
                    "duration_hours": { "type": "number", "description": "Ride duration in hours" }
                },
                "required": ["ftp_watts", "duration_hours"]
            }),
        }
    }

    async fn call(&self, args: &Value) -> AppResult<String> {
        let ftp = args
            .get("ftp_watts")
            .and_then(Value::as_f64)
            .ok_or_else(|| AppError::invalid_input("ftp_watts is required"))?;
        let hours = args
            .get("duration_hours")
            .and_then(Value::as_f64)
            .ok_or_else(|| AppError::invalid_input("duration_hours is required"))?;

        if ftp <= 0.0 || hours <= 0.0 {
            return Err(AppError::invalid_input(
                "ftp_watts and duration_hours must be positive",
            ));
        }

        let work_kj = ftp * hours * 3.6;
        let kcal = work_kj.round() as i64;

        Ok(format!(
            "Riding {hours:.1} h at {ftp:.0} W is about {work_kj:.0} kJ of work, roughly {kcal} kcal burned."
        ))
    }
}
