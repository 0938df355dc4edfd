// ABOUTME: Health reporting for the engine's external collaborators
// ABOUTME: Per-component status with timing, folded into an overall healthy/degraded/unhealthy verdict
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check types

use std::future::Future;
use std::time::Instant;

use chrono::{DateTime, Utc};
use evo_core::errors::AppResult;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::logging::SERVICE_NAME;

/// Overall health status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every collaborator answered
    Healthy,
    /// Some collaborators failed
    Degraded,
    /// No collaborator answered
    Unhealthy,
}

/// Health of a single collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// `Healthy` or `Unhealthy`
    pub status: HealthStatus,
    /// "ok" or the failure description
    pub message: String,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

impl ComponentHealth {
    /// Run `check` and record its outcome
    pub async fn probe(name: &str, check: impl Future<Output = AppResult<()>> + Send) -> Self {
        let start = Instant::now();
        let outcome = check.await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(()) => Self {
                name: name.to_owned(),
                status: HealthStatus::Healthy,
                message: "ok".to_owned(),
                duration_ms,
            },
            Err(e) => {
                warn!(component = name, error = %e, "Health check failed");
                Self {
                    name: name.to_owned(),
                    status: HealthStatus::Unhealthy,
                    message: e.code.description().to_owned(),
                    duration_ms,
                }
            }
        }
    }
}

/// Health report of the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Individual component checks
    pub checks: Vec<ComponentHealth>,
    /// When the report was produced
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    /// Fold component checks into a report
    #[must_use]
    pub fn from_checks(checks: Vec<ComponentHealth>) -> Self {
        let failing = checks
            .iter()
            .filter(|c| c.status != HealthStatus::Healthy)
            .count();
        let status = if failing == 0 {
            HealthStatus::Healthy
        } else if failing < checks.len() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        };
        Self {
            status,
            service: SERVICE_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            checks,
            checked_at: Utc::now(),
        }
    }

    /// Check result for component `name`
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&ComponentHealth> {
        self.checks.iter().find(|c| c.name == name)
    }
}
