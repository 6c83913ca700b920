// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lagoon check-config` command implementation.
//!
//! Configuration has already been loaded and validated by the time this runs;
//! it builds each adapter and prints its health without binding a port.

use lagoon_config::LagoonConfig;
use lagoon_core::{HealthStatus, LagoonError, PluginAdapter, StorageAdapter};
use lagoon_storage::SqliteStorage;
use lagoon_venice::VeniceProvider;

/// One line of the readiness report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckLine {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl CheckLine {
    fn from_health(name: &str, health: Result<HealthStatus, LagoonError>) -> Self {
        let (ok, detail) = match health {
            Ok(HealthStatus::Healthy) => (true, "ready".to_string()),
            Ok(HealthStatus::Degraded(reason)) => (true, format!("degraded: {reason}")),
            Ok(HealthStatus::Unhealthy(reason)) => (false, reason),
            Err(e) => (false, e.to_string()),
        };
        Self {
            name: name.to_string(),
            ok,
            detail,
        }
    }
}

/// Build the provider and blob adapters and report their health.
pub async fn collect(config: &LagoonConfig) -> Vec<CheckLine> {
    let mut lines = vec![CheckLine {
        name: "config".to_string(),
        ok: true,
        detail: format!("bind {}:{}", config.server.host, config.server.port),
    }];

    let provider = match VeniceProvider::new(&config.venice) {
        Ok(provider) => CheckLine::from_health("provider", provider.health_check().await),
        Err(e) => CheckLine::from_health("provider", Err(e)),
    };
    lines.push(provider);

    let blob = match lagoon_blob::build_blob_store(&config.blob) {
        Ok(blob) => CheckLine::from_health("blob", blob.health_check().await),
        Err(e) => CheckLine::from_health("blob", Err(e)),
    };
    lines.push(blob);

    lines.push(check_storage(config).await);

    lines
}

/// Open the database (creating it and applying migrations if needed), run a
/// health query, and close it again.
async fn check_storage(config: &LagoonConfig) -> CheckLine {
    let storage = SqliteStorage::new(config.storage.clone());
    if let Err(e) = storage.initialize().await {
        return CheckLine::from_health("storage", Err(e));
    }
    let mut line = CheckLine::from_health("storage", storage.health_check().await);
    if let Err(e) = storage.close().await {
        line = CheckLine::from_health("storage", Err(e));
    }
    if line.ok {
        line.detail = format!("{} ({})", line.detail, config.storage.database_path);
    }
    line
}

/// Runs the `lagoon check-config` command.
pub async fn run_check_config(config: &LagoonConfig) -> Result<(), LagoonError> {
    let lines = collect(config).await;

    println!();
    println!("  lagoon check-config");
    println!("  {}", "-".repeat(50));
    for line in &lines {
        let mark = if line.ok { "ok  " } else { "FAIL" };
        println!("  [{mark}] {:<10} {}", line.name, line.detail);
    }
    println!();

    if lines.iter().all(|l| l.ok) {
        Ok(())
    } else {
        Err(LagoonError::Config("one or more checks failed".to_string()))
    }
}
