// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lagoon serve` command implementation.

use std::sync::Arc;

use lagoon_config::LagoonConfig;
use lagoon_core::{BlobAdapter, HealthStatus, LagoonError, PluginAdapter, StorageAdapter};
use lagoon_gateway::{AppState, GatewaySettings, ImagePolicy, SessionSettings};
use lagoon_storage::SqliteStorage;
use lagoon_venice::VeniceProvider;
use tracing::{info, warn};

use crate::shutdown;

/// Map the loaded configuration onto the gateway's settings.
pub fn gateway_settings(config: &LagoonConfig) -> GatewaySettings {
    GatewaySettings {
        host: config.server.host.clone(),
        port: config.server.port,
        cors_origins: config.server.cors_origins.clone(),
        session: SessionSettings {
            cookie_name: config.auth.session_cookie.clone(),
            ttl_hours: config.auth.session_ttl_hours,
            secure: config.auth.secure_cookie,
        },
        image: ImagePolicy {
            default_model: config.venice.default_image_model.clone(),
            guest_model: config.venice.guest_image_model.clone(),
            guest_style_preset: config.venice.guest_style_preset.clone(),
        },
    }
}

/// Runs the `lagoon serve` command.
///
/// Opens storage, builds the provider and blob adapters, and serves the
/// gateway until SIGINT or SIGTERM.
pub async fn run_serve(config: LagoonConfig) -> Result<(), LagoonError> {
    init_tracing(&config.server.log_level);

    info!("starting lagoon serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let provider = Arc::new(VeniceProvider::new(&config.venice)?);
    let blob: Arc<dyn BlobAdapter> = lagoon_blob::build_blob_store(&config.blob)?;

    log_health(provider.as_ref()).await;
    log_health(blob.as_ref()).await;

    let state = AppState::new(
        provider.clone(),
        storage.clone(),
        Arc::clone(&blob),
        gateway_settings(&config),
    );

    let cancel = shutdown::install_signal_handler();
    let served = lagoon_gateway::start_server(state, cancel).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "storage close failed");
    }
    served?;

    info!("lagoon serve shutdown complete");
    Ok(())
}

async fn log_health<A: PluginAdapter + ?Sized>(adapter: &A) {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => info!(adapter = adapter.name(), "adapter healthy"),
        Ok(HealthStatus::Degraded(reason)) => {
            warn!(adapter = adapter.name(), %reason, "adapter degraded")
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = adapter.name(), %reason, "adapter unhealthy")
        }
        Err(e) => warn!(adapter = adapter.name(), error = %e, "health check failed"),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lagoon={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
