// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use lagoon_core::{BlobAdapter, LagoonError, ProviderAdapter, StorageAdapter};
use lagoon_quota::QuotaGate;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{post_guest, session_middleware};
use crate::generate::post_generate;
use crate::handlers;
use crate::GatewaySettings;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ProviderAdapter>,
    pub storage: Arc<dyn StorageAdapter>,
    pub blob: Arc<dyn BlobAdapter>,
    pub quota: QuotaGate,
    pub settings: Arc<GatewaySettings>,
    pub health: HealthState,
}

impl AppState {
    /// Assemble state from adapters. The quota gate shares `storage`.
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        storage: Arc<dyn StorageAdapter>,
        blob: Arc<dyn BlobAdapter>,
        settings: GatewaySettings,
    ) -> Self {
        Self {
            quota: QuotaGate::new(Arc::clone(&storage)),
            provider,
            storage,
            blob,
            settings: Arc::new(settings),
            health: HealthState::new(),
        }
    }
}

/// Build the application router.
///
/// - GET /health, GET /api/chat/models, GET /api/chat/traits,
///   GET /api/image/models, GET /api/image/styles, POST /api/auth/guest (public)
/// - POST /api/image/generate, GET /api/usage (session required)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/chat/models", get(handlers::get_chat_models))
        .route("/api/chat/traits", get(handlers::get_chat_traits))
        .route("/api/image/models", get(handlers::get_image_models))
        .route("/api/image/styles", get(handlers::get_image_styles))
        .route("/api/auth/guest", post(post_guest))
        .with_state(state.clone());

    let guarded_routes = Router::new()
        .route("/api/image/generate", post(post_generate))
        .route("/api/usage", get(handlers::get_usage))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .layer(TraceLayer::new_for_http());

    match cors_layer(&state.settings.cors_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// CORS for the configured origins, or `None` when no origin is configured.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}

/// Bind and serve until `cancel` fires.
pub async fn start_server(state: AppState, cancel: CancellationToken) -> Result<(), LagoonError> {
    let addr = format!("{}:{}", state.settings.host, state.settings.port);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LagoonError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| LagoonError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
