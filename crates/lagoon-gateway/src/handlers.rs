// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for catalogs, usage and health.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use lagoon_core::Identity;
use serde::Serialize;

use crate::error::{ApiError, Surface, catalog_error};
use crate::server::AppState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /api/chat/models
///
/// Never fails: the provider falls back to the static list.
pub async fn get_chat_models(State(state): State<AppState>) -> Response {
    Json(state.provider.chat_models().await).into_response()
}

/// GET /api/chat/traits
pub async fn get_chat_traits(State(state): State<AppState>) -> Response {
    Json(state.provider.model_traits().await).into_response()
}

/// GET /api/image/models
pub async fn get_image_models(State(state): State<AppState>) -> Response {
    match state.provider.image_models().await {
        Ok(models) => Json(models).into_response(),
        Err(e) => catalog_error(e),
    }
}

/// GET /api/image/styles
pub async fn get_image_styles(State(state): State<AppState>) -> Response {
    match state.provider.image_styles().await {
        Ok(styles) => Json(styles).into_response(),
        Err(e) => catalog_error(e),
    }
}

/// GET /api/usage
pub async fn get_usage(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Response {
    match state.quota.snapshot(&identity).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::error!(error = %e, user_id = %identity.user_id, "usage lookup failed");
            ApiError::new(e.kind(), Surface::Chat, "Unable to read usage.").into_response()
        }
    }
}
