// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! POST /api/image/generate
//!
//! Order of operations: parse body, require a prompt, apply the guest
//! model/style policy, check quota, call the provider, upload the PNG, then
//! record usage. Usage is only recorded once both the provider call and the
//! upload have succeeded.

use axum::{Extension, Json, body::Bytes, extract::State};
use chrono::Utc;
use lagoon_core::types::ImageRequest;
use lagoon_core::{Identity, LagoonError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ImagePolicy;
use crate::error::ApiError;
use crate::server::AppState;

/// Content type of every uploaded image.
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Request body for POST /api/image/generate.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub style_preset: Option<String>,
}

/// Response body for POST /api/image/generate.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub url: String,
}

/// Resolve the parameters actually sent to the provider.
///
/// Guests always get the policy's guest model and style, whatever they asked
/// for. Everyone else gets their requested model or the default, and their
/// requested style.
pub fn effective_request(
    identity: &Identity,
    body: GenerateRequest,
    policy: &ImagePolicy,
) -> Result<ImageRequest, LagoonError> {
    let prompt = body
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| LagoonError::BadRequest("Prompt is required.".to_string()))?;

    if identity.is_guest() {
        return Ok(ImageRequest {
            model: policy.guest_model.clone(),
            prompt,
            style_preset: policy.guest_style_preset.clone(),
        });
    }

    Ok(ImageRequest {
        model: body
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| policy.default_model.clone()),
        prompt,
        style_preset: body.style_preset.filter(|s| !s.is_empty()),
    })
}

/// Blob pathname for a new image: creation time plus a random suffix, so two
/// generations in the same millisecond never share an object.
pub fn image_pathname() -> String {
    format!(
        "generated-image-{}-{}.png",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

/// Run one generation for `identity` and return the public image URL.
pub async fn generate(
    state: &AppState,
    identity: &Identity,
    body: GenerateRequest,
) -> Result<String, LagoonError> {
    let request = effective_request(identity, body, &state.settings.image)?;
    state.quota.check(identity).await?;

    tracing::debug!(
        user_id = %identity.user_id,
        model = %request.model,
        "forwarding image generation"
    );
    let image = state.provider.generate_image(request).await?;

    let pathname = image_pathname();
    let blob = state
        .blob
        .put(&pathname, image.bytes, IMAGE_CONTENT_TYPE)
        .await?;

    if let Err(e) = state.quota.record(identity).await {
        tracing::error!(
            error = %e,
            user_id = %identity.user_id,
            "image generated but usage was not recorded"
        );
    }

    tracing::info!(user_id = %identity.user_id, pathname = %blob.pathname, "image generated");
    Ok(blob.url)
}

/// POST /api/image/generate
pub async fn post_generate(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let body: GenerateRequest = serde_json::from_slice(&body).map_err(|e| {
        ApiError::from_generate(LagoonError::BadRequest(format!("Invalid request body: {e}")))
    })?;

    let url = generate(&state, &identity, body)
        .await
        .map_err(ApiError::from_generate)?;
    Ok(Json(GenerateResponse { url }))
}
