// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Venice.ai REST API.
//!
//! Provides [`VeniceClient`] which handles bearer authentication, the catalog
//! endpoints, and binary image generation. No request is retried.

use std::time::Duration;

use lagoon_core::LagoonError;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{
    ImageGenerateRequest, ModelsResponse, StylesResponse, TraitsResponse, error_detail,
};

/// Base URL for the Venice.ai API.
pub const API_BASE_URL: &str = "https://api.venice.ai/api/v1";

/// HTTP client for Venice.ai API communication.
///
/// Built with or without an API key. Catalog calls that require a key fail
/// fast when none is configured.
#[derive(Debug, Clone)]
pub struct VeniceClient {
    client: reqwest::Client,
    base_url: String,
    has_key: bool,
}

impl VeniceClient {
    /// Creates a new Venice API client.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, LagoonError> {
        let mut headers = HeaderMap::new();
        let has_key = api_key.is_some();
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                LagoonError::Config(format!("invalid API key header value: {e}"))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LagoonError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            has_key,
        })
    }

    /// Overrides the base URL (configured endpoint or a wiremock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_key(&self) -> bool {
        self.has_key
    }

    fn require_key(&self) -> Result<(), LagoonError> {
        if self.has_key {
            Ok(())
        } else {
            Err(LagoonError::Provider {
                message: "VENICE_API_KEY not set".into(),
                source: None,
            })
        }
    }

    /// `GET /models`, optionally narrowed with `?type=`.
    pub async fn list_models(&self, model_type: Option<&str>) -> Result<ModelsResponse, LagoonError> {
        self.require_key()?;
        let url = match model_type {
            Some(model_type) => format!("{}/models?type={model_type}", self.base_url),
            None => format!("{}/models", self.base_url),
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response, "Failed to fetch Venice models").await?;
        decode(response).await
    }

    /// `GET /models/traits`.
    pub async fn model_traits(&self) -> Result<TraitsResponse, LagoonError> {
        self.require_key()?;
        let response = self
            .client
            .get(format!("{}/models/traits", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response, "Failed to fetch traits").await?;
        decode(response).await
    }

    /// `GET /image/styles`.
    pub async fn image_styles(&self) -> Result<StylesResponse, LagoonError> {
        self.require_key()?;
        let response = self
            .client
            .get(format!("{}/image/styles", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response, "Failed to fetch Venice image styles").await?;
        decode(response).await
    }

    /// `POST /image/generate` with `return_binary`; returns the image bytes.
    ///
    /// A non-2xx response with a JSON body is a [`LagoonError::BadRequest`]
    /// carrying the provider's detail. Anything else that goes wrong is a
    /// [`LagoonError::Provider`].
    pub async fn generate_image(
        &self,
        request: &ImageGenerateRequest,
    ) -> Result<Vec<u8>, LagoonError> {
        let response = self
            .client
            .post(format!("{}/image/generate", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "image generation response received");

        if !status.is_success() {
            let body: serde_json::Value = response.json().await.map_err(|e| LagoonError::Provider {
                message: format!("unreadable error body from image generation ({status}): {e}"),
                source: Some(Box::new(e)),
            })?;
            return Err(LagoonError::BadRequest(format!(
                "Venice API error: {}",
                error_detail(&body)
            )));
        }

        let bytes = response.bytes().await.map_err(|e| LagoonError::Provider {
            message: format!("failed to read image body: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(bytes.to_vec())
    }
}

fn transport_error(e: reqwest::Error) -> LagoonError {
    LagoonError::Provider {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Pass 2xx responses through; turn anything else into `"<context>: <status> <body>"`.
async fn ensure_success(
    response: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, LagoonError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match response.text().await {
        Ok(body) => Err(LagoonError::Provider {
            message: status_message(context, status, &body),
            source: None,
        }),
        Err(e) => {
            warn!(%status, error = %e, "failed to read error body");
            Err(LagoonError::Provider {
                message: status_message(context, status, "(body unreadable)"),
                source: Some(Box::new(e)),
            })
        }
    }
}

fn status_message(context: &str, status: StatusCode, body: &str) -> String {
    format!("{context}: {} {body}", status.as_u16())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LagoonError> {
    let body = response.text().await.map_err(|e| LagoonError::Provider {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| LagoonError::Provider {
        message: format!("failed to parse API response: {e}"),
        source: Some(Box::new(e)),
    })
}
