// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock image provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured outcomes,
//! enabling fast, CI-runnable tests without calls to the real provider.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use lagoon_core::traits::adapter::PluginAdapter;
use lagoon_core::traits::provider::ProviderAdapter;
use lagoon_core::types::{
    AdapterType, ChatModel, GeneratedImage, HealthStatus, ImageModel, ImageRequest, ModelTraits,
};
use lagoon_core::LagoonError;

/// Bytes returned when no outcome is queued: the 8-byte PNG signature.
pub const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// One scripted result of `generate_image`.
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    /// Succeed with these bytes.
    Image(Vec<u8>),
    /// Provider rejected the request; surfaces as `BadRequest`.
    Rejected(String),
    /// Transport failure; surfaces as `Provider`.
    Unreachable(String),
}

/// A mock provider that returns scripted outcomes and records requests.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, a PNG
/// signature is returned.
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<ImageOutcome>>>,
    requests: Arc<Mutex<Vec<ImageRequest>>>,
    catalog_down: AtomicBool,
}

impl MockProvider {
    /// Create a mock provider with an empty outcome queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            catalog_down: AtomicBool::new(false),
        }
    }

    /// Create a mock provider pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<ImageOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            ..Self::new()
        }
    }

    /// Add an outcome to the end of the queue.
    pub async fn push_outcome(&self, outcome: ImageOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Make the image model and style catalogs fail like a non-2xx response.
    pub fn set_catalog_down(&self, down: bool) {
        self.catalog_down.store(down, Ordering::SeqCst);
    }

    /// Every request passed to `generate_image`, in call order.
    pub async fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().await.clone()
    }

    fn catalog_error(&self, what: &str) -> Option<LagoonError> {
        self.catalog_down
            .load(Ordering::SeqCst)
            .then(|| LagoonError::Provider {
                message: format!("Failed to fetch Venice {what}: 500 upstream down"),
                source: None,
            })
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, LagoonError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LagoonError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, LagoonError> {
        self.requests.lock().await.push(request);
        let outcome = self.outcomes.lock().await.pop_front();
        match outcome.unwrap_or_else(|| ImageOutcome::Image(PNG_SIGNATURE.to_vec())) {
            ImageOutcome::Image(bytes) => Ok(GeneratedImage {
                bytes,
                content_type: "image/png".to_string(),
            }),
            ImageOutcome::Rejected(detail) => {
                Err(LagoonError::BadRequest(format!("Venice API error: {detail}")))
            }
            ImageOutcome::Unreachable(message) => Err(LagoonError::Provider {
                message,
                source: None,
            }),
        }
    }

    async fn chat_models(&self) -> Vec<ChatModel> {
        vec![ChatModel {
            id: "chat-model".to_string(),
            name: "Default".to_string(),
            description: "Mock chat model".to_string(),
            model_id: Some("llama-3.3-70b".to_string()),
            model_trait: Some("default".to_string()),
        }]
    }

    async fn image_models(&self) -> Result<Vec<ImageModel>, LagoonError> {
        if let Some(err) = self.catalog_error("models") {
            return Err(err);
        }
        Ok(vec![ImageModel {
            id: "venice-sd35".to_string(),
            name: "Venice SD35".to_string(),
            description: String::new(),
        }])
    }

    async fn image_styles(&self) -> Result<Vec<String>, LagoonError> {
        if let Some(err) = self.catalog_error("image styles") {
            return Err(err);
        }
        Ok(vec!["Photographic".to_string(), "Anime".to_string()])
    }

    async fn model_traits(&self) -> ModelTraits {
        ModelTraits {
            default: Some("llama-3.3-70b".to_string()),
            ..ModelTraits::default()
        }
    }
}
