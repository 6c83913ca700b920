// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for the upstream AI API (Venice.ai).

use async_trait::async_trait;

use crate::error::LagoonError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatModel, GeneratedImage, ImageModel, ImageRequest, ModelTraits};

/// Adapter for the upstream AI provider.
///
/// The two catalog families deliberately differ in failure behavior:
/// chat models and traits degrade to static lists, while image models and
/// style presets return an error.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Generates one image and returns its binary body.
    ///
    /// A provider-side rejection is [`LagoonError::BadRequest`]; a transport
    /// failure is [`LagoonError::Provider`].
    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, LagoonError>;

    /// Lists selectable chat models, falling back to the static list on any failure.
    async fn chat_models(&self) -> Vec<ChatModel>;

    /// Lists image generation models.
    async fn image_models(&self) -> Result<Vec<ImageModel>, LagoonError>;

    /// Lists image style presets.
    async fn image_styles(&self) -> Result<Vec<String>, LagoonError>;

    /// Returns the provider's trait -> model mapping, or static defaults on failure.
    async fn model_traits(&self) -> ModelTraits;
}
