// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Venice.ai provider adapter for the Lagoon chat backend.
//!
//! This crate implements [`ProviderAdapter`] for the Venice.ai API: the chat,
//! image, style, and trait catalogs (each cached for `catalog_ttl_secs`) and
//! binary image generation.

pub mod catalog;
pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use lagoon_config::model::VeniceConfig;
use lagoon_core::error::LagoonError;
use lagoon_core::traits::{PluginAdapter, ProviderAdapter};
use lagoon_core::types::{
    AdapterType, ChatModel, GeneratedImage, HealthStatus, ImageModel, ImageRequest, ModelTraits,
};
use tracing::{debug, info, warn};

use crate::catalog::TtlCache;
use crate::client::VeniceClient;
use crate::types::ImageGenerateRequest;

/// Venice.ai provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `VENICE_API_KEY` env var -> none.
/// Without a key the chat and trait catalogs serve their static fallbacks
/// and the image catalogs return errors.
pub struct VeniceProvider {
    client: VeniceClient,
    image_width: u32,
    image_height: u32,
    chat_models: TtlCache<Vec<ChatModel>>,
    traits: TtlCache<ModelTraits>,
    image_models: TtlCache<Vec<ImageModel>>,
    image_styles: TtlCache<Vec<String>>,
}

impl VeniceProvider {
    /// Creates a new Venice provider from the `[venice]` config section.
    pub fn new(config: &VeniceConfig) -> Result<Self, LagoonError> {
        let api_key = resolve_api_key(&config.api_key);
        if api_key.is_none() {
            warn!("VENICE_API_KEY not set; chat catalog will use static models");
        }

        let client = VeniceClient::new(api_key, Duration::from_secs(config.timeout_secs))?
            .with_base_url(config.base_url.clone());
        let ttl = Duration::from_secs(config.catalog_ttl_secs);

        info!(
            base_url = %config.base_url,
            catalog_ttl_secs = config.catalog_ttl_secs,
            "Venice provider initialized"
        );

        Ok(Self {
            client,
            image_width: config.image_width,
            image_height: config.image_height,
            chat_models: TtlCache::new(ttl),
            traits: TtlCache::new(ttl),
            image_models: TtlCache::new(ttl),
            image_styles: TtlCache::new(ttl),
        })
    }

    fn to_generate_request(&self, request: ImageRequest) -> ImageGenerateRequest {
        ImageGenerateRequest {
            model: request.model,
            prompt: request.prompt,
            width: self.image_width,
            height: self.image_height,
            return_binary: true,
            format: "png".to_string(),
            style_preset: request.style_preset,
            hide_watermark: true,
            safe_mode: false,
        }
    }
}

#[async_trait]
impl PluginAdapter for VeniceProvider {
    fn name(&self) -> &str {
        "venice"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, LagoonError> {
        if self.client.has_key() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded("VENICE_API_KEY not set".into()))
        }
    }

    async fn shutdown(&self) -> Result<(), LagoonError> {
        debug!("Venice provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for VeniceProvider {
    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, LagoonError> {
        let api_request = self.to_generate_request(request);
        let bytes = self.client.generate_image(&api_request).await?;
        debug!(bytes = bytes.len(), model = %api_request.model, "image generated");
        Ok(GeneratedImage {
            bytes,
            content_type: "image/png".to_string(),
        })
    }

    async fn chat_models(&self) -> Vec<ChatModel> {
        if let Some(models) = self.chat_models.get().await {
            return models;
        }

        match self.client.list_models(None).await {
            Ok(response) => {
                let models = catalog::chat_models_from(&response);
                if models.is_empty() {
                    warn!("no online text models from Venice, using static models");
                    return catalog::static_chat_models();
                }
                self.chat_models.put(models.clone()).await;
                models
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch Venice models, using static models");
                catalog::static_chat_models()
            }
        }
    }

    async fn image_models(&self) -> Result<Vec<ImageModel>, LagoonError> {
        if let Some(models) = self.image_models.get().await {
            return Ok(models);
        }
        let response = self.client.list_models(Some("image")).await?;
        let models = catalog::image_models_from(&response);
        debug!(count = models.len(), "fetched Venice image models");
        self.image_models.put(models.clone()).await;
        Ok(models)
    }

    async fn image_styles(&self) -> Result<Vec<String>, LagoonError> {
        if let Some(styles) = self.image_styles.get().await {
            return Ok(styles);
        }
        let styles = self.client.image_styles().await?.data;
        self.image_styles.put(styles.clone()).await;
        Ok(styles)
    }

    async fn model_traits(&self) -> ModelTraits {
        if let Some(traits) = self.traits.get().await {
            return traits;
        }
        match self.client.model_traits().await {
            Ok(response) => {
                self.traits.put(response.data.clone()).await;
                response.data
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch Venice traits, using defaults");
                catalog::default_traits()
            }
        }
    }
}

/// Resolves the API key from config, then the `VENICE_API_KEY` environment variable.
fn resolve_api_key(config_key: &Option<String>) -> Option<String> {
    pick_api_key(config_key.as_deref(), std::env::var("VENICE_API_KEY").ok())
}

fn pick_api_key(config_key: Option<&str>, env_key: Option<String>) -> Option<String> {
    config_key
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or(env_key.filter(|k| !k.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str, api_key: Option<&str>) -> VeniceConfig {
        VeniceConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            ..VeniceConfig::default()
        }
    }

    fn provider(server: &MockServer) -> VeniceProvider {
        VeniceProvider::new(&config(&server.uri(), Some("vn-test"))).unwrap()
    }

    #[test]
    fn config_key_takes_precedence() {
        assert_eq!(
            pick_api_key(Some("from-config"), Some("from-env".into())).as_deref(),
            Some("from-config")
        );
    }

    #[test]
    fn empty_config_key_falls_back_to_env() {
        assert_eq!(
            pick_api_key(Some(""), Some("from-env".into())).as_deref(),
            Some("from-env")
        );
        assert_eq!(pick_api_key(None, Some(String::new())), None);
        assert_eq!(pick_api_key(None, None), None);
    }

    #[tokio::test]
    async fn chat_models_are_classified_and_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": "qwen3-235b",
                    "type": "text",
                    "model_spec": {
                        "name": "Qwen 3 235B",
                        "traits": ["default_code"],
                        "capabilities": {"optimizedForCode": true}
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server);
        let first = provider.chat_models().await;
        let second = provider.chat_models().await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "Code");
        assert_eq!(first[0].description, "Qwen 3 235B - Optimized for programming");
    }

    #[tokio::test]
    async fn chat_models_fall_back_on_error_and_do_not_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert_eq!(provider.chat_models().await, catalog::static_chat_models());
        assert_eq!(provider.chat_models().await.len(), 6);
    }

    #[tokio::test]
    async fn chat_models_fall_back_when_no_text_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "x", "type": "text", "model_spec": {"name": "X", "offline": true}}]
            })))
            .mount(&server)
            .await;

        assert_eq!(provider(&server).chat_models().await, catalog::static_chat_models());
    }

    /// Run `f` with `VENICE_API_KEY` set to `value`, restoring it afterwards.
    fn with_env_key<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let saved = std::env::var("VENICE_API_KEY").ok();
        // SAFETY: every test touching the environment is #[serial].
        unsafe {
            match value {
                Some(v) => std::env::set_var("VENICE_API_KEY", v),
                None => std::env::remove_var("VENICE_API_KEY"),
            }
        }
        let out = f();
        unsafe {
            match saved {
                Some(v) => std::env::set_var("VENICE_API_KEY", v),
                None => std::env::remove_var("VENICE_API_KEY"),
            }
        }
        out
    }

    #[test]
    #[serial]
    fn env_key_fills_missing_config_key() {
        let key = with_env_key(Some("vn-env"), || resolve_api_key(&None));
        assert_eq!(key.as_deref(), Some("vn-env"));
    }

    #[tokio::test]
    #[serial]
    async fn chat_models_without_key_use_static_list() {
        let provider = with_env_key(None, || {
            VeniceProvider::new(&config("http://127.0.0.1:9", None))
        })
        .unwrap();

        assert_eq!(provider.chat_models().await.len(), 6);
        match provider.image_models().await {
            Err(e) => assert_eq!(e.to_string(), "VENICE_API_KEY not set"),
            Ok(models) => panic!("expected missing-key error, got {models:?}"),
        }
        assert!(matches!(
            provider.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }

    #[tokio::test]
    async fn image_models_error_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("type", "image"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("type", "image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "flux-dev", "type": "image", "model_spec": {"name": "FLUX.1"}}]
            })))
            .mount(&server)
            .await;

        let provider = provider(&server);
        let err = provider.image_models().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch Venice models: 503 maintenance");

        let models = provider.image_models().await.unwrap();
        assert_eq!(models[0].name, "FLUX.1");
        assert_eq!(models[0].description, "");
    }

    #[tokio::test]
    async fn image_styles_are_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/image/styles"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": ["3D Model", "Anime", "Photographic"]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert_eq!(provider.image_styles().await.unwrap().len(), 3);
        assert_eq!(provider.image_styles().await.unwrap()[1], "Anime");
    }

    #[tokio::test]
    async fn traits_fall_back_to_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/traits"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(provider(&server).model_traits().await, catalog::default_traits());
    }

    #[tokio::test]
    async fn traits_from_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/traits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"default": "llama-3.3-70b", "most_intelligent": "qwen3-235b"},
                "object": "list"
            })))
            .mount(&server)
            .await;

        let traits = provider(&server).model_traits().await;
        assert_eq!(traits.most_intelligent.as_deref(), Some("qwen3-235b"));
        assert!(traits.fastest.is_none());
    }

    #[tokio::test]
    async fn generate_image_uses_configured_canvas() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/image/generate"))
            .and(wiremock::matchers::body_partial_json(json!({
                "model": "flux-dev",
                "width": 1024,
                "height": 1024,
                "format": "png"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1, 2, 3], "image/png"))
            .expect(1)
            .mount(&server)
            .await;

        let image = provider(&server)
            .generate_image(ImageRequest {
                model: "flux-dev".into(),
                prompt: "a lighthouse".into(),
                style_preset: None,
            })
            .await
            .unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.content_type, "image/png");
    }
}
