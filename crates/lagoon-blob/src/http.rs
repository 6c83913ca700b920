// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hosted object store client.
//!
//! `PUT {base_url}/{pathname}` with the raw bytes and a bearer token; the
//! store answers with the public URL of the object.

use std::time::Duration;

use async_trait::async_trait;
use lagoon_config::model::BlobConfig;
use lagoon_core::types::BlobObject;
use lagoon_core::{AdapterType, BlobAdapter, HealthStatus, LagoonError, PluginAdapter};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, warn};

const API_VERSION: &str = "7";

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
    #[serde(default)]
    pathname: Option<String>,
    #[serde(rename = "contentType", default)]
    content_type: Option<String>,
}

/// Blob store backed by an HTTP object storage service.
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBlobStore {
    /// Token resolution order: `[blob] token` -> `BLOB_READ_WRITE_TOKEN` -> none.
    pub fn new(config: &BlobConfig) -> Result<Self, LagoonError> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("BLOB_READ_WRITE_TOKEN").ok().filter(|t| !t.is_empty()));
        if token.is_none() {
            warn!("BLOB_READ_WRITE_TOKEN not set; uploads will fail");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LagoonError::Blob {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Replace the token (tests and explicit wiring).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl PluginAdapter for HttpBlobStore {
    fn name(&self) -> &str {
        "http-blob"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Blob
    }

    async fn health_check(&self) -> Result<HealthStatus, LagoonError> {
        if self.token.is_some() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("BLOB_READ_WRITE_TOKEN not set".into()))
        }
    }

    async fn shutdown(&self) -> Result<(), LagoonError> {
        Ok(())
    }
}

#[async_trait]
impl BlobAdapter for HttpBlobStore {
    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobObject, LagoonError> {
        crate::validate_pathname(pathname)?;
        let token = self.token.as_deref().ok_or_else(|| LagoonError::Blob {
            message: "BLOB_READ_WRITE_TOKEN not set".into(),
            source: None,
        })?;

        let size = bytes.len();
        let response = self
            .client
            .put(format!("{}/{pathname}", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, content_type)
            .header("x-content-type", content_type)
            .header("x-api-version", API_VERSION)
            .header("x-add-random-suffix", "0")
            .header("x-allow-overwrite", "0")
            .body(bytes)
            .send()
            .await
            .map_err(|e| LagoonError::Blob {
                message: format!("upload request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match response.text().await {
                Ok(body) => LagoonError::Blob {
                    message: format!("upload rejected: {} {body}", status.as_u16()),
                    source: None,
                },
                Err(e) => LagoonError::Blob {
                    message: format!("upload rejected: {} (body unreadable: {e})", status.as_u16()),
                    source: Some(Box::new(e)),
                },
            });
        }

        let put: PutResponse = response.json().await.map_err(|e| LagoonError::Blob {
            message: format!("unreadable upload response: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(pathname, size, url = %put.url, "blob uploaded");

        Ok(BlobObject {
            url: put.url,
            pathname: put.pathname.unwrap_or_else(|| pathname.to_string()),
            content_type: put.content_type.unwrap_or_else(|| content_type.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> HttpBlobStore {
        let config = BlobConfig {
            base_url: server.uri(),
            ..BlobConfig::default()
        };
        HttpBlobStore::new(&config).unwrap().with_token("rw-token")
    }

    #[tokio::test]
    async fn put_uploads_bytes_and_returns_url() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/generated-image-1.png"))
            .and(header("authorization", "Bearer rw-token"))
            .and(header("x-content-type", "image/png"))
            .and(body_bytes(vec![9u8, 8, 7]))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": "https://cdn.example.com/generated-image-1.png",
                "pathname": "generated-image-1.png",
                "contentType": "image/png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let object = store(&server)
            .put("generated-image-1.png", vec![9, 8, 7], "image/png")
            .await
            .unwrap();
        assert_eq!(object.url, "https://cdn.example.com/generated-image-1.png");
        assert_eq!(object.content_type, "image/png");
    }

    #[tokio::test]
    async fn minimal_response_keeps_requested_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn/x.png"})),
            )
            .mount(&server)
            .await;

        let object = store(&server).put("x.png", vec![1], "image/png").await.unwrap();
        assert_eq!(object.pathname, "x.png");
        assert_eq!(object.content_type, "image/png");
    }

    #[tokio::test]
    async fn rejected_upload_is_blob_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = store(&server).put("x.png", vec![1], "image/png").await.unwrap_err();
        match err {
            LagoonError::Blob { message, .. } => assert_eq!(message, "upload rejected: 403 forbidden"),
            other => panic!("expected Blob error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn traversal_pathname_never_reaches_server() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert!(store(&server).put("../escape.png", vec![1], "image/png").await.is_err());
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"url": "https://cdn/x.png"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = BlobConfig {
            base_url: server.uri(),
            timeout_secs: 1,
            ..BlobConfig::default()
        };
        let store = HttpBlobStore::new(&config).unwrap().with_token("rw-token");
        let err = store.put("x.png", vec![1], "image/png").await.unwrap_err();
        match err {
            LagoonError::Blob { message, .. } => {
                assert!(message.starts_with("upload request failed"), "{message}")
            }
            other => panic!("expected Blob error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_never_asks_for_overwrite() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(header("x-allow-overwrite", "0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn/x.png"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        store(&server).put("x.png", vec![1], "image/png").await.unwrap();
    }
}
