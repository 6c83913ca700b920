// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full gateway with mock provider and blob
//! adapters over a temp SQLite database, and drives the real router with
//! in-process requests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::{Duration, SecondsFormat, Utc};
use tower::ServiceExt;

use lagoon_config::model::StorageConfig;
use lagoon_core::types::{Session, User};
use lagoon_core::{Identity, LagoonError, StorageAdapter};
use lagoon_gateway::{AppState, GatewaySettings, build_router};
use lagoon_storage::SqliteStorage;

use crate::mock_blob::MockBlobStore;
use crate::mock_provider::{ImageOutcome, MockProvider};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    outcomes: Vec<ImageOutcome>,
    settings: GatewaySettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            settings: GatewaySettings::default(),
        }
    }

    /// Queue scripted provider outcomes.
    pub fn with_outcomes(mut self, outcomes: Vec<ImageOutcome>) -> Self {
        self.outcomes = outcomes;
        self
    }

    /// Pin guests to `model` and `style`.
    pub fn with_guest_policy(mut self, model: &str, style: Option<&str>) -> Self {
        self.settings.image.guest_model = model.to_string();
        self.settings.image.guest_style_preset = style.map(str::to_string);
        self
    }

    /// Build the harness, creating a temp database and mock adapters.
    pub async fn build(self) -> Result<TestHarness, LagoonError> {
        let temp_dir = tempfile::TempDir::new().map_err(LagoonError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let provider = Arc::new(MockProvider::with_outcomes(self.outcomes));
        let blob = Arc::new(MockBlobStore::new());

        let state = AppState::new(
            provider.clone(),
            Arc::clone(&storage),
            blob.clone(),
            self.settings,
        );

        Ok(TestHarness {
            provider,
            blob,
            storage,
            state,
            _temp_dir: temp_dir,
        })
    }
}

/// A response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or `Null` for an empty or non-JSON body.
    pub body: serde_json::Value,
}

/// A signed-in test user.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub identity: Identity,
    /// Value for the `Cookie` request header.
    pub cookie: String,
}

/// A complete gateway over mock adapters and temp storage.
pub struct TestHarness {
    pub provider: Arc<MockProvider>,
    pub blob: Arc<MockBlobStore>,
    pub storage: Arc<dyn StorageAdapter>,
    pub state: AppState,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Create a user of class `user_type` with a live session.
    pub async fn sign_in(&self, user_type: &str) -> Result<TestUser, LagoonError> {
        let now = Utc::now();
        let stamp = |t: chrono::DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Millis, true);

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: None,
            user_type: user_type.to_string(),
            created_at: stamp(now),
        };
        self.storage.create_user(&user).await?;

        let token = uuid::Uuid::new_v4().simple().to_string();
        self.storage
            .create_session(&Session {
                token: token.clone(),
                user_id: user.id.clone(),
                created_at: stamp(now),
                expires_at: stamp(now + Duration::hours(1)),
            })
            .await?;

        Ok(TestUser {
            identity: Identity::new(user.id, user.user_type),
            cookie: format!("{}={token}", self.state.settings.session.cookie_name),
        })
    }

    /// Bring `user_id`'s usage counter up to `count` in the current window.
    pub async fn set_usage(&self, user_id: &str, count: u32) -> Result<(), LagoonError> {
        let current = self.storage.usage_count(user_id).await?;
        for _ in current..count {
            self.storage.increment_usage(user_id).await?;
        }
        Ok(())
    }

    /// Current usage counter for `user_id`.
    pub async fn usage(&self, user_id: &str) -> Result<u32, LagoonError> {
        self.storage.usage_count(user_id).await
    }

    /// GET `uri`, optionally with a session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Result<TestResponse, LagoonError> {
        self.send(Method::GET, uri, cookie, Body::empty()).await
    }

    /// POST a JSON body to `uri`, optionally with a session cookie.
    pub async fn post_json(
        &self,
        uri: &str,
        cookie: Option<&str>,
        body: serde_json::Value,
    ) -> Result<TestResponse, LagoonError> {
        self.send(Method::POST, uri, cookie, Body::from(body.to_string()))
            .await
    }

    /// Send one request through a fresh router.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Body,
    ) -> Result<TestResponse, LagoonError> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder
            .body(body)
            .map_err(|e| LagoonError::Internal(format!("bad test request: {e}")))?;

        let response = build_router(self.state.clone())
            .oneshot(request)
            .await
            .map_err(|e| LagoonError::Internal(format!("router error: {e}")))?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| LagoonError::Internal(format!("unreadable body: {e}")))?;
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_and_signs_in() {
        let harness = TestHarness::builder().build().await.unwrap();
        let user = harness.sign_in("regular").await.unwrap();
        assert!(user.cookie.starts_with("lagoon_session="));

        let resolved = harness
            .storage
            .resolve_session(user.cookie.split_once('=').unwrap().1)
            .await
            .unwrap();
        assert_eq!(resolved, Some(user.identity));
    }

    #[tokio::test]
    async fn set_usage_reaches_target() {
        let harness = TestHarness::builder().build().await.unwrap();
        let user = harness.sign_in("guest").await.unwrap();
        harness.set_usage(&user.identity.user_id, 3).await.unwrap();
        assert_eq!(harness.usage(&user.identity.user_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn health_is_public() {
        let harness = TestHarness::builder().build().await.unwrap();
        let resp = harness.get("/health", None).await.unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["status"], "ok");
    }
}
