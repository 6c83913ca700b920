// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory blob store that records uploads.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use lagoon_core::traits::adapter::PluginAdapter;
use lagoon_core::traits::blob::BlobAdapter;
use lagoon_core::types::{AdapterType, BlobObject, HealthStatus};
use lagoon_core::LagoonError;

/// Public URL prefix of every mock blob.
pub const MOCK_BLOB_BASE: &str = "https://blob.test";

/// One recorded upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub pathname: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// A blob store that keeps uploads in memory.
#[derive(Default)]
pub struct MockBlobStore {
    stored: Mutex<Vec<StoredBlob>>,
    failing: AtomicBool,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent uploads fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every successful upload, in call order.
    pub async fn stored(&self) -> Vec<StoredBlob> {
        self.stored.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockBlobStore {
    fn name(&self) -> &str {
        "mock-blob"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Blob
    }

    async fn health_check(&self) -> Result<HealthStatus, LagoonError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LagoonError> {
        Ok(())
    }
}

#[async_trait]
impl BlobAdapter for MockBlobStore {
    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobObject, LagoonError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LagoonError::Blob {
                message: "mock upload rejected".to_string(),
                source: None,
            });
        }

        self.stored.lock().await.push(StoredBlob {
            pathname: pathname.to_string(),
            bytes,
            content_type: content_type.to_string(),
        });

        Ok(BlobObject {
            url: format!("{MOCK_BLOB_BASE}/{pathname}"),
            pathname: pathname.to_string(),
            content_type: content_type.to_string(),
        })
    }
}
