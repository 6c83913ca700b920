// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local filesystem blob store for single-host deployments.

use std::path::PathBuf;

use async_trait::async_trait;
use lagoon_config::model::BlobConfig;
use lagoon_core::types::BlobObject;
use lagoon_core::{AdapterType, BlobAdapter, HealthStatus, LagoonError, PluginAdapter};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Writes blobs under `directory`; URLs are `public_base_url/pathname`.
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(config: &BlobConfig) -> Result<Self, LagoonError> {
        let public_base_url = config.public_base_url.as_deref().ok_or_else(|| {
            LagoonError::Config("blob.public_base_url is required for the fs backend".into())
        })?;
        Ok(Self {
            root: PathBuf::from(&config.directory),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn blob_error(message: String, e: std::io::Error) -> LagoonError {
        LagoonError::Blob {
            message,
            source: Some(Box::new(e)),
        }
    }
}

#[async_trait]
impl PluginAdapter for FsBlobStore {
    fn name(&self) -> &str {
        "fs-blob"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Blob
    }

    async fn health_check(&self) -> Result<HealthStatus, LagoonError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            // Created lazily on first put.
            Err(_) => Ok(HealthStatus::Degraded(format!(
                "{} does not exist yet",
                self.root.display()
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), LagoonError> {
        Ok(())
    }
}

#[async_trait]
impl BlobAdapter for FsBlobStore {
    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobObject, LagoonError> {
        crate::validate_pathname(pathname)?;
        let target = self.root.join(pathname);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Self::blob_error(format!("cannot create {}", parent.display()), e)
            })?;
        }

        // Unique sibling temp file, then a hard link: readers never see a partial
        // blob and an existing object is never replaced.
        let file_name = pathname.rsplit('/').next().unwrap_or(pathname);
        let tmp = target.with_file_name(format!(
            ".{file_name}.{}.partial",
            uuid::Uuid::new_v4().simple()
        ));
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| Self::blob_error(format!("cannot create {}", tmp.display()), e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| Self::blob_error(format!("cannot write {}", tmp.display()), e))?;
        file.sync_all()
            .await
            .map_err(|e| Self::blob_error(format!("cannot sync {}", tmp.display()), e))?;
        drop(file);
        let published = tokio::fs::hard_link(&tmp, &target).await;
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            warn!(path = %tmp.display(), error = %e, "failed to remove temp blob");
        }
        published.map_err(|e| {
            let message = if e.kind() == std::io::ErrorKind::AlreadyExists {
                format!("{pathname} already exists")
            } else {
                format!("cannot publish {}", target.display())
            };
            Self::blob_error(message, e)
        })?;

        debug!(path = %target.display(), size = bytes.len(), "blob written");
        Ok(BlobObject {
            url: format!("{}/{pathname}", self.public_base_url),
            pathname: pathname.to_string(),
            content_type: content_type.to_string(),
        })
    }
}
