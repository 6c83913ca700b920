// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blob storage backends for publishing generated images.
//!
//! - [`HttpBlobStore`]: uploads to a hosted object store with a read-write token
//! - [`FsBlobStore`]: writes into a local directory served under a public URL

pub mod fs;
pub mod http;

use std::sync::Arc;

use lagoon_config::model::{BlobBackend, BlobConfig};
use lagoon_core::{BlobAdapter, LagoonError};

pub use fs::FsBlobStore;
pub use http::HttpBlobStore;

/// Build the blob store selected by `[blob] backend`.
pub fn build_blob_store(config: &BlobConfig) -> Result<Arc<dyn BlobAdapter>, LagoonError> {
    match config.backend {
        BlobBackend::Http => Ok(Arc::new(HttpBlobStore::new(config)?)),
        BlobBackend::Fs => Ok(Arc::new(FsBlobStore::new(config)?)),
    }
}

/// Reject pathnames that are empty, absolute, or climb out of the store root.
pub(crate) fn validate_pathname(pathname: &str) -> Result<(), LagoonError> {
    let bad = pathname.is_empty()
        || pathname.starts_with('/')
        || pathname.contains('\\')
        || pathname.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(LagoonError::Blob {
            message: format!("invalid blob pathname `{pathname}`"),
            source: None,
        });
    }
    Ok(())
}
