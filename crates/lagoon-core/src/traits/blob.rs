// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blob adapter trait for publishing generated files.

use async_trait::async_trait;

use crate::error::LagoonError;
use crate::traits::adapter::PluginAdapter;
use crate::types::BlobObject;

/// Adapter for public object storage.
#[async_trait]
pub trait BlobAdapter: PluginAdapter {
    /// Stores `bytes` under `pathname` with public read access.
    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobObject, LagoonError>;
}
