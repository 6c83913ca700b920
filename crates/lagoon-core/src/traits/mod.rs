// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can be held as `Arc<dyn ...>` in shared state.

pub mod adapter;
pub mod blob;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use blob::BlobAdapter;
pub use provider::ProviderAdapter;
pub use storage::StorageAdapter;
