// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lagoon chat backend.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by the storage, provider, blob, and gateway crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, LagoonError};
pub use types::{AdapterType, ChatModel, HealthStatus, Identity, ImageModel, UserType};

pub use traits::{BlobAdapter, PluginAdapter, ProviderAdapter, StorageAdapter};
