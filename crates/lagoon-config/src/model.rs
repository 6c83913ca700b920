// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lagoon chat backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Lagoon configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LagoonConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Venice.ai provider settings.
    #[serde(default)]
    pub venice: VeniceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Blob storage settings for generated images.
    #[serde(default)]
    pub blob: BlobConfig,

    /// Session cookie settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the server to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Origins allowed by CORS. Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Venice.ai provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VeniceConfig {
    /// Venice API key. `None` falls back to the `VENICE_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Venice API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Revalidation window for catalog responses in seconds.
    #[serde(default = "default_catalog_ttl_secs")]
    pub catalog_ttl_secs: u64,

    /// Image model used when a signed-in user does not pick one.
    #[serde(default = "default_image_model")]
    pub default_image_model: String,

    /// Image model every guest request is pinned to.
    #[serde(default = "default_image_model")]
    pub guest_image_model: String,

    /// Style preset every guest request is pinned to. `None` sends no style.
    #[serde(default)]
    pub guest_style_preset: Option<String>,

    /// Generated image width in pixels.
    #[serde(default = "default_image_dimension")]
    pub image_width: u32,

    /// Generated image height in pixels.
    #[serde(default = "default_image_dimension")]
    pub image_height: u32,
}

impl Default for VeniceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            catalog_ttl_secs: default_catalog_ttl_secs(),
            default_image_model: default_image_model(),
            guest_image_model: default_image_model(),
            guest_style_preset: None,
            image_width: default_image_dimension(),
            image_height: default_image_dimension(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.venice.ai/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_catalog_ttl_secs() -> u64 {
    3600
}

fn default_image_model() -> String {
    "venice-sd35".to_string()
}

fn default_image_dimension() -> u32 {
    1024
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("lagoon").join("lagoon.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("lagoon.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Which blob store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    /// Remote object store reached over HTTP PUT.
    #[default]
    Http,
    /// Local directory, served under `public_base_url`.
    Fs,
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlobConfig {
    /// Blob store implementation.
    #[serde(default)]
    pub backend: BlobBackend,

    /// Upload endpoint for the HTTP backend.
    #[serde(default = "default_blob_base_url")]
    pub base_url: String,

    /// Read-write token for the HTTP backend. `None` falls back to `BLOB_READ_WRITE_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,

    /// Target directory for the filesystem backend.
    #[serde(default = "default_blob_directory")]
    pub directory: String,

    /// Public URL prefix under which filesystem blobs are served.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Upload timeout in seconds for the HTTP backend.
    #[serde(default = "default_blob_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::default(),
            base_url: default_blob_base_url(),
            token: None,
            directory: default_blob_directory(),
            public_base_url: None,
            timeout_secs: default_blob_timeout_secs(),
        }
    }
}

fn default_blob_timeout_secs() -> u64 {
    60
}

fn default_blob_base_url() -> String {
    "https://blob.vercel-storage.com".to_string()
}

fn default_blob_directory() -> String {
    dirs::data_dir()
        .map(|p| p.join("lagoon").join("blobs"))
        .unwrap_or_else(|| std::path::PathBuf::from("blobs"))
        .to_string_lossy()
        .into_owned()
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Name of the session cookie.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    /// Lifetime of a newly issued session in hours.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,

    /// Set the `Secure` attribute on issued cookies.
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
            session_ttl_hours: default_session_ttl_hours(),
            secure_cookie: false,
        }
    }
}

fn default_session_cookie() -> String {
    "lagoon_session".to_string()
}

fn default_session_ttl_hours() -> u32 {
    24 * 30
}
