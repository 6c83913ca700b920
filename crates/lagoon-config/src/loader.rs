// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lagoon.toml` > `~/.config/lagoon/lagoon.toml` > `/etc/lagoon/lagoon.toml`
//! with environment variable overrides via `LAGOON_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LagoonConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lagoon/lagoon.toml` (system-wide)
/// 3. `~/.config/lagoon/lagoon.toml` (user XDG config)
/// 4. `./lagoon.toml` (local directory)
/// 5. `LAGOON_*` environment variables
pub fn load_config() -> Result<LagoonConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LagoonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LagoonConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LagoonConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(LagoonConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LagoonConfig::default()))
        .merge(Toml::file("/etc/lagoon/lagoon.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("lagoon/lagoon.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("lagoon.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `LAGOON_VENICE_API_KEY` must map to `venice.api_key`, not
/// `venice.api.key`.
fn env_provider() -> Env {
    // `key` keeps the variable's original case; figment lowercases only after mapping.
    Env::prefixed("LAGOON_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Map a lowercased, prefix-stripped env var name onto a dotted config path.
fn map_env_key(key: &str) -> String {
    for section in ["server", "venice", "storage", "blob", "auth"] {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}
