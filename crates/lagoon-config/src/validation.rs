// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and positive dimensions.

use crate::diagnostic::ConfigError;
use crate::model::{BlobBackend, LagoonConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LagoonConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(validation("server.host must not be empty".to_string()));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(validation(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(validation(
            "storage.database_path must not be empty".to_string(),
        ));
    }

    if !config.venice.base_url.starts_with("http://")
        && !config.venice.base_url.starts_with("https://")
    {
        errors.push(validation(format!(
            "venice.base_url `{}` must be an http(s) URL",
            config.venice.base_url
        )));
    }

    if config.venice.catalog_ttl_secs == 0 {
        errors.push(validation(
            "venice.catalog_ttl_secs must be greater than 0".to_string(),
        ));
    }

    if config.venice.timeout_secs == 0 {
        errors.push(validation(
            "venice.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.venice.image_width == 0 || config.venice.image_height == 0 {
        errors.push(validation(format!(
            "venice image dimensions must be non-zero, got {}x{}",
            config.venice.image_width, config.venice.image_height
        )));
    }

    if config.venice.guest_image_model.trim().is_empty() {
        errors.push(validation(
            "venice.guest_image_model must not be empty".to_string(),
        ));
    }

    if config.blob.timeout_secs == 0 {
        errors.push(validation(
            "blob.timeout_secs must be greater than 0".to_string(),
        ));
    }

    match config.blob.backend {
        BlobBackend::Http => {
            if !config.blob.base_url.starts_with("http://")
                && !config.blob.base_url.starts_with("https://")
            {
                errors.push(validation(format!(
                    "blob.base_url `{}` must be an http(s) URL",
                    config.blob.base_url
                )));
            }
        }
        BlobBackend::Fs => {
            if config.blob.directory.trim().is_empty() {
                errors.push(validation(
                    "blob.directory must not be empty for the fs backend".to_string(),
                ));
            }
            if config.blob.public_base_url.is_none() {
                errors.push(validation(
                    "blob.public_base_url is required for the fs backend".to_string(),
                ));
            }
        }
    }

    if config.auth.session_cookie.trim().is_empty() {
        errors.push(validation(
            "auth.session_cookie must not be empty".to_string(),
        ));
    }

    if config.auth.session_ttl_hours == 0 {
        errors.push(validation(
            "auth.session_ttl_hours must be greater than 0".to_string(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: String) -> ConfigError {
    ConfigError::Validation { message }
}
