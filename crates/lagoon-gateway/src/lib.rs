// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Lagoon chat backend.
//!
//! Every route is a thin pass-through: resolve the session, consult the quota
//! gate where the action consumes quota, call the provider or blob adapter,
//! and reshape the result into JSON. Adapters are injected through
//! [`AppState`] so the router can be driven against mocks in tests.

pub mod auth;
pub mod error;
pub mod generate;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HealthState, build_router, start_server};

/// Gateway settings.
///
/// Mirrors the server, auth and image policy sections of `LagoonConfig` so
/// the gateway does not depend on the config crate.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Allowed CORS origins. Empty disables the CORS layer.
    pub cors_origins: Vec<String>,
    /// Session cookie policy.
    pub session: SessionSettings,
    /// Image policy applied before forwarding a generation request.
    pub image: ImagePolicy,
}

/// Session cookie policy.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl_hours: u32,
    pub secure: bool,
}

/// Model/style policy for image generation.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    /// Model used when a non-guest request omits one.
    pub default_model: String,
    /// Model every guest request is pinned to.
    pub guest_model: String,
    /// Style preset every guest request is pinned to.
    pub guest_style_preset: Option<String>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_origins: Vec::new(),
            session: SessionSettings {
                cookie_name: "lagoon_session".to_string(),
                ttl_hours: 720,
                secure: false,
            },
            image: ImagePolicy {
                default_model: "venice-sd35".to_string(),
                guest_model: "venice-sd35".to_string(),
                guest_style_preset: None,
            },
        }
    }
}
