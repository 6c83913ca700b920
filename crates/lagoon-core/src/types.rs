// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Lagoon backend.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The closed set of user classes an entitlement can be attached to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Users without an account.
    Guest,
    /// Users with an account.
    Regular,
    /// Users with an account and a paid membership.
    Premium,
}

/// The identity resolved from a session cookie.
///
/// `user_type` is kept as the stored text so that a value outside the
/// closed [`UserType`] set stays observable and can be denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub user_type: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, user_type: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_type: user_type.into(),
        }
    }

    /// Parsed user class, or `None` for an unrecognized value.
    pub fn user_class(&self) -> Option<UserType> {
        self.user_type.parse().ok()
    }

    pub fn is_guest(&self) -> bool {
        self.user_class() == Some(UserType::Guest)
    }
}

/// A persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub user_type: String,
    pub created_at: String,
}

/// A persisted session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}

/// A chat model entry offered to the client's model picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatModel {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Provider-side model identifier.
    #[serde(rename = "modelId", default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(rename = "trait", default, skip_serializing_if = "Option::is_none")]
    pub model_trait: Option<String>,
}

/// An image generation model offered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageModel {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Provider trait name -> provider model id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTraits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fastest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_vision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_intelligent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_uncensored: Option<String>,
}

/// The effective parameters of one image generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub style_preset: Option<String>,
}

/// Binary output of an image generation call.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// A stored blob and its public location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobObject {
    pub url: String,
    pub pathname: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Blob,
}
