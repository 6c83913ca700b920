// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lagoon chat backend.

use strum::{Display, EnumString};
use thiserror::Error;

/// The primary error type used across all Lagoon adapter traits and core operations.
#[derive(Debug, Error)]
pub enum LagoonError {
    /// Configuration errors (invalid TOML, missing keys, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Provider errors (transport failure, unreadable body, non-2xx catalog calls).
    #[error("{message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Blob storage errors (upload rejected or unreachable).
    #[error("blob storage error: {message}")]
    Blob {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No session, or the session token did not resolve to a user.
    #[error("{0}")]
    Unauthorized(String),

    /// Missing input or a validation rejection from the provider.
    #[error("{0}")]
    BadRequest(String),

    /// The daily quota for the caller's user class is exhausted.
    #[error("{0}")]
    RateLimited(String),

    /// The provider or another dependency could not be reached.
    #[error("{0}")]
    Offline(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Client-facing error classes.
///
/// Every route boundary reduces a [`LagoonError`] to one of these so clients
/// can tell "your input was rejected" apart from "the service is unreachable".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    BadRequest,
    RateLimit,
    Offline,
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this error class.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Unauthorized => 401,
            ErrorKind::BadRequest => 400,
            ErrorKind::RateLimit => 429,
            ErrorKind::Offline => 503,
            ErrorKind::Internal => 500,
        }
    }
}

impl LagoonError {
    /// Classify this error for the client.
    ///
    /// Infrastructure failures (storage, provider transport, blob upload)
    /// all surface as [`ErrorKind::Offline`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            LagoonError::Unauthorized(_) => ErrorKind::Unauthorized,
            LagoonError::BadRequest(_) => ErrorKind::BadRequest,
            LagoonError::RateLimited(_) => ErrorKind::RateLimit,
            LagoonError::Offline(_)
            | LagoonError::Storage { .. }
            | LagoonError::Provider { .. }
            | LagoonError::Blob { .. } => ErrorKind::Offline,
            LagoonError::Config(_) | LagoonError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for a storage error wrapping any boxed source.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        LagoonError::Storage {
            source: source.into(),
        }
    }
}
