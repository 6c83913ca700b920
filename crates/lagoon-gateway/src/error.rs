// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-to-response mapping.
//!
//! Guarded routes answer with `{code, message}` where `code` is
//! `<kind>:<surface>`. Catalog routes answer with the plain `{error}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lagoon_core::{ErrorKind, LagoonError};
use serde::Serialize;

/// Shown when the session cookie is missing or does not resolve.
pub const UNAUTHORIZED_MESSAGE: &str = "You need to sign in before continuing.";

/// Shown for every infrastructure failure during image generation.
pub const GENERATE_FAILED_MESSAGE: &str = "Failed to generate image.";

/// Part of the application an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Chat,
    Api,
    Auth,
}

impl Surface {
    fn as_str(self) -> &'static str {
        match self {
            Surface::Chat => "chat",
            Surface::Api => "api",
            Surface::Auth => "auth",
        }
    }
}

/// A client-facing error for a guarded route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub surface: Surface,
    pub message: String,
}

/// Body of a guarded-route error response.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

/// Body of a catalog-route error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, surface: Surface, message: impl Into<String>) -> Self {
        Self {
            kind,
            surface,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, Surface::Chat, UNAUTHORIZED_MESSAGE)
    }

    /// `<kind>:<surface>`, e.g. `rate_limit:chat`.
    pub fn code(&self) -> String {
        format!("{}:{}", self.kind, self.surface.as_str())
    }

    /// Reduce a generation failure to its client-facing error.
    ///
    /// Input and quota rejections keep their message. Everything else is
    /// logged and reported as `offline:chat`.
    pub fn from_generate(err: LagoonError) -> Self {
        match err.kind() {
            ErrorKind::Unauthorized => Self::unauthorized(),
            ErrorKind::BadRequest => Self::new(ErrorKind::BadRequest, Surface::Api, err.to_string()),
            ErrorKind::RateLimit => Self::new(ErrorKind::RateLimit, Surface::Chat, err.to_string()),
            ErrorKind::Offline | ErrorKind::Internal => {
                tracing::error!(error = %err, "error generating image");
                Self::new(ErrorKind::Offline, Surface::Chat, GENERATE_FAILED_MESSAGE)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.kind.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ApiErrorBody {
            code: self.code(),
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}

/// 500 with `{error}` for catalog routes.
pub fn catalog_error(err: LagoonError) -> Response {
    tracing::error!(error = %err, "catalog fetch failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_join_kind_and_surface() {
        assert_eq!(ApiError::unauthorized().code(), "unauthorized:chat");
        let err = ApiError::new(ErrorKind::BadRequest, Surface::Api, "x");
        assert_eq!(err.code(), "bad_request:api");
        let err = ApiError::new(ErrorKind::RateLimit, Surface::Chat, "x");
        assert_eq!(err.code(), "rate_limit:chat");
    }

    #[test]
    fn provider_rejection_keeps_message() {
        let err = ApiError::from_generate(LagoonError::BadRequest(
            "Venice API error: prompt too long".into(),
        ));
        assert_eq!(err.code(), "bad_request:api");
        assert_eq!(err.message, "Venice API error: prompt too long");
    }

    #[test]
    fn infrastructure_failures_are_offline() {
        let failures = [
            LagoonError::Provider {
                message: "connection reset".into(),
                source: None,
            },
            LagoonError::Blob {
                message: "upload rejected".into(),
                source: None,
            },
            LagoonError::storage("disk I/O error"),
            LagoonError::Config("VENICE_API_KEY not set".into()),
        ];
        for failure in failures {
            let err = ApiError::from_generate(failure);
            assert_eq!(err.code(), "offline:chat");
            assert_eq!(err.message, GENERATE_FAILED_MESSAGE);
        }
    }

    #[test]
    fn status_follows_kind() {
        let resp = ApiError::new(ErrorKind::RateLimit, Surface::Chat, "slow down").into_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let resp = ApiError::unauthorized().into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
