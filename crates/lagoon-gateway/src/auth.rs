// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session cookie guard and guest sign-in.
//!
//! The guard resolves the session cookie to an [`Identity`] and stores it as
//! a request extension. A missing, unknown or expired token is rejected with
//! `unauthorized:chat` (fail-closed).

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use lagoon_core::types::{Session, User};
use lagoon_core::{Identity, LagoonError, UserType};
use rand::RngCore;
use serde::Serialize;

use crate::SessionSettings;
use crate::error::{ApiError, Surface};
use crate::server::AppState;

/// Byte length of a session token before hex encoding.
const TOKEN_BYTES: usize = 32;

/// Middleware that resolves the session cookie into an [`Identity`] extension.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = jar.get(&state.settings.session.cookie_name) else {
        return Err(ApiError::unauthorized());
    };

    let identity = match state.storage.resolve_session(token.value()).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            tracing::debug!("session cookie did not resolve");
            return Err(ApiError::unauthorized());
        }
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            return Err(ApiError::new(
                e.kind(),
                Surface::Auth,
                "Unable to verify your session.",
            ));
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Generate a random hex session token.
pub fn new_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Build the session cookie for `token`.
pub fn session_cookie(settings: &SessionSettings, token: String) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(settings.secure)
        .max_age(time::Duration::hours(i64::from(settings.ttl_hours)))
        .build()
}

/// Response body for POST /api/auth/guest.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestResponse {
    pub user_id: String,
    pub user_type: String,
}

impl From<Identity> for GuestResponse {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            user_type: identity.user_type,
        }
    }
}

/// POST /api/auth/guest
///
/// Creates a guest user and a session, and sets the session cookie. A
/// request that already carries a live session gets that identity back.
pub async fn post_guest(State(state): State<AppState>, jar: CookieJar) -> Response {
    let settings = &state.settings.session;

    if let Some(cookie) = jar.get(&settings.cookie_name) {
        if let Ok(Some(identity)) = state.storage.resolve_session(cookie.value()).await {
            return Json(GuestResponse::from(identity)).into_response();
        }
    }

    match create_guest_session(&state).await {
        Ok((identity, token)) => {
            tracing::info!(user_id = %identity.user_id, "guest session created");
            let jar = jar.add(session_cookie(settings, token));
            (jar, Json(GuestResponse::from(identity))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "guest sign-in failed");
            ApiError::new(e.kind(), Surface::Auth, "Unable to create a guest session.")
                .into_response()
        }
    }
}

/// Millisecond UTC timestamp with a `Z` suffix; stored values compare as text.
fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn create_guest_session(state: &AppState) -> Result<(Identity, String), LagoonError> {
    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: None,
        user_type: UserType::Guest.to_string(),
        created_at: timestamp(now),
    };
    state.storage.create_user(&user).await?;

    let token = new_session_token();
    let session = Session {
        token: token.clone(),
        user_id: user.id.clone(),
        created_at: timestamp(now),
        expires_at: timestamp(now + Duration::hours(i64::from(state.settings.session.ttl_hours))),
    };
    state.storage.create_session(&session).await?;

    Ok((Identity::new(user.id, user.user_type), token))
}
