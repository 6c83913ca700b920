// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session persistence and token resolution.

use chrono::{DateTime, Utc};
use lagoon_core::LagoonError;
use lagoon_core::types::{Identity, Session};
use rusqlite::params;

use crate::database::{Database, format_timestamp};

/// Create a new session.
pub async fn create_session(db: &Database, session: &Session) -> Result<(), LagoonError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    session.token,
                    session.user_id,
                    session.created_at,
                    session.expires_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve a token to the owning user's identity.
///
/// Sessions whose `expires_at` is at or before `now` do not resolve.
pub async fn resolve_session(
    db: &Database,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Identity>, LagoonError> {
    let token = token.to_string();
    let now = format_timestamp(now);
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT u.id, u.user_type
                 FROM sessions s JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1 AND s.expires_at > ?2",
                params![token, now],
                |row| Ok(Identity::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            );
            match result {
                Ok(identity) => Ok(Some(identity)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete every session that expired at or before `now`.
pub async fn delete_expired_sessions(
    db: &Database,
    now: DateTime<Utc>,
) -> Result<usize, LagoonError> {
    let now = format_timestamp(now);
    db.connection()
        .call(move |conn| conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now]))
        .await
        .map_err(crate::database::map_tr_err)
}
