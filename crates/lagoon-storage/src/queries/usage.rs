// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolling 24-hour usage counter.
//!
//! One row per user: `count` actions since `window_start`. A window that
//! started 24 hours or more before `now` reads as zero, and the next increment
//! restarts it at `count = 1, window_start = now`.

use chrono::{DateTime, Duration, Utc};
use lagoon_core::LagoonError;
use rusqlite::params;

use crate::database::{Database, format_timestamp};

/// Length of the usage window in hours.
pub const WINDOW_HOURS: i64 = 24;

fn window() -> Duration {
    Duration::hours(WINDOW_HOURS)
}

/// Count of actions in the user's current window.
pub async fn usage_count(
    db: &Database,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<u32, LagoonError> {
    let user_id = user_id.to_string();
    let cutoff = format_timestamp(now - window());
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT count FROM usage WHERE user_id = ?1 AND window_start > ?2",
                params![user_id, cutoff],
                |row| row.get::<_, u32>(0),
            );
            match result {
                Ok(count) => Ok(count),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record one action and return the count after the increment.
///
/// A single upsert statement, so concurrent increments never lose a count.
pub async fn increment_usage(
    db: &Database,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<u32, LagoonError> {
    let user_id = user_id.to_string();
    let cutoff = format_timestamp(now - window());
    let now = format_timestamp(now);
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO usage (user_id, count, window_start) VALUES (?1, 1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET
                     count = CASE WHEN usage.window_start <= ?3 THEN 1 ELSE usage.count + 1 END,
                     window_start = CASE WHEN usage.window_start <= ?3 THEN ?2 ELSE usage.window_start END
                 RETURNING count",
                params![user_id, now, cutoff],
                |row| row.get::<_, u32>(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
