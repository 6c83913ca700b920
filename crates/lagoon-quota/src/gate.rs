// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily quota gate.
//!
//! The gate reads the persisted usage counter before a quota-consuming action
//! and increments it after the action succeeds. The read and the increment are
//! separate statements, so two concurrent requests from one user can both be
//! admitted at `max - 1`. The increment itself is atomic.

use std::sync::Arc;

use lagoon_core::{Identity, LagoonError, StorageAdapter};
use serde::Serialize;
use tracing::{debug, warn};

use crate::entitlements::entitlements_for;

/// Message returned with every quota denial.
pub const RATE_LIMIT_MESSAGE: &str =
    "You have exceeded your maximum number of messages for the day. Please try again later.";

/// Daily limit for a user class. Unknown classes get 0.
pub fn max_messages_for(user_type: &str) -> u32 {
    entitlements_for(user_type).map_or(0, |e| e.max_messages_per_day)
}

/// Decide admit/deny for a user class with `count` actions in the current window.
///
/// Admits iff `count < max_messages_per_day`. An unknown class is denied.
pub fn check_quota(user_type: &str, count: u32) -> Result<(), LagoonError> {
    let Some(entitlement) = entitlements_for(user_type) else {
        warn!(user_type, "unknown user class, denying");
        return Err(LagoonError::RateLimited(RATE_LIMIT_MESSAGE.to_string()));
    };

    let max = entitlement.max_messages_per_day;
    if count >= max {
        return Err(LagoonError::RateLimited(RATE_LIMIT_MESSAGE.to_string()));
    }
    if count.saturating_add(1) * 5 >= max * 4 {
        debug!(user_type, count, max, "approaching daily quota (80%+)");
    }
    Ok(())
}

/// Usage report for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    pub user_type: String,
    pub count: u32,
    pub max_messages_per_day: u32,
    pub remaining: u32,
    /// Chat models the class may pick; empty for an unknown class.
    pub available_chat_model_ids: Vec<String>,
}

impl UsageSnapshot {
    fn new(user_type: &str, count: u32) -> Self {
        let entitlement = entitlements_for(user_type);
        let max = entitlement.map_or(0, |e| e.max_messages_per_day);
        Self {
            user_type: user_type.to_string(),
            count,
            max_messages_per_day: max,
            remaining: max.saturating_sub(count),
            available_chat_model_ids: entitlement
                .map(|e| {
                    e.available_chat_model_ids
                        .iter()
                        .map(|id| id.to_string())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Quota gate backed by the storage adapter's usage counter.
#[derive(Clone)]
pub struct QuotaGate {
    storage: Arc<dyn StorageAdapter>,
}

impl QuotaGate {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Read the identity's usage and reject if the quota is exhausted.
    pub async fn check(&self, identity: &Identity) -> Result<UsageSnapshot, LagoonError> {
        let count = self.storage.usage_count(&identity.user_id).await?;
        check_quota(&identity.user_type, count)?;
        Ok(UsageSnapshot::new(&identity.user_type, count))
    }

    /// Record one successful quota-consuming action.
    pub async fn record(&self, identity: &Identity) -> Result<u32, LagoonError> {
        let count = self.storage.increment_usage(&identity.user_id).await?;
        debug!(user_id = %identity.user_id, count, "usage recorded");
        Ok(count)
    }

    /// Current usage without enforcing the limit.
    pub async fn snapshot(&self, identity: &Identity) -> Result<UsageSnapshot, LagoonError> {
        let count = self.storage.usage_count(&identity.user_id).await?;
        Ok(UsageSnapshot::new(&identity.user_type, count))
    }
}
