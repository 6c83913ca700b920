// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entitlements and quota enforcement for the Lagoon chat backend.
//!
//! This crate provides:
//! - **Entitlement table**: static per-user-class limits and chat model access
//! - **Quota gate**: admit/deny against the persisted daily usage counter

pub mod entitlements;
pub mod gate;

pub use entitlements::{Entitlement, entitlements_for};
pub use gate::{QuotaGate, UsageSnapshot, check_quota, max_messages_for};
