// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for users, sessions, and usage counters.

pub mod sessions;
pub mod usage;
pub mod users;
