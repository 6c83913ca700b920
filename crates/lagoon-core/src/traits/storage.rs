// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for users, sessions, and usage counters.

use async_trait::async_trait;

use crate::error::LagoonError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Identity, Session, User};

/// Adapter for the persistence backend.
///
/// The usage counter is read before and incremented after a quota-consuming
/// action. The two calls are not one transaction.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), LagoonError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), LagoonError>;

    // --- User operations ---

    /// Persists a new user.
    async fn create_user(&self, user: &User) -> Result<(), LagoonError>;

    /// Looks up a user by ID.
    async fn get_user(&self, id: &str) -> Result<Option<User>, LagoonError>;

    // --- Session operations ---

    /// Persists a new session.
    async fn create_session(&self, session: &Session) -> Result<(), LagoonError>;

    /// Resolves a session token to an identity, ignoring expired sessions.
    async fn resolve_session(&self, token: &str) -> Result<Option<Identity>, LagoonError>;

    /// Deletes expired sessions and returns how many were removed.
    async fn delete_expired_sessions(&self) -> Result<usize, LagoonError>;

    // --- Usage operations ---

    /// Number of quota-consuming actions in the user's current day window.
    async fn usage_count(&self, user_id: &str) -> Result<u32, LagoonError>;

    /// Records one quota-consuming action and returns the new count.
    async fn increment_usage(&self, user_id: &str) -> Result<u32, LagoonError>;
}
