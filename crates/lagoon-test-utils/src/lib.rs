// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Lagoon integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock image provider with scripted outcomes
//! - [`MockBlobStore`] - In-memory blob store that records uploads
//! - [`TestHarness`] - Full gateway over a temp SQLite database

pub mod harness;
pub mod mock_blob;
pub mod mock_provider;

pub use harness::{TestHarness, TestResponse, TestUser};
pub use mock_blob::MockBlobStore;
pub use mock_provider::{ImageOutcome, MockProvider};
