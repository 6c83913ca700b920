// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::debug;

use lagoon_config::model::StorageConfig;
use lagoon_core::types::{Identity, Session, User};
use lagoon_core::{AdapterType, HealthStatus, LagoonError, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened on the first call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, LagoonError> {
        self.db
            .get()
            .ok_or_else(|| LagoonError::storage("storage not initialized -- call initialize() first"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LagoonError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LagoonError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: storage closed");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), LagoonError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| LagoonError::storage("storage already initialized"))?;

        let removed = queries::sessions::delete_expired_sessions(self.db()?, Utc::now()).await?;
        debug!(
            path = %self.config.database_path,
            expired_sessions_removed = removed,
            "SQLite storage initialized"
        );
        Ok(())
    }

    async fn close(&self) -> Result<(), LagoonError> {
        self.db()?.close().await
    }

    async fn create_user(&self, user: &User) -> Result<(), LagoonError> {
        queries::users::create_user(self.db()?, user).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, LagoonError> {
        queries::users::get_user(self.db()?, id).await
    }

    async fn create_session(&self, session: &Session) -> Result<(), LagoonError> {
        queries::sessions::create_session(self.db()?, session).await
    }

    async fn resolve_session(&self, token: &str) -> Result<Option<Identity>, LagoonError> {
        queries::sessions::resolve_session(self.db()?, token, Utc::now()).await
    }

    async fn delete_expired_sessions(&self) -> Result<usize, LagoonError> {
        queries::sessions::delete_expired_sessions(self.db()?, Utc::now()).await
    }

    async fn usage_count(&self, user_id: &str) -> Result<u32, LagoonError> {
        queries::usage::usage_count(self.db()?, user_id, Utc::now()).await
    }

    async fn increment_usage(&self, user_id: &str) -> Result<u32, LagoonError> {
        queries::usage::increment_usage(self.db()?, user_id, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::format_timestamp;
    use chrono::Duration;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    async fn initialized(dir: &tempfile::TempDir, name: &str) -> SqliteStorage {
        let db_path = dir.path().join(name);
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        storage
    }

    fn guest(id: &str) -> User {
        User {
            id: id.to_string(),
            email: None,
            user_type: "guest".to_string(),
            created_at: format_timestamp(Utc::now()),
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let storage = SqliteStorage::new(make_config("unused.db"));
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let _storage = initialized(&dir, "init_test.db").await;
        assert!(dir.path().join("init_test.db").exists());
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let storage = initialized(&dir, "double_init.db").await;
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let storage = SqliteStorage::new(make_config("never.db"));
        assert!(storage.health_check().await.is_err());
        assert!(matches!(
            storage.usage_count("u").await,
            Err(LagoonError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let storage = initialized(&dir, "health.db").await;
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn guest_session_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let storage = initialized(&dir, "lifecycle.db").await;

        storage.create_user(&guest("guest-1")).await.unwrap();
        let now = Utc::now();
        storage
            .create_session(&Session {
                token: "tok-1".to_string(),
                user_id: "guest-1".to_string(),
                created_at: format_timestamp(now),
                expires_at: format_timestamp(now + Duration::hours(1)),
            })
            .await
            .unwrap();

        let identity = storage.resolve_session("tok-1").await.unwrap().unwrap();
        assert_eq!(identity, Identity::new("guest-1", "guest"));
        assert!(identity.is_guest());

        assert_eq!(storage.usage_count("guest-1").await.unwrap(), 0);
        assert_eq!(storage.increment_usage("guest-1").await.unwrap(), 1);
        assert_eq!(storage.usage_count("guest-1").await.unwrap(), 1);

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn initialize_sweeps_expired_sessions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sweep.db");
        {
            let storage = SqliteStorage::new(make_config(path.to_str().unwrap()));
            storage.initialize().await.unwrap();
            storage.create_user(&guest("guest-2")).await.unwrap();
            let past = Utc::now() - Duration::days(2);
            storage
                .create_session(&Session {
                    token: "stale".to_string(),
                    user_id: "guest-2".to_string(),
                    created_at: format_timestamp(past),
                    expires_at: format_timestamp(past + Duration::hours(1)),
                })
                .await
                .unwrap();
            storage.shutdown().await.unwrap();
        }

        let storage = SqliteStorage::new(make_config(path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        assert_eq!(storage.delete_expired_sessions().await.unwrap(), 0);
    }
}
