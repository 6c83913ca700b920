// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD operations.

use lagoon_core::LagoonError;
use lagoon_core::types::User;
use rusqlite::params;

use crate::database::Database;

/// Insert a new user.
pub async fn create_user(db: &Database, user: &User) -> Result<(), LagoonError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, email, user_type, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![user.id, user.email, user.user_type, user.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by ID.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<User>, LagoonError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, email, user_type, created_at FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        user_type: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_user(id: &str, email: Option<&str>) -> User {
        User {
            id: id.to_string(),
            email: email.map(str::to_string),
            user_type: "regular".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_user_roundtrips() {
        let (db, _dir) = setup_db().await;
        create_user(&db, &make_user("u-1", Some("a@example.com")))
            .await
            .unwrap();

        let user = get_user(&db, "u-1").await.unwrap().unwrap();
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
        assert_eq!(user.user_type, "regular");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_user_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_user(&db, "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (db, _dir) = setup_db().await;
        create_user(&db, &make_user("u-1", Some("dup@example.com")))
            .await
            .unwrap();
        let err = create_user(&db, &make_user("u-2", Some("dup@example.com"))).await;
        assert!(matches!(err, Err(LagoonError::Storage { .. })));
    }

    #[tokio::test]
    async fn guests_without_email_coexist() {
        let (db, _dir) = setup_db().await;
        create_user(&db, &make_user("g-1", None)).await.unwrap();
        create_user(&db, &make_user("g-2", None)).await.unwrap();
        assert!(get_user(&db, "g-2").await.unwrap().is_some());
    }
}
