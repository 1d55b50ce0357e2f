use anyhow::Result;
use sqlx::Row;

use crate::storage::connection::DbConnection;

/// Repository for the `settings` collection.
///
/// Values are JSON-serialized singleton records (the daily goal or the
/// quick-add list) addressed by their fixed, well-known ids. Serialization
/// stays in the domain layer; this repository only moves strings.
#[derive(Clone)]
pub struct SettingsRepository {
    db: DbConnection,
}

impl SettingsRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a settings record, replacing any existing value for the same id
    pub async fn put_setting(&self, id: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO settings (id, value) VALUES (?, ?)")
            .bind(id)
            .bind(value)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Retrieve a settings record by id
    pub async fn get_setting(&self, id: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM settings WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => {
                let value: String = r.get("value");
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Remove every settings record
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM settings")
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> SettingsRepository {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        SettingsRepository::new(db)
    }

    #[tokio::test]
    async fn test_put_and_get_setting() {
        let repo = setup_test().await;

        repo.put_setting("daily-goal", r#"{"goal_ml":2500}"#)
            .await
            .expect("Failed to put setting");

        let value = repo.get_setting("daily-goal").await.expect("Failed to get");
        assert_eq!(value.as_deref(), Some(r#"{"goal_ml":2500}"#));
    }

    #[tokio::test]
    async fn test_get_missing_setting_returns_none() {
        let repo = setup_test().await;

        let value = repo.get_setting("quick-adds").await.expect("Query failed");
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_value() {
        let repo = setup_test().await;

        repo.put_setting("daily-goal", "first").await.unwrap();
        repo.put_setting("daily-goal", "second").await.unwrap();

        let value = repo.get_setting("daily-goal").await.unwrap();
        assert_eq!(value.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let repo = setup_test().await;
        repo.put_setting("daily-goal", "a").await.unwrap();
        repo.put_setting("quick-adds", "b").await.unwrap();

        repo.clear().await.expect("Failed to clear");

        assert!(repo.get_setting("daily-goal").await.unwrap().is_none());
        assert!(repo.get_setting("quick-adds").await.unwrap().is_none());
    }
}
