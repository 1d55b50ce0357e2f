use anyhow::Result;
use shared::{WaterEntry, WaterEntryFilters};
use sqlx::Row;

use crate::storage::connection::DbConnection;

/// Repository for the `entries` collection
#[derive(Clone)]
pub struct EntryRepository {
    db: DbConnection,
}

impl EntryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a new entry. Fails if an entry with the same id already exists.
    pub async fn store_entry(&self, entry: &WaterEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO entries (id, amount, timestamp, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.amount)
        .bind(entry.timestamp)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Retrieve a specific entry by id
    pub async fn get_entry(&self, id: &str) -> Result<Option<WaterEntry>> {
        let row = sqlx::query(
            r#"
            SELECT id, amount, timestamp, created_at, updated_at
            FROM entries
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Self::row_to_entry(&r)))
    }

    /// List entries most recent first, with an optional inclusive timestamp
    /// range and offset/limit pagination. Filtering, ordering and pagination
    /// are applied in that order.
    pub async fn list_entries(&self, filters: &WaterEntryFilters) -> Result<Vec<WaterEntry>> {
        let start = filters.start_date.unwrap_or(i64::MIN);
        let end = filters.end_date.unwrap_or(i64::MAX);
        // SQLite treats LIMIT -1 as unbounded
        let limit = filters.limit.map(|l| l as i64).unwrap_or(-1);
        let offset = filters.offset.unwrap_or(0) as i64;

        let rows = sqlx::query(
            r#"
            SELECT id, amount, timestamp, created_at, updated_at
            FROM entries
            WHERE timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::row_to_entry).collect())
    }

    /// Replace the mutable fields of an existing entry row
    pub async fn update_entry(&self, entry: &WaterEntry) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE entries
            SET amount = ?, timestamp = ?, created_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(entry.amount)
        .bind(entry.timestamp)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .bind(&entry.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete an entry by id. Returns true if a row was actually removed.
    pub async fn delete_entry(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every entry
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM entries")
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> WaterEntry {
        WaterEntry {
            id: row.get("id"),
            amount: row.get("amount"),
            timestamp: row.get("timestamp"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> EntryRepository {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        EntryRepository::new(db)
    }

    fn entry(id: &str, amount: i64, timestamp: i64) -> WaterEntry {
        WaterEntry {
            id: id.to_string(),
            amount,
            timestamp,
            created_at: timestamp,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_entry() {
        let repo = setup_test().await;
        let stored = entry("a", 250, 1_000);

        repo.store_entry(&stored).await.expect("Failed to store");
        let loaded = repo.get_entry("a").await.expect("Failed to get");

        assert_eq!(loaded, Some(stored));
    }

    #[tokio::test]
    async fn test_store_duplicate_id_fails() {
        let repo = setup_test().await;
        let stored = entry("a", 250, 1_000);

        repo.store_entry(&stored).await.expect("Failed to store");
        let result = repo.store_entry(&stored).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_orders_most_recent_first() {
        let repo = setup_test().await;
        repo.store_entry(&entry("t1", 100, 1_000)).await.unwrap();
        repo.store_entry(&entry("t3", 300, 3_000)).await.unwrap();
        repo.store_entry(&entry("t2", 200, 2_000)).await.unwrap();

        let all = repo
            .list_entries(&WaterEntryFilters::default())
            .await
            .expect("Failed to list");

        let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_list_range_and_pagination() {
        let repo = setup_test().await;
        repo.store_entry(&entry("t1", 100, 1_000)).await.unwrap();
        repo.store_entry(&entry("t2", 200, 2_000)).await.unwrap();
        repo.store_entry(&entry("t3", 300, 3_000)).await.unwrap();

        // Inclusive lower bound keeps t2 and t3
        let from_t2 = repo
            .list_entries(&WaterEntryFilters {
                start_date: Some(2_000),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<&str> = from_t2.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2"]);

        // Offset skips the most recent, limit caps the page
        let page = repo
            .list_entries(&WaterEntryFilters {
                limit: Some(1),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "t2");
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_existed() {
        let repo = setup_test().await;
        repo.store_entry(&entry("a", 250, 1_000)).await.unwrap();

        assert!(repo.delete_entry("a").await.unwrap());
        assert!(!repo.delete_entry("a").await.unwrap());
        assert!(repo.get_entry("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let repo = setup_test().await;
        repo.store_entry(&entry("a", 250, 1_000)).await.unwrap();
        repo.store_entry(&entry("b", 500, 2_000)).await.unwrap();

        repo.clear().await.expect("Failed to clear");

        let all = repo
            .list_entries(&WaterEntryFilters::default())
            .await
            .unwrap();
        assert!(all.is_empty());
    }
}
