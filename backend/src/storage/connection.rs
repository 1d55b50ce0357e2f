use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:water-tracker.db";

// Bumped whenever the persisted layout changes; gates upgrades via
// PRAGMA user_version.
const SCHEMA_VERSION: i32 = 1;

/// DbConnection manages database operations.
///
/// Constructed once at application start and handed to every repository,
/// instead of a module-global lazily-initialized singleton. Cloning is cheap
/// and shares the underlying pool.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the underlying pool. Idempotent; in-flight queries complete
    /// before the pool shuts down.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        let row = sqlx::query("PRAGMA user_version").fetch_one(pool).await?;
        let version: i32 = row.get(0);
        if version > SCHEMA_VERSION {
            anyhow::bail!(
                "database schema version {} is newer than supported version {}",
                version,
                SCHEMA_VERSION
            );
        }

        // Create entries table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                amount INTEGER NOT NULL,
                timestamp INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for ordering and range-filtering by timestamp
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_entries_timestamp
            ON entries(timestamp DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // Create settings table (JSON-valued singleton records)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                id TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        if version < SCHEMA_VERSION {
            sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
                .execute(pool)
                .await?;
        }

        Ok(())
    }
}
