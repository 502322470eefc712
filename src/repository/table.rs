//! Database table operations and implementations.

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::model::AlertModel;
use crate::model::SimSwapModel;
use crate::model::SubscriberModel;
use crate::repository::error::DatabaseError;

/// Base table struct providing database pool access.
#[derive(Clone)]
pub struct BaseTable {
    pub pool: SqlitePool,
}

impl BaseTable {
    /// Creates a new base table with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Base trait for table operations.
#[async_trait::async_trait]
pub trait TableBase {
    /// Creates the table if it doesn't exist.
    async fn create_table(&self) -> Result<(), DatabaseError>;
    /// Drops the table.
    async fn drop_table(&self) -> Result<(), DatabaseError>;
    /// Deletes all rows from the table.
    async fn delete_all(&self) -> Result<(), DatabaseError>;
}

// ============================================================================
// SubscriberTable
// ============================================================================

/// Table handler for per-subscriber state, keyed by phone number.
#[derive(Clone)]
pub struct SubscriberTable {
    base: BaseTable,
}

impl SubscriberTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// Returns the travel-mode flag for a phone number.
    /// Numbers without a row read as false.
    pub async fn travel_mode(&self, phone_number: &str) -> Result<bool, DatabaseError> {
        let ret = sqlx::query_scalar::<_, bool>(
            "SELECT travel_mode FROM subscribers WHERE phone_number = ?",
        )
        .bind(phone_number)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(ret.unwrap_or(false))
    }

    /// Upserts the travel-mode flag, creating the subscriber row on first
    /// toggle. At most one row per phone number.
    pub async fn set_travel_mode(
        &self,
        phone_number: &str,
        enabled: bool,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (phone_number, travel_mode) VALUES (?, ?)
            ON CONFLICT(phone_number) DO UPDATE SET travel_mode = excluded.travel_mode
            "#,
        )
        .bind(phone_number)
        .bind(enabled)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    pub async fn select(
        &self,
        phone_number: &str,
    ) -> Result<Option<SubscriberModel>, DatabaseError> {
        Ok(sqlx::query_as::<_, SubscriberModel>(
            "SELECT phone_number, travel_mode FROM subscribers WHERE phone_number = ?",
        )
        .bind(phone_number)
        .fetch_optional(&self.base.pool)
        .await?)
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscribers")
            .fetch_one(&self.base.pool)
            .await?)
    }
}

#[async_trait::async_trait]
impl TableBase for SubscriberTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                phone_number TEXT PRIMARY KEY,
                travel_mode INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS subscribers")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM subscribers")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}

// ============================================================================
// AlertTable
// ============================================================================

/// Table handler for the append-only fraud alert log.
#[derive(Clone)]
pub struct AlertTable {
    base: BaseTable,
}

impl AlertTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// Appends an alert for a phone number. The timestamp is assigned here
    /// so every insert carries the same clock and format.
    pub async fn insert(&self, phone_number: &str, message: &str) -> Result<i64, DatabaseError> {
        let res = sqlx::query(
            "INSERT INTO fraud_alerts (phone_number, message, created_at) VALUES (?, ?, ?)",
        )
        .bind(phone_number)
        .bind(message)
        .bind(Utc::now())
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    /// Returns up to `limit` alerts for a phone number, newest first.
    /// The id tiebreaker keeps the order deterministic when two inserts
    /// share a timestamp.
    pub async fn recent(
        &self,
        phone_number: &str,
        limit: u32,
    ) -> Result<Vec<AlertModel>, DatabaseError> {
        Ok(sqlx::query_as::<_, AlertModel>(
            r#"
            SELECT id, phone_number, message, created_at
            FROM fraud_alerts
            WHERE phone_number = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(phone_number)
        .bind(limit)
        .fetch_all(&self.base.pool)
        .await?)
    }
}

#[async_trait::async_trait]
impl TableBase for AlertTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fraud_alerts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                phone_number TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS fraud_alerts")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM fraud_alerts")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}

// ============================================================================
// SimSwapTable
// ============================================================================

/// Table handler for SIM-swap events. The rows are written by an external
/// system; this service reads the recent count as a fraud signal.
#[derive(Clone)]
pub struct SimSwapTable {
    base: BaseTable,
}

impl SimSwapTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// Counts swap events for a phone number within the trailing `window`.
    pub async fn count_recent(
        &self,
        phone_number: &str,
        window: Duration,
    ) -> Result<i64, DatabaseError> {
        let cutoff = Utc::now() - window;
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sim_swaps WHERE phone_number = ? AND swapped_at >= ?",
        )
        .bind(phone_number)
        .bind(cutoff)
        .fetch_one(&self.base.pool)
        .await?)
    }

    pub async fn insert(
        &self,
        phone_number: &str,
        swapped_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let res = sqlx::query("INSERT INTO sim_swaps (phone_number, swapped_at) VALUES (?, ?)")
            .bind(phone_number)
            .bind(swapped_at)
            .execute(&self.base.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn select_all(&self) -> Result<Vec<SimSwapModel>, DatabaseError> {
        Ok(sqlx::query_as::<_, SimSwapModel>(
            "SELECT id, phone_number, swapped_at FROM sim_swaps",
        )
        .fetch_all(&self.base.pool)
        .await?)
    }
}

#[async_trait::async_trait]
impl TableBase for SimSwapTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sim_swaps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                phone_number TEXT NOT NULL,
                swapped_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS sim_swaps")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM sim_swaps")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}
