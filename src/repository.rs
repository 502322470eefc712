//! Persistence module with SQLite storage and SQLx.

use std::str::FromStr;

use log::debug;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::repository::table::AlertTable;
use crate::repository::table::SimSwapTable;
use crate::repository::table::SubscriberTable;
use crate::repository::table::TableBase;

pub mod error;
pub mod table;

/// Main persistence struct containing all table handlers.
pub struct Repository {
    pool: SqlitePool,
    pub subscriber: SubscriberTable,
    pub alert: AlertTable,
    pub sim_swap: SimSwapTable,
}

impl Repository {
    /// Creates a new database connection and initializes table handlers.
    pub async fn new(db_url: &str, db_path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(db_path);
        if !path.exists() {
            debug!("Database path {db_path} does not exist. Creating...");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, "")?;
            info!("Created {db_path}");
        }

        debug!("Connecting to db...");
        let opts = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;
        info!("Connected to db.");

        let subscriber = SubscriberTable::new(pool.clone());
        let alert = AlertTable::new(pool.clone());
        let sim_swap = SimSwapTable::new(pool.clone());

        Ok(Self {
            pool,
            subscriber,
            alert,
            sim_swap,
        })
    }

    /// Runs database migrations from the migrations directory.
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Drops all tables. Use with caution!
    pub async fn drop_all_tables(&self) -> anyhow::Result<()> {
        self.subscriber.drop_table().await?;
        self.alert.drop_table().await?;
        self.sim_swap.drop_table().await?;
        Ok(())
    }

    /// Deletes all data from all tables. Use with caution!
    pub async fn delete_all_tables(&self) -> anyhow::Result<()> {
        self.subscriber.delete_all().await?;
        self.alert.delete_all().await?;
        self.sim_swap.delete_all().await?;
        Ok(())
    }
}
