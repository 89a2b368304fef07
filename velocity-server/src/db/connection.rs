use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;

use super::schema::{DEMO_DATA, SCHEMA};

/// SQLite in-memory database identifier
const MEMORY_DB_PATH: &str = ":memory:";

/// Months of history generated per demo trend
const DEMO_HISTORY_MONTHS: u32 = 12;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling support
#[derive(Clone)]
pub struct Database {
    pub pool: DbPool,
}

impl Database {
    /// Create a new database connection pool
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager = Self::create_connection_manager(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::new(manager).context("Failed to create database connection pool")?;
        Ok(Self { pool })
    }

    /// Create appropriate connection manager based on path
    ///
    /// `:memory:` maps to a uniquely named shared-cache database so every
    /// pooled connection sees the same tables.
    fn create_connection_manager<P: AsRef<Path>>(path: P) -> SqliteConnectionManager {
        let path_str = path.as_ref().to_string_lossy();
        let trimmed_path = path_str.trim();

        if trimmed_path.eq_ignore_ascii_case(MEMORY_DB_PATH) {
            let uri = format!(
                "file:velocity-{}?mode=memory&cache=shared",
                uuid::Uuid::new_v4().simple()
            );
            SqliteConnectionManager::file(uri).with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
        } else {
            SqliteConnectionManager::file(path)
        }
    }

    /// Create an in-memory database pool (useful for testing)
    pub fn in_memory() -> Result<Self> {
        Self::new(MEMORY_DB_PATH)
    }

    /// Initialize the database schema
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Load the demo catalogue, then backfill a year of monthly metrics for
    /// every trend that has none yet. Safe to run repeatedly.
    pub fn seed_demo_data(&self) -> Result<()> {
        let mut conn = self.connection()?;
        conn.execute_batch(DEMO_DATA)
            .context("Failed to seed demo data")?;

        let trends: Vec<(i64, i64, f64)> = {
            let mut stmt = conn.prepare(
                "SELECT t.id, t.current_volume, t.growth_percentage
                 FROM trends t
                 WHERE NOT EXISTS (SELECT 1 FROM trend_metrics m WHERE m.trend_id = t.id)",
            )?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let today = Utc::now().date_naive();
        let tx = conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO trend_metrics (trend_id, date, search_volume) VALUES (?1, ?2, ?3)",
            )?;
            for (trend_id, current_volume, growth) in trends {
                for (date, volume) in demo_history(today, trend_id, current_volume, growth) {
                    insert.execute(rusqlite::params![trend_id, date.to_string(), volume])?;
                }
            }
        }
        tx.commit().context("Failed to seed demo metrics")?;

        Ok(())
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .context("Failed to get database connection from pool")
    }
}

/// Monthly history ending in the current month that compounds to roughly
/// `growth` percent, with a small deterministic wobble per trend.
fn demo_history(today: NaiveDate, trend_id: i64, current_volume: i64, growth: f64) -> Vec<(NaiveDate, i64)> {
    let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let monthly_growth = growth / 12.0 / 100.0;
    let mut volume = current_volume as f64 / (1.0 + growth / 100.0);

    (0..DEMO_HISTORY_MONTHS)
        .rev()
        .filter_map(|months_back| {
            let date = month_start.checked_sub_months(Months::new(months_back))?;
            let wobble = ((trend_id * 11 + months_back as i64 * 37) % 15 - 7) as f64 / 100.0;
            volume *= (1.0 + monthly_growth) * (1.0 + wobble);
            Some((date, volume.max(100.0).round() as i64))
        })
        .collect()
}
