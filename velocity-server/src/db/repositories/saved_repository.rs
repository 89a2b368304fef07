use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::db::{timestamp, DbPool};

pub struct SavedTrendRepository {
    pool: DbPool,
}

impl SavedTrendRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Bookmark a trend. Saving twice is a no-op.
    pub fn save(&self, user_id: &Uuid, trend_id: i64) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO user_saved_trends (user_id, trend_id, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![user_id.to_string(), trend_id, timestamp(Utc::now())],
        )
        .context("Failed to save trend")?;
        Ok(())
    }

    pub fn unsave(&self, user_id: &Uuid, trend_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "DELETE FROM user_saved_trends WHERE user_id = ?1 AND trend_id = ?2",
                rusqlite::params![user_id.to_string(), trend_id],
            )
            .context("Failed to remove saved trend")?;
        Ok(rows > 0)
    }

    pub fn is_saved(&self, user_id: &Uuid, trend_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let saved = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM user_saved_trends WHERE user_id = ?1 AND trend_id = ?2)",
            rusqlite::params![user_id.to_string(), trend_id],
            |row| row.get(0),
        )?;
        Ok(saved)
    }
}
