use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use std::collections::HashMap;

use velocity_types::TrendMetric;

use crate::db::DbPool;

/// Read access to the append-only search volume history
pub struct MetricRepository {
    pool: DbPool,
}

fn metric_from_row(row: &rusqlite::Row) -> rusqlite::Result<TrendMetric> {
    let date: String = row.get(2)?;
    Ok(TrendMetric {
        id: row.get(0)?,
        trend_id: row.get(1)?,
        date: date
            .parse::<NaiveDate>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        search_volume: row.get(3)?,
    })
}

impl MetricRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Metrics for one trend, oldest first
    pub fn for_trend(&self, trend_id: i64) -> Result<Vec<TrendMetric>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, trend_id, date, search_volume FROM trend_metrics
             WHERE trend_id = ? ORDER BY date ASC",
        )?;
        let metrics = stmt
            .query_map([trend_id], metric_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to load trend metrics")?;
        Ok(metrics)
    }

    /// Metrics for many trends keyed by trend id, each list oldest first
    pub fn for_trends(&self, trend_ids: &[i64]) -> Result<HashMap<i64, Vec<TrendMetric>>> {
        let mut grouped: HashMap<i64, Vec<TrendMetric>> = HashMap::new();
        if trend_ids.is_empty() {
            return Ok(grouped);
        }

        let placeholders = vec!["?"; trend_ids.len()].join(", ");
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, trend_id, date, search_volume FROM trend_metrics
             WHERE trend_id IN ({}) ORDER BY trend_id, date ASC",
            placeholders
        ))?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(trend_ids.iter()), metric_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to load trend metrics")?;

        for metric in rows {
            grouped.entry(metric.trend_id).or_default().push(metric);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> MetricRepository {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();
        db.seed_demo_data().unwrap();
        MetricRepository::new(db.pool)
    }

    #[test]
    fn test_for_trend_is_ascending() {
        let repo = setup();
        let metrics = repo.for_trend(1).unwrap();
        assert_eq!(metrics.len(), 12);
        assert!(metrics.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_for_trends_groups_by_trend() {
        let repo = setup();
        let grouped = repo.for_trends(&[1, 2, 999]).unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&2].len(), 12);
        assert!(repo.for_trends(&[]).unwrap().is_empty());
    }
}
