use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use velocity_types::{
    Category, DashboardStats, ForecastStatus, GrowthFilter, SortFilter, StatusFilter, Trend,
    TrendSource, TrendStatus, TrendWithRelations,
};

use crate::db::repositories::MetricRepository;
use crate::db::{invalid_column, parse_optional_timestamp, parse_timestamp, DbPool};

const TREND_SELECT: &str = "SELECT t.id, t.name, t.slug, t.description, t.category_id, t.status,
        t.current_volume, t.growth_percentage, t.source, t.last_fetched_at, t.added_at,
        t.velocity_score, t.forecast_status, t.prediction_confidence, t.seed_id,
        t.top_regions, t.is_breakout, c.id, c.name, c.slug
    FROM trends t
    LEFT JOIN categories c ON c.id = t.category_id";

fn trend_from_row(row: &Row) -> rusqlite::Result<TrendWithRelations> {
    let status: String = row.get(5)?;
    let source: String = row.get(8)?;
    let forecast: Option<String> = row.get(12)?;
    let regions: String = row.get(15)?;

    let forecast_status = match forecast {
        Some(value) => Some(
            ForecastStatus::parse(&value).ok_or_else(|| invalid_column(12, "forecast_status", &value))?,
        ),
        None => None,
    };

    let category = match row.get::<_, Option<i64>>(17)? {
        Some(id) => Some(Category {
            id,
            name: row.get(18)?,
            slug: row.get(19)?,
        }),
        None => None,
    };

    Ok(TrendWithRelations {
        trend: Trend {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            description: row.get(3)?,
            category_id: row.get(4)?,
            status: TrendStatus::parse(&status).ok_or_else(|| invalid_column(5, "status", &status))?,
            current_volume: row.get(6)?,
            growth_percentage: row.get(7)?,
            source: TrendSource::parse(&source).ok_or_else(|| invalid_column(8, "source", &source))?,
            last_fetched_at: parse_optional_timestamp(9, row.get(9)?)?,
            added_at: parse_timestamp(10, row.get(10)?)?,
            velocity_score: row.get(11)?,
            forecast_status,
            prediction_confidence: row.get(13)?,
            seed_id: row.get(14)?,
            top_regions: serde_json::from_str(&regions).unwrap_or_default(),
            is_breakout: row.get::<_, i64>(16)? != 0,
        },
        category,
        metrics: Vec::new(),
    })
}

/// Filters for the dashboard listing
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    pub status: StatusFilter,
    pub growth: GrowthFilter,
    pub sort: SortFilter,
    /// Case-insensitive match against name or description
    pub search: Option<String>,
    /// Restrict to seed-expansion trends of these seeds (my-niches view)
    pub seed_ids: Option<Vec<i64>>,
    pub limit: i64,
}

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct TrendRepository {
    pool: DbPool,
}

impl TrendRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn query(&self, clauses: &str, params: Vec<Value>, with_metrics: bool) -> Result<Vec<TrendWithRelations>> {
        let mut trends = {
            let conn = self.pool.get()?;
            let mut stmt = conn.prepare(&format!("{} {}", TREND_SELECT, clauses))?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(params), trend_from_row)?
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to load trends")?;
            rows
        };

        if with_metrics {
            let ids: Vec<i64> = trends.iter().map(|t| t.trend.id).collect();
            let mut metrics = MetricRepository::new(self.pool.clone()).for_trends(&ids)?;
            for trend in &mut trends {
                trend.metrics = metrics.remove(&trend.trend.id).unwrap_or_default();
            }
        }

        Ok(trends)
    }

    /// Dashboard listing. Discovered trends are never returned.
    pub fn list_dashboard(&self, query: &DashboardQuery) -> Result<Vec<TrendWithRelations>> {
        let mut conditions = vec!["t.status != 'discovered'".to_string()];
        let mut params: Vec<Value> = Vec::new();

        if let Some(seed_ids) = &query.seed_ids {
            if seed_ids.is_empty() {
                return Ok(Vec::new());
            }
            conditions.push(format!(
                "t.source = 'seed_expansion' AND t.seed_id IN ({})",
                vec!["?"; seed_ids.len()].join(", ")
            ));
            params.extend(seed_ids.iter().map(|id| Value::Integer(*id)));
        }

        if let Some(status) = query.status.status() {
            conditions.push("t.status = ?".to_string());
            params.push(Value::Text(status.as_str().to_string()));
        }

        if let Some(min_growth) = query.growth.min_growth() {
            conditions.push("t.growth_percentage >= ?".to_string());
            params.push(Value::Real(min_growth));
        }

        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            conditions.push(
                "(t.name LIKE ? ESCAPE '\\' OR t.description LIKE ? ESCAPE '\\')".to_string(),
            );
            let pattern = like_pattern(term);
            params.push(Value::Text(pattern.clone()));
            params.push(Value::Text(pattern));
        }

        let order = match query.sort {
            SortFilter::Velocity => "t.velocity_score IS NULL, t.velocity_score DESC",
            SortFilter::Growth => "t.growth_percentage DESC",
            SortFilter::Volume => "t.current_volume DESC",
            SortFilter::Newest => "t.added_at DESC",
        };

        params.push(Value::Integer(query.limit));
        self.query(
            &format!(
                "WHERE {} ORDER BY {}, t.id DESC LIMIT ?",
                conditions.join(" AND "),
                order
            ),
            params,
            true,
        )
    }

    pub fn stats(&self) -> Result<DashboardStats> {
        let conn = self.pool.get()?;
        let (exploding_count, total_trends): (i64, i64) = conn
            .query_row(
                "SELECT COALESCE(SUM(status = 'exploding'), 0), COUNT(*)
                 FROM trends WHERE status != 'discovered'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .context("Failed to load trend stats")?;
        let category_count = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;

        Ok(DashboardStats {
            exploding_count,
            total_trends,
            category_count,
        })
    }

    /// Trend with its category and full metric history
    pub fn get_by_slug(&self, slug: &str) -> Result<Option<TrendWithRelations>> {
        let trend = {
            let conn = self.pool.get()?;
            conn.query_row(&format!("{} WHERE t.slug = ?", TREND_SELECT), [slug], trend_from_row)
                .optional()
                .context("Failed to load trend")?
        };

        match trend {
            Some(mut trend) => {
                trend.metrics = MetricRepository::new(self.pool.clone()).for_trend(trend.trend.id)?;
                Ok(Some(trend))
            }
            None => Ok(None),
        }
    }

    /// Other visible trends in the same category
    pub fn related(&self, trend: &Trend, limit: i64) -> Result<Vec<TrendWithRelations>> {
        let Some(category_id) = trend.category_id else {
            return Ok(Vec::new());
        };
        self.query(
            "WHERE t.category_id = ? AND t.id != ? AND t.status != 'discovered'
             ORDER BY t.growth_percentage DESC, t.id DESC LIMIT ?",
            vec![
                Value::Integer(category_id),
                Value::Integer(trend.id),
                Value::Integer(limit),
            ],
            false,
        )
    }

    pub fn list_by_category(&self, category_id: i64, limit: i64) -> Result<Vec<TrendWithRelations>> {
        self.query(
            "WHERE t.category_id = ? AND t.status != 'discovered'
             ORDER BY t.growth_percentage DESC, t.id DESC LIMIT ?",
            vec![Value::Integer(category_id), Value::Integer(limit)],
            true,
        )
    }

    /// Trends with `status` ordered by growth, optionally above a growth floor
    pub fn list_by_status_growth(
        &self,
        status: TrendStatus,
        growth_above: Option<f64>,
        limit: i64,
    ) -> Result<Vec<TrendWithRelations>> {
        let mut params = vec![Value::Text(status.as_str().to_string())];
        let mut clauses = "WHERE t.status = ?".to_string();
        if let Some(floor) = growth_above {
            clauses.push_str(" AND t.growth_percentage > ?");
            params.push(Value::Real(floor));
        }
        clauses.push_str(" ORDER BY t.growth_percentage DESC, t.id DESC LIMIT ?");
        params.push(Value::Integer(limit));
        self.query(&clauses, params, true)
    }

    /// Every visible trend, newest first, without metrics
    pub fn list_for_export(&self) -> Result<Vec<TrendWithRelations>> {
        self.query(
            "WHERE t.status != 'discovered' ORDER BY t.added_at DESC, t.id DESC",
            Vec::new(),
            false,
        )
    }

    /// Slug and added_at of every visible trend, newest first
    pub fn sitemap_entries(&self) -> Result<Vec<(String, DateTime<Utc>)>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT slug, added_at FROM trends WHERE status != 'discovered' ORDER BY added_at DESC, id DESC",
        )?;
        let entries = stmt
            .query_map([], |row| Ok((row.get(0)?, parse_timestamp(1, row.get(1)?)?)))?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to load sitemap entries")?;
        Ok(entries)
    }

    pub fn get_id_by_slug(&self, slug: &str) -> Result<Option<i64>> {
        let conn = self.pool.get()?;
        let id = conn
            .query_row("SELECT id FROM trends WHERE slug = ?", [slug], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    /// Trends bookmarked by `user_id`, most recently saved first
    pub fn list_saved(&self, user_id: &Uuid) -> Result<Vec<TrendWithRelations>> {
        self.query(
            "JOIN user_saved_trends s ON s.trend_id = t.id
             WHERE s.user_id = ? ORDER BY s.created_at DESC, t.id DESC",
            vec![Value::Text(user_id.to_string())],
            true,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> TrendRepository {
        let db = Database::in_memory().expect("Failed to create test database");
        db.initialize().expect("Failed to initialize database");
        db.seed_demo_data().expect("Failed to seed demo data");
        TrendRepository::new(db.pool)
    }

    fn query(limit: i64) -> DashboardQuery {
        DashboardQuery {
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn test_dashboard_excludes_discovered() {
        let repo = setup();
        let trends = repo.list_dashboard(&query(100)).unwrap();
        assert_eq!(trends.len(), 21);
        assert!(trends.iter().all(|t| t.trend.status != TrendStatus::Discovered));
    }

    #[test]
    fn test_dashboard_limit_and_default_order() {
        let repo = setup();
        let trends = repo.list_dashboard(&query(10)).unwrap();
        assert_eq!(trends.len(), 10);
        assert!(trends
            .windows(2)
            .all(|w| w[0].trend.added_at >= w[1].trend.added_at));
        assert!(trends.iter().all(|t| !t.metrics.is_empty()));
    }

    #[test]
    fn test_dashboard_status_and_growth_filters() {
        let repo = setup();
        let trends = repo
            .list_dashboard(&DashboardQuery {
                status: StatusFilter::Exploding,
                growth: GrowthFilter::Over500,
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert!(!trends.is_empty());
        assert!(trends.iter().all(|t| t.trend.status == TrendStatus::Exploding
            && t.trend.growth_percentage >= 500.0));
    }

    #[test]
    fn test_dashboard_sorts() {
        let repo = setup();
        let by_growth = repo
            .list_dashboard(&DashboardQuery {
                sort: SortFilter::Growth,
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_growth[0].trend.slug, "rag-systems");

        let by_volume = repo
            .list_dashboard(&DashboardQuery {
                sort: SortFilter::Volume,
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_volume[0].trend.slug, "electric-bikes");

        let by_velocity = repo
            .list_dashboard(&DashboardQuery {
                sort: SortFilter::Velocity,
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_velocity[0].trend.velocity_score, Some(98));
    }

    #[test]
    fn test_velocity_sort_puts_missing_scores_last() {
        let repo = setup();
        let conn = repo.pool.get().unwrap();
        conn.execute("UPDATE trends SET velocity_score = NULL WHERE slug = 'ai-agents'", [])
            .unwrap();
        drop(conn);

        let trends = repo
            .list_dashboard(&DashboardQuery {
                sort: SortFilter::Velocity,
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(trends.last().unwrap().trend.slug, "ai-agents");
    }

    #[test]
    fn test_dashboard_search_is_case_insensitive() {
        let repo = setup();
        let trends = repo
            .list_dashboard(&DashboardQuery {
                search: Some("COFFEE".to_string()),
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].trend.slug, "mushroom-coffee");

        let description_match = repo
            .list_dashboard(&DashboardQuery {
                search: Some("solo founders".to_string()),
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(description_match[0].trend.slug, "micro-saas");
    }

    #[test]
    fn test_search_wildcards_match_literally() {
        let repo = setup();
        let trends = repo
            .list_dashboard(&DashboardQuery {
                search: Some("%".to_string()),
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert!(trends.is_empty());
    }

    #[test]
    fn test_my_niches_restricts_to_seed_expansion() {
        let repo = setup();
        let trends = repo
            .list_dashboard(&DashboardQuery {
                seed_ids: Some(vec![2]),
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].trend.slug, "low-profile-switches");

        let none = repo
            .list_dashboard(&DashboardQuery {
                seed_ids: Some(vec![]),
                limit: 100,
                ..Default::default()
            })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_stats() {
        let repo = setup();
        let stats = repo.stats().unwrap();
        assert_eq!(stats.total_trends, 21);
        assert_eq!(stats.exploding_count, 14);
        assert_eq!(stats.category_count, 6);
    }

    #[test]
    fn test_get_by_slug_with_related() {
        let repo = setup();
        let trend = repo.get_by_slug("ai-agents").unwrap().unwrap();
        assert_eq!(trend.category.as_ref().unwrap().slug, "ai-tech");
        assert_eq!(trend.trend.top_regions, vec!["USA", "CHN", "GBR"]);
        assert!(trend.trend.is_breakout);
        assert_eq!(trend.metrics.len(), 12);

        let related = repo.related(&trend.trend, 3).unwrap();
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|r| r.trend.id != trend.trend.id
            && r.trend.category_id == trend.trend.category_id));

        assert!(repo.get_by_slug("nope").unwrap().is_none());
    }

    #[test]
    fn test_list_by_category_orders_by_growth() {
        let repo = setup();
        let trends = repo.list_by_category(2, 50).unwrap();
        assert!(trends
            .windows(2)
            .all(|w| w[0].trend.growth_percentage >= w[1].trend.growth_percentage));
        assert!(trends.iter().all(|t| t.trend.status != TrendStatus::Discovered));
    }

    #[test]
    fn test_predictions_queries() {
        let repo = setup();
        let top = repo.list_by_status_growth(TrendStatus::Exploding, None, 6).unwrap();
        assert_eq!(top.len(), 6);
        assert_eq!(top[0].trend.slug, "rag-systems");

        let early = repo
            .list_by_status_growth(TrendStatus::Regular, Some(50.0), 4)
            .unwrap();
        assert!(early.iter().all(|t| t.trend.growth_percentage > 50.0));
        assert_eq!(early[0].trend.slug, "low-profile-switches");
    }

    #[test]
    fn test_sitemap_entries_skip_discovered() {
        let repo = setup();
        let entries = repo.sitemap_entries().unwrap();
        assert_eq!(entries.len(), 21);
        assert!(!entries.iter().any(|(slug, _)| slug == "nootropic-gummies"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
