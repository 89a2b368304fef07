use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use velocity_types::{Category, Seed, SeedWithTrendCount};

use crate::db::{parse_optional_timestamp, parse_optional_uuid, parse_timestamp, timestamp, DbPool};

const SEED_COLUMNS: &str = "id, term, category_id, is_active, last_scraped_at, added_by_user_id, created_at";

fn seed_from_row(row: &Row) -> rusqlite::Result<Seed> {
    Ok(Seed {
        id: row.get(0)?,
        term: row.get(1)?,
        category_id: row.get(2)?,
        is_active: row.get::<_, i64>(3)? != 0,
        last_scraped_at: parse_optional_timestamp(4, row.get(4)?)?,
        added_by_user_id: parse_optional_uuid(5, row.get(5)?)?,
        created_at: parse_timestamp(6, row.get(6)?)?,
    })
}

/// Seeds are the discovery keywords the external scraper expands into trends
pub struct SeedRepository {
    pool: DbPool,
}

impl SeedRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a seed and return the stored row.
    ///
    /// A duplicate term (ignoring case) fails with the underlying UNIQUE
    /// violation, see [`crate::db::is_unique_violation`].
    pub fn create(&self, term: &str, category_id: Option<i64>, added_by: Option<Uuid>) -> Result<Seed> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO seeds (term, category_id, is_active, added_by_user_id, created_at)
             VALUES (?1, ?2, 1, ?3, ?4)",
            rusqlite::params![
                term,
                category_id,
                added_by.map(|id| id.to_string()),
                timestamp(Utc::now()),
            ],
        )
        .context("Failed to create seed")?;

        let id = conn.last_insert_rowid();
        let seed = conn
            .query_row(
                &format!("SELECT {} FROM seeds WHERE id = ?", SEED_COLUMNS),
                [id],
                seed_from_row,
            )
            .context("Failed to load created seed")?;
        Ok(seed)
    }

    pub fn get(&self, id: i64) -> Result<Option<Seed>> {
        let conn = self.pool.get()?;
        let seed = conn
            .query_row(
                &format!("SELECT {} FROM seeds WHERE id = ?", SEED_COLUMNS),
                [id],
                seed_from_row,
            )
            .optional()
            .context("Failed to load seed")?;
        Ok(seed)
    }

    /// Number of seeds owned by `user_id`
    pub fn count_by_user(&self, user_id: &Uuid) -> Result<i64> {
        let conn = self.pool.get()?;
        let count = conn
            .query_row(
                "SELECT COUNT(*) FROM seeds WHERE added_by_user_id = ?",
                [user_id.to_string()],
                |row| row.get(0),
            )
            .context("Failed to count seeds")?;
        Ok(count)
    }

    pub fn ids_by_user(&self, user_id: &Uuid) -> Result<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id FROM seeds WHERE added_by_user_id = ?")?;
        let ids = stmt
            .query_map([user_id.to_string()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Toggle a seed. Returns the updated row, or `None` when the id is unknown.
    pub fn set_active(&self, id: i64, is_active: bool) -> Result<Option<Seed>> {
        let rows = {
            let conn = self.pool.get()?;
            conn.execute(
                "UPDATE seeds SET is_active = ?1 WHERE id = ?2",
                rusqlite::params![is_active, id],
            )
            .context("Failed to update seed")?
        };
        if rows == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM seeds WHERE id = ?", [id])
            .context("Failed to delete seed")?;
        Ok(rows > 0)
    }

    /// Seeds newest first with their category and the number of trends they produced.
    /// `owner` restricts the list to one user's seeds.
    pub fn list_with_counts(&self, owner: Option<&Uuid>) -> Result<Vec<SeedWithTrendCount>> {
        let conn = self.pool.get()?;
        let filter = if owner.is_some() {
            "WHERE s.added_by_user_id = ?"
        } else {
            ""
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT s.id, s.term, s.category_id, s.is_active, s.last_scraped_at, s.added_by_user_id,
                    s.created_at, c.id, c.name, c.slug,
                    (SELECT COUNT(*) FROM trends t WHERE t.seed_id = s.id)
             FROM seeds s
             LEFT JOIN categories c ON c.id = s.category_id
             {}
             ORDER BY s.created_at DESC, s.id DESC",
            filter
        ))?;

        let params: Vec<String> = owner.map(|id| id.to_string()).into_iter().collect();
        let seeds = stmt
            .query_map(rusqlite::params_from_iter(params), |row| {
                let category = match row.get::<_, Option<i64>>(7)? {
                    Some(id) => Some(Category {
                        id,
                        name: row.get(8)?,
                        slug: row.get(9)?,
                    }),
                    None => None,
                };
                Ok(SeedWithTrendCount {
                    seed: seed_from_row(row)?,
                    category,
                    trend_count: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list seeds")?;
        Ok(seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{is_unique_violation, Database};

    const HUNTER_ID: &str = "550e8400-e29b-41d4-a716-446655440002";

    fn setup() -> SeedRepository {
        let db = Database::in_memory().expect("Failed to create test database");
        db.initialize().expect("Failed to initialize database");
        db.seed_demo_data().expect("Failed to seed demo data");
        SeedRepository::new(db.pool)
    }

    #[test]
    fn test_create_returns_row() {
        let repo = setup();
        let owner = Uuid::parse_str(HUNTER_ID).unwrap();
        let seed = repo.create("Home Espresso", Some(4), Some(owner)).unwrap();

        assert_eq!(seed.term, "Home Espresso");
        assert_eq!(seed.category_id, Some(4));
        assert!(seed.is_active);
        assert_eq!(seed.added_by_user_id, Some(owner));
        assert!(seed.last_scraped_at.is_none());
    }

    #[test]
    fn test_duplicate_term_is_unique_violation() {
        let repo = setup();
        let err = repo.create("biohacking", None, None).unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_count_and_ids_by_user() {
        let repo = setup();
        let owner = Uuid::parse_str(HUNTER_ID).unwrap();
        assert_eq!(repo.count_by_user(&owner).unwrap(), 1);
        repo.create("Ergonomic Chairs", None, Some(owner)).unwrap();
        assert_eq!(repo.count_by_user(&owner).unwrap(), 2);
        assert_eq!(repo.ids_by_user(&owner).unwrap().len(), 2);
    }

    #[test]
    fn test_set_active() {
        let repo = setup();
        let updated = repo.set_active(1, false).unwrap().unwrap();
        assert!(!updated.is_active);
        assert!(repo.set_active(999, true).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let repo = setup();
        assert!(repo.delete(1).unwrap());
        assert!(!repo.delete(1).unwrap());
        assert!(repo.get(1).unwrap().is_none());
    }

    #[test]
    fn test_list_with_counts() {
        let repo = setup();
        let all = repo.list_with_counts(None).unwrap();
        assert_eq!(all.len(), 2);
        // Mechanical Keyboards was added more recently than Biohacking
        assert_eq!(all[0].seed.term, "Mechanical Keyboards");
        assert!(all.iter().all(|s| s.trend_count == 1));
        assert_eq!(all[1].category.as_ref().unwrap().slug, "health");

        let owner = Uuid::parse_str(HUNTER_ID).unwrap();
        let mine = repo.list_with_counts(Some(&owner)).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].seed.added_by_user_id, Some(owner));
    }
}
