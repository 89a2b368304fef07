use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use velocity_types::Category;

use crate::db::DbPool;

pub struct CategoryRepository {
    pool: DbPool,
}

impl CategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All categories ordered by name
    pub fn list(&self) -> Result<Vec<Category>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, name, slug FROM categories ORDER BY name")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    slug: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub fn get_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let conn = self.pool.get()?;
        let category = conn
            .query_row(
                "SELECT id, name, slug FROM categories WHERE slug = ?",
                [slug],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        slug: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("Failed to load category")?;
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_list_is_ordered_by_name() {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();
        db.seed_demo_data().unwrap();
        let repo = CategoryRepository::new(db.pool.clone());

        let names: Vec<String> = repo.list().unwrap().into_iter().map(|c| c.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_get_by_slug() {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();
        db.seed_demo_data().unwrap();
        let repo = CategoryRepository::new(db.pool.clone());

        let category = repo.get_by_slug("ai-tech").unwrap().unwrap();
        assert_eq!(category.name, "AI & Tech");
        assert!(repo.get_by_slug("gardening").unwrap().is_none());
    }
}
