use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use velocity_types::{Profile, SubscriptionTier};

use crate::db::{invalid_column, parse_timestamp, parse_uuid, timestamp, DbPool};

const PROFILE_COLUMNS: &str = "id, email, subscription_tier, billing_customer_id, created_at";

fn profile_from_row(row: &Row) -> rusqlite::Result<Profile> {
    let tier: String = row.get(2)?;
    Ok(Profile {
        id: parse_uuid(0, row.get(0)?)?,
        email: row.get(1)?,
        subscription_tier: SubscriptionTier::parse(&tier)
            .ok_or_else(|| invalid_column(2, "subscription_tier", &tier))?,
        billing_customer_id: row.get(3)?,
        created_at: parse_timestamp(4, row.get(4)?)?,
    })
}

pub struct ProfileRepository {
    pool: DbPool,
}

impl ProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get profile by ID
    pub fn get_by_id(&self, user_id: &Uuid) -> Result<Option<Profile>> {
        let conn = self.pool.get()?;
        let profile = conn
            .query_row(
                &format!("SELECT {} FROM profiles WHERE id = ?", PROFILE_COLUMNS),
                [user_id.to_string()],
                profile_from_row,
            )
            .optional()
            .context("Failed to load profile")?;
        Ok(profile)
    }

    /// Get profile by email, ignoring case
    pub fn get_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let conn = self.pool.get()?;
        let profile = conn
            .query_row(
                &format!("SELECT {} FROM profiles WHERE email = ?", PROFILE_COLUMNS),
                [email.trim()],
                profile_from_row,
            )
            .optional()
            .context("Failed to load profile by email")?;
        Ok(profile)
    }

    /// Return the profile for `email`, creating a free one on first sight
    pub fn get_or_create(&self, email: &str) -> Result<Profile> {
        let email = email.trim();
        if let Some(existing) = self.get_by_email(email)? {
            return Ok(existing);
        }

        let profile = Profile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            subscription_tier: SubscriptionTier::Free,
            billing_customer_id: None,
            created_at: Utc::now(),
        };

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO profiles (id, email, subscription_tier, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                profile.id.to_string(),
                &profile.email,
                profile.subscription_tier.as_str(),
                timestamp(profile.created_at),
            ],
        )
        .context("Failed to create profile")?;

        // A concurrent login may have won the insert
        self.get_by_email(email)?
            .context("Profile missing after insert")
    }

    /// Change the tier of the profile with `email`. Returns false when no such profile exists.
    pub fn set_tier(&self, email: &str, tier: SubscriptionTier) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "UPDATE profiles SET subscription_tier = ?1 WHERE email = ?2",
                rusqlite::params![tier.as_str(), email.trim()],
            )
            .context("Failed to update subscription tier")?;
        Ok(rows > 0)
    }

    pub fn set_api_key(&self, user_id: &Uuid, api_key: &str) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE profiles SET api_key = ?1 WHERE id = ?2",
            rusqlite::params![api_key, user_id.to_string()],
        )
        .context("Failed to store API key")?;
        Ok(())
    }

    pub fn has_api_key(&self, user_id: &Uuid) -> Result<bool> {
        let conn = self.pool.get()?;
        let exists = conn
            .query_row(
                "SELECT api_key IS NOT NULL FROM profiles WHERE id = ?",
                [user_id.to_string()],
                |row| row.get::<_, bool>(0),
            )
            .optional()
            .context("Failed to check API key")?;
        Ok(exists.unwrap_or(false))
    }

    /// Get the profile owning `api_key`
    pub fn get_by_api_key(&self, api_key: &str) -> Result<Option<Profile>> {
        let conn = self.pool.get()?;
        let profile = conn
            .query_row(
                &format!("SELECT {} FROM profiles WHERE api_key = ?", PROFILE_COLUMNS),
                [api_key],
                profile_from_row,
            )
            .optional()
            .context("Failed to load profile by API key")?;
        Ok(profile)
    }

    pub fn list_all(&self) -> Result<Vec<Profile>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM profiles ORDER BY email",
            PROFILE_COLUMNS
        ))?;
        let profiles = stmt
            .query_map([], profile_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> ProfileRepository {
        let db = Database::in_memory().expect("Failed to create test database");
        db.initialize().expect("Failed to initialize database");
        ProfileRepository::new(db.pool)
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let repo = setup();
        let first = repo.get_or_create("new@velocity.app").unwrap();
        let second = repo.get_or_create(" NEW@velocity.app ").unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.subscription_tier, SubscriptionTier::Free);
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_set_tier() {
        let repo = setup();
        let profile = repo.get_or_create("upgrade@velocity.app").unwrap();

        assert!(repo.set_tier("upgrade@velocity.app", SubscriptionTier::Pro).unwrap());
        assert!(!repo.set_tier("missing@velocity.app", SubscriptionTier::Pro).unwrap());

        let reloaded = repo.get_by_id(&profile.id).unwrap().unwrap();
        assert_eq!(reloaded.subscription_tier, SubscriptionTier::Pro);
    }

    #[test]
    fn test_api_key_lookup() {
        let repo = setup();
        let profile = repo.get_or_create("api@velocity.app").unwrap();
        assert!(!repo.has_api_key(&profile.id).unwrap());

        repo.set_api_key(&profile.id, "vl_sk_live_abc").unwrap();
        assert!(repo.has_api_key(&profile.id).unwrap());

        let owner = repo.get_by_api_key("vl_sk_live_abc").unwrap().unwrap();
        assert_eq!(owner.id, profile.id);
        assert!(repo.get_by_api_key("vl_sk_live_other").unwrap().is_none());
    }
}
