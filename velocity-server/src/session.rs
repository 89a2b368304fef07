use crate::db::{timestamp, Database};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Database-backed session manager for the email login layer
///
/// Tokens are UUID v4 strings sent by clients in the `X-Session-Token` header.
/// Expired sessions are rejected and removed on use.
#[derive(Clone)]
pub struct SessionManager {
    db: Database,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(db: Database, ttl_days: i64) -> Self {
        Self {
            db,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Create a new session for a user and return its token
    pub fn create_session(&self, user_id: Uuid) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let expires_at = created_at + self.ttl;

        let conn = self.db.connection()?;
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                token,
                user_id.to_string(),
                timestamp(created_at),
                timestamp(expires_at),
            ],
        )
        .context("Failed to create session")?;

        tracing::info!("Created session for user {}", user_id);
        Ok(token)
    }

    /// Validate a session token and return the associated user ID
    pub fn validate_session(&self, token: &str) -> Result<Uuid> {
        let conn = self.db.connection()?;

        let (user_id_str, expires_at_str): (String, String) = conn
            .query_row(
                "SELECT user_id, expires_at FROM sessions WHERE token = ?1",
                rusqlite::params![token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .context("Session not found")?;

        let expires_at = expires_at_str
            .parse::<DateTime<Utc>>()
            .context("Failed to parse expiry time")?;

        if Utc::now() > expires_at {
            drop(conn);
            self.delete_session(token)?;
            anyhow::bail!("Session has expired");
        }

        Uuid::parse_str(&user_id_str).context("Failed to parse user ID")
    }

    /// Delete a session (logout)
    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.db.connection()?;
        let rows_affected = conn
            .execute(
                "DELETE FROM sessions WHERE token = ?1",
                rusqlite::params![token],
            )
            .context("Failed to delete session")?;

        if rows_affected > 0 {
            tracing::info!("Deleted session");
        }

        Ok(())
    }

    /// Remove every session past its expiry time, returning how many were deleted
    pub fn cleanup_expired_sessions(&self) -> Result<usize> {
        let conn = self.db.connection()?;
        let now = timestamp(Utc::now());

        let rows_affected = conn
            .execute(
                "DELETE FROM sessions WHERE expires_at < ?1",
                rusqlite::params![now],
            )
            .context("Failed to cleanup expired sessions")?;

        if rows_affected > 0 {
            tracing::info!("Cleaned up {} expired sessions", rows_affected);
        }

        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ID: &str = "550e8400-e29b-41d4-a716-446655440099";

    fn setup_test_db() -> Database {
        let db = Database::in_memory().expect("Failed to create test database");
        db.initialize().expect("Failed to initialize database");

        let conn = db.connection().expect("Failed to get connection");
        conn.execute(
            "INSERT INTO profiles (id, email, subscription_tier, created_at) VALUES (?1, ?2, 'free', ?3)",
            rusqlite::params![USER_ID, "session@velocity.app", timestamp(Utc::now())],
        )
        .expect("Failed to create test profile");

        db
    }

    #[test]
    fn test_create_and_validate_session() {
        let manager = SessionManager::new(setup_test_db(), 30);
        let user_id = Uuid::parse_str(USER_ID).unwrap();

        let token = manager.create_session(user_id).expect("Failed to create session");
        assert!(Uuid::parse_str(&token).is_ok(), "Token should be a valid UUID");

        let validated = manager.validate_session(&token).expect("Failed to validate session");
        assert_eq!(user_id, validated);
    }

    #[test]
    fn test_validate_invalid_session() {
        let manager = SessionManager::new(setup_test_db(), 30);
        assert!(manager.validate_session("invalid-token").is_err());
    }

    #[test]
    fn test_delete_session() {
        let manager = SessionManager::new(setup_test_db(), 30);
        let user_id = Uuid::parse_str(USER_ID).unwrap();

        let token = manager.create_session(user_id).unwrap();
        manager.delete_session(&token).expect("Failed to delete session");
        assert!(manager.validate_session(&token).is_err());
    }

    #[test]
    fn test_expired_session_is_rejected_and_removed() {
        let db = setup_test_db();
        let manager = SessionManager::new(db.clone(), 30);
        let user_id = Uuid::parse_str(USER_ID).unwrap();
        let token = manager.create_session(user_id).unwrap();

        let conn = db.connection().unwrap();
        conn.execute(
            "UPDATE sessions SET expires_at = ?1 WHERE token = ?2",
            rusqlite::params![timestamp(Utc::now() - Duration::days(1)), token],
        )
        .unwrap();

        assert!(manager.validate_session(&token).is_err());
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_cleanup_expired_sessions() {
        let db = setup_test_db();
        let manager = SessionManager::new(db.clone(), 30);
        let user_id = Uuid::parse_str(USER_ID).unwrap();

        let expired = manager.create_session(user_id).unwrap();
        let live = manager.create_session(user_id).unwrap();

        let conn = db.connection().unwrap();
        conn.execute(
            "UPDATE sessions SET expires_at = ?1 WHERE token = ?2",
            rusqlite::params![timestamp(Utc::now() - Duration::days(1)), expired],
        )
        .unwrap();

        assert_eq!(manager.cleanup_expired_sessions().unwrap(), 1);
        assert!(manager.validate_session(&live).is_ok());
    }
}
