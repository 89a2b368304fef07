pub mod schema;
pub mod connection;
pub mod repositories;

pub use connection::{Database, DbConnection, DbPool};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use uuid::Uuid;

/// Canonical text form for timestamps stored in the database
pub fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_optional_timestamp(
    idx: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(idx, v)).transpose()
}

pub(crate) fn parse_uuid(idx: usize, value: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_optional_uuid(idx: usize, value: Option<String>) -> rusqlite::Result<Option<Uuid>> {
    value.map(|v| parse_uuid(idx, v)).transpose()
}

/// Error for enum columns holding an unexpected value
pub(crate) fn invalid_column(idx: usize, column: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("invalid {} value '{}'", column, value).into(),
    )
}

/// True when `err` was caused by a UNIQUE constraint
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<rusqlite::Error>(),
            Some(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
                    && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_unique_violation_detected_through_context() {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();
        let conn = db.connection().unwrap();
        conn.execute("INSERT INTO categories (name, slug) VALUES ('A', 'a')", [])
            .unwrap();

        let err = conn
            .execute("INSERT INTO categories (name, slug) VALUES ('B', 'a')", [])
            .context("Failed to insert category")
            .unwrap_err();
        assert!(is_unique_violation(&err));

        let other = anyhow::anyhow!("something else");
        assert!(!is_unique_violation(&other));
    }

    #[test]
    fn test_timestamp_round_trips() {
        let now = Utc::now();
        let parsed = parse_timestamp(0, timestamp(now)).unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
        assert!(parse_timestamp(0, "yesterday".to_string()).is_err());
    }
}
