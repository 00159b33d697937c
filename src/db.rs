//! SQLite pool setup and shared storage helpers.
//!
//! The pool uses WAL journal mode so readers never block the writer, keeps
//! foreign keys on, and carries a busy timeout large enough to ride out
//! short write contention. Migrations run once at connect time.
//!
//! UUIDs and RFC3339 timestamps are stored as TEXT; the parse helpers here
//! are what row types use to turn stored text back into domain values.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::AppError;

/// Connect to the database and run migrations.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    tracing::info!("database connected: {database_url}");
    Ok(pool)
}

/// Run a storage operation under a deadline.
///
/// Every repository call goes through here: an operation that outlives the
/// deadline is abandoned and reported as [`AppError::Timeout`]. Individual
/// statements are atomic at the store, and multi-statement writes run in a
/// transaction, so an abandoned future never leaves a partial write behind.
pub(crate) async fn with_deadline<T, F>(limit: Duration, op: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout),
    }
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|e| AppError::storage(format!("invalid stored uuid: {e}")))
}

pub(crate) fn parse_datetime(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::storage(format!("invalid stored timestamp: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_deadline_passes_result_through() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, AppError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_deadline_times_out() {
        let result = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AppError>(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout)));
    }

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_parse_datetime_roundtrip() {
        let now = Utc::now();
        let parsed = parse_datetime(&now.to_rfc3339()).unwrap();
        assert_eq!(parsed, now);
    }
}
