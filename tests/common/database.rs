//! Test database fixture.
//!
//! Each test gets its own SQLite file in a temp directory, with migrations
//! applied through the same connect path the server uses. The directory is
//! removed when the fixture drops.

use sqlx::SqlitePool;
use tempfile::TempDir;

pub struct TestDatabase {
    _dir: TempDir,
    pool: SqlitePool,
    pub url: String,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = dir.path().join("huddle_test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        let pool = huddle::db::connect(&url)
            .await
            .expect("failed to connect test database");

        Self {
            _dir: dir,
            pool,
            url,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
