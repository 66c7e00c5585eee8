//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so every pooled connection sees the same schema and rows.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use juke_core::{Credential, PartyCode};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = juke_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        juke_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Current time truncated to whole seconds (the precision SQLite stores)
pub fn now_secs() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).expect("valid timestamp")
}

/// Test fixture: a credential expiring in one hour
pub fn credential(code: &str, access_token: &str) -> Credential {
    Credential::new(
        PartyCode::parse(code).expect("valid party code"),
        access_token,
        format!("refresh-{}", access_token),
        now_secs() + Duration::hours(1),
    )
}
