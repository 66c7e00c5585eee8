//! Juke Storage
//!
//! Credential store backends for the Juke gateway.
//!
//! # Architecture
//!
//! - **`InMemoryCredentialStore`**: process-local map, for tests and single-process hosts
//! - **`SqliteCredentialStore`**: `SQLite` table keyed by party code
//! - **Vertical Slicing**: the `credentials` module owns its queries
//!
//! # Example
//!
//! ```rust,no_run
//! use juke_storage::{create_pool, run_migrations, SqliteCredentialStore};
//! use juke_core::{CredentialStore, PartyCode};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://juke.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteCredentialStore::new(pool);
//! let credential = store.get_credential(&PartyCode::parse("AB12C3")?).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;

// Vertical slices
pub mod credentials;

pub use context::SqliteCredentialStore;
pub use error::StorageError;
pub use memory::InMemoryCredentialStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://juke.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
