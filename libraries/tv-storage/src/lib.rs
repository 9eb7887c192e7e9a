//! YouTube TV Storage
//!
//! `SQLite` persistence for playlists, tabs, watch progress and history.
//!
//! # Architecture
//!
//! - **Per-User**: Every row belongs to a user; a gateway is bound to one
//! - **Vertical Slicing**: Each table owns its own queries
//! - **Lenient Reads**: Malformed JSON columns load as empty defaults
//! - **Merge Writes**: Progress is patched, never overwritten wholesale
//!
//! # Example
//!
//! ```rust,no_run
//! use tv_core::traits::PersistenceGateway;
//! use tv_storage::SqliteGateway;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = SqliteGateway::connect("sqlite://./data/tv.db", "default").await?;
//!
//! let snapshot = gateway.load().await?;
//! println!("{} playlists", snapshot.playlists.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod gateway;
mod json;
mod memory;

// Vertical slices
pub mod history;
pub mod playlists;
pub mod users;

pub use error::StorageError;
pub use gateway::{SqliteGateway, DEFAULT_HISTORY_LIMIT};
pub use memory::MemoryGateway;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before any query.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://tv.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = database_url, "Creating pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!("Pool created");
    Ok(pool)
}

/// Create the directory holding a file database, if any
async fn ensure_parent_dir(database_url: &str) -> std::io::Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    match std::path::Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
