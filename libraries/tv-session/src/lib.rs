//! YouTube TV - Session Runtime
//!
//! Runs the playback engine against a persistence gateway:
//! - Loads the user's data and resumes playback
//! - Writes history as it is recorded
//! - Debounces structural saves (1.5s) and progress saves (2s)
//! - Flushes everything pending on shutdown
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tv_session::{Session, SessionConfig};
//! use tv_storage::SqliteGateway;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::load(None)?;
//! let gateway = SqliteGateway::connect(&config.storage.database_url, &config.storage.user_id).await?;
//!
//! let mut session = Session::start(Arc::new(gateway), &config).await?;
//! let mut heartbeat = session.heartbeat_interval();
//!
//! loop {
//!     let deadline = session.next_deadline();
//!     tokio::select! {
//!         _ = heartbeat.tick() => {
//!             // Position as reported by the player
//!             session.heartbeat(42.0);
//!         }
//!         _ = async {
//!             match deadline {
//!                 Some(deadline) => tokio::time::sleep_until(deadline).await,
//!                 None => std::future::pending().await,
//!             }
//!         } => {
//!             session.run_due().await;
//!         }
//!         _ = tokio::signal::ctrl_c() => break,
//!     }
//! }
//!
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod debounce;
pub mod error;
pub mod scheduler;
mod session;

pub use config::SessionConfig;
pub use debounce::DebounceTask;
pub use error::{Result, SessionError};
pub use scheduler::{FlushKind, PersistenceScheduler};
pub use session::Session;
