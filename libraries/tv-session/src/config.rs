/// Session configuration
use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tv_playback::EngineConfig;

/// Config file read when no path is given (optional)
pub const DEFAULT_CONFIG_FILE: &str = "tv.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_persistence")]
    pub persistence: PersistenceSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PersistenceSettings {
    /// Quiet period before playlists and tabs are saved
    #[serde(default = "default_structural_debounce_ms")]
    pub structural_debounce_ms: u64,

    /// Quiet period before progress is saved
    #[serde(default = "default_progress_debounce_ms")]
    pub progress_debounce_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default = "default_watched_ratio")]
    pub watched_ratio: f64,

    /// Playlist to start from when there is no history to resume
    #[serde(default)]
    pub default_playlist_id: Option<String>,
}

impl SessionConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tv.toml` is read if
    /// present. Environment variables prefixed `TV_` override both, with
    /// `__` between section and key (e.g. `TV_STORAGE__USER_ID`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = ::config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(::config::File::from(path.to_path_buf()).required(true)),
            None => settings
                .add_source(::config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        settings = settings.add_source(
            ::config::Environment::with_prefix("TV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.user_id.trim().is_empty() {
            return Err(SessionError::Config("storage.user_id is empty".to_string()));
        }

        if self.persistence.structural_debounce_ms == 0 || self.persistence.progress_debounce_ms == 0
        {
            return Err(SessionError::Config(
                "Debounce periods must be greater than zero".to_string(),
            ));
        }

        if self.playback.heartbeat_secs == 0 {
            return Err(SessionError::Config(
                "playback.heartbeat_secs must be greater than zero".to_string(),
            ));
        }

        if self.playback.history_capacity == 0 {
            return Err(SessionError::Config(
                "playback.history_capacity must be greater than zero".to_string(),
            ));
        }

        let ratio = self.playback.watched_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(SessionError::Config(format!(
                "playback.watched_ratio must be in (0, 1], got {ratio}"
            )));
        }

        Ok(())
    }

    pub fn structural_debounce(&self) -> Duration {
        Duration::from_millis(self.persistence.structural_debounce_ms)
    }

    pub fn progress_debounce(&self) -> Duration {
        Duration::from_millis(self.persistence.progress_debounce_ms)
    }

    pub fn heartbeat_period(&self) -> Duration {
        Duration::from_secs(self.playback.heartbeat_secs)
    }

    /// Engine settings derived from this configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            history_capacity: self.playback.history_capacity,
            watched_ratio: self.playback.watched_ratio,
            default_playlist_id: self.playback.default_playlist_id.clone(),
            shuffle_seed: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            persistence: default_persistence(),
            playback: default_playback(),
        }
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        user_id: default_user_id(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/tv.db".to_string()
}

fn default_user_id() -> String {
    "default".to_string()
}

fn default_persistence() -> PersistenceSettings {
    PersistenceSettings {
        structural_debounce_ms: default_structural_debounce_ms(),
        progress_debounce_ms: default_progress_debounce_ms(),
    }
}

fn default_structural_debounce_ms() -> u64 {
    1500
}

fn default_progress_debounce_ms() -> u64 {
    2000
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        heartbeat_secs: default_heartbeat_secs(),
        history_capacity: default_history_capacity(),
        watched_ratio: default_watched_ratio(),
        default_playlist_id: None,
    }
}

fn default_heartbeat_secs() -> u64 {
    5
}

fn default_history_capacity() -> usize {
    tv_playback::DEFAULT_HISTORY_CAPACITY
}

fn default_watched_ratio() -> f64 {
    tv_playback::DEFAULT_WATCHED_RATIO
}
