//! Engine configuration (TOML).
//!
//! ユーザーごとの値（通知の有効/無効、時刻）は PreferenceStore 側に置き、
//! ここにはエンジンの調整値だけを置きます。
//!
//! ```toml
//! debounce_ms = 500
//! max_pending = 64
//! digest_title = "Plant care reminder"
//! default_digest_time = "07:30"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::digest::DEFAULT_DIGEST_TITLE;
use crate::domain::notification::{DigestTime, NotificationSettings};

/// Platform limit on pending local notifications per app.
pub const DEFAULT_MAX_PENDING: usize = 64;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub debounce_ms: u64,
    pub max_pending: usize,
    pub digest_title: String,
    pub default_digest_time: DigestTime,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_pending: DEFAULT_MAX_PENDING,
            digest_title: DEFAULT_DIGEST_TITLE.to_string(),
            default_digest_time: DigestTime::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Settings for a user who never touched the preferences.
    pub fn default_settings(&self) -> NotificationSettings {
        NotificationSettings {
            enabled: true,
            digest_time: self.default_digest_time,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pending == 0 {
            return Err(ConfigError::Invalid("max_pending must be at least 1".to_string()));
        }
        if self.digest_title.trim().is_empty() {
            return Err(ConfigError::Invalid("digest_title must not be blank".to_string()));
        }
        Ok(())
    }
}
