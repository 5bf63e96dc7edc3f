use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Backend API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Query cache tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a successful result counts as fresh (default: 60).
    #[serde(default = "default_refetch_after")]
    pub refetch_after_seconds: u64,
    /// Seconds an entry without subscribers is kept before eviction
    /// (default: 0, evicted on the next store action).
    #[serde(default)]
    pub keep_unused_seconds: u64,
}

/// Store options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Mirror every state change into a `DebugMirror` observer.
    #[serde(default)]
    pub debug_mirror: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000/api".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_refetch_after() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refetch_after_seconds: default_refetch_after(),
            keep_unused_seconds: 0,
        }
    }
}

impl CacheConfig {
    pub fn refetch_after(&self) -> Duration {
        Duration::from_secs(self.refetch_after_seconds)
    }

    pub fn keep_unused_for(&self) -> Duration {
        Duration::from_secs(self.keep_unused_seconds)
    }
}
