//! Configuration management utilities

use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// In-memory SQLite databases live inside a single connection, so the
    /// pool must never open a second one.
    pub fn is_in_memory_sqlite(&self) -> bool {
        self.url.starts_with("sqlite::memory:") || self.url.contains("mode=memory")
    }

    /// Pool bounds actually applied when connecting
    pub fn pool_bounds(&self) -> (u32, u32) {
        if self.is_in_memory_sqlite() {
            return (1, 1);
        }
        let max = self.max_connections.max(1);
        (self.min_connections.min(max), max)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 20,
            min_connections: 2,
        }
    }
}

/// Limits applied to top-N analytics queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopLimit(u64);

impl TopLimit {
    pub const DEFAULT: u64 = 10;
    pub const MAX: u64 = 100;

    pub fn new(limit: Option<u64>) -> Self {
        Self(limit.unwrap_or(Self::DEFAULT).min(Self::MAX))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for TopLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
