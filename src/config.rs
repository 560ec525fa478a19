//! Configuration Module
//!
//! Handles loading the backing store address from environment variables.

use std::env;

/// Backing store connection parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis host name or address
    pub redis_host: String,
    /// Redis port
    pub redis_port: u16,
    /// Logical database index selected on connect
    pub redis_db: i64,
    /// Full connection URL, takes precedence over host/port/db when set
    pub redis_url: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_HOST` - Redis host (default: 127.0.0.1)
    /// - `REDIS_PORT` - Redis port (default: 6379)
    /// - `REDIS_DB` - Database index (default: 0)
    /// - `REDIS_URL` - Full URL overriding the three above (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_host: env::var("REDIS_HOST")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.redis_host),
            redis_port: env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.redis_port),
            redis_db: env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.redis_db),
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Returns the URL handed to the Redis client.
    pub fn redis_url(&self) -> String {
        match &self.redis_url {
            Some(url) => url.clone(),
            None => format!(
                "redis://{}:{}/{}",
                self.redis_host, self.redis_port, self.redis_db
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            redis_db: 0,
            redis_url: None,
        }
    }
}
