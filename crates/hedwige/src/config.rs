use std::{env, time::Duration};

use hedwige_core::mail::MAX_RECENT_MAIL;

/// Slack added on top of the upstream call budget for a whole request.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(1);

/// Server configuration loaded from environment variables.
///
/// Auth settings live in `hedwige_auth::AuthConfig`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Messages shown by `GET /gmail` (default and maximum: 5)
    pub mail_list_limit: usize,
    /// Concurrent metadata fetches per listing (default: 4)
    pub mail_fetch_concurrency: usize,
    /// Timeout for each Gmail/Calendar call in seconds (default: 10)
    pub upstream_timeout_seconds: u64,
    /// Path to SQLite database file (default: "hedwige.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MAIL_LIST_LIMIT` - Messages per listing (default: 5, values above 5 are capped)
    /// - `MAIL_FETCH_CONCURRENCY` - Parallel metadata fetches (default: 4)
    /// - `UPSTREAM_TIMEOUT_SECONDS` - Google API timeout (default: 10)
    /// - `SQLITE_PATH` - SQLite database path (default: "hedwige.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Self {
        Self {
            mail_list_limit: env::var("MAIL_LIST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .map(|n: usize| n.min(MAX_RECENT_MAIL))
                .unwrap_or(MAX_RECENT_MAIL),
            mail_fetch_concurrency: env::var("MAIL_FETCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(4),
            upstream_timeout_seconds: env::var("UPSTREAM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(10),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "hedwige.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }

    /// Get the upstream timeout as a Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    /// Deadline for a whole request.
    ///
    /// `GET /gmail` is the slowest route: one listing call followed by
    /// ceil(limit / concurrency) rounds of metadata fetches, each bounded by
    /// the upstream timeout.
    pub fn request_timeout(&self) -> Duration {
        let limit = self.mail_list_limit.clamp(1, MAX_RECENT_MAIL);
        let concurrency = self.mail_fetch_concurrency.max(1);
        let rounds = 1 + limit.div_ceil(concurrency) as u32;
        self.upstream_timeout() * rounds + REQUEST_TIMEOUT_SLACK
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mail_list_limit: MAX_RECENT_MAIL,
            mail_fetch_concurrency: 4,
            upstream_timeout_seconds: 10,
            sqlite_path: "hedwige.db".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
        }
    }
}
