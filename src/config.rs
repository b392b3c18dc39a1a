//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;
/// Default document store connection string
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/testapp";
/// Default cache connection string
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
/// Default TTL in seconds for the cached user list
pub const DEFAULT_USERS_CACHE_TTL: u64 = 300;
/// Default maximum JSON request body size (100 KiB)
pub const DEFAULT_JSON_BODY_LIMIT: usize = 100 * 1024;

// == Cache Write Policy ==
/// How `GET /api/users` treats its cache write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheWritePolicy {
    /// The response waits for the write; a failed write fails the request
    #[default]
    Blocking,
    /// The write runs in the background; failures are only logged
    Detached,
}

impl FromStr for CacheWritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocking" => Ok(Self::Blocking),
            "detached" => Ok(Self::Detached),
            other => Err(format!("unknown cache write policy '{}'", other)),
        }
    }
}

// == Cors Policy ==
/// Cross-origin policy applied to every response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsPolicy {
    /// Any origin is allowed
    #[default]
    Permissive,
    /// Only the listed origins are allowed
    AllowList(Vec<String>),
}

impl CorsPolicy {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            Self::Permissive
        } else {
            Self::AllowList(origins)
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,
    /// Document store connection string
    pub mongodb_uri: String,
    /// Cache connection string (`memory://` selects the in-process cache)
    pub redis_url: String,
    /// Deployment label, informational only
    pub environment: String,
    /// TTL in seconds for the cached user list
    pub users_cache_ttl: u64,
    /// Whether the user list response waits for its cache write
    pub cache_write_policy: CacheWritePolicy,
    /// Cross-origin policy
    pub cors: CorsPolicy,
    /// Maximum JSON request body size in bytes
    pub json_body_limit: usize,
    /// Sweep interval in seconds for the in-process cache
    pub cache_sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `MONGODB_URI` - Document store URI (default: mongodb://localhost:27017/testapp)
    /// - `REDIS_URL` - Cache URL (default: redis://localhost:6379)
    /// - `NODE_ENV` - Deployment label (default: development)
    /// - `USERS_CACHE_TTL` - User list TTL in seconds (default: 300)
    /// - `USERS_CACHE_WRITE` - `blocking` or `detached` (default: blocking)
    /// - `CORS_ALLOWED_ORIGINS` - Comma-separated origins (default: any)
    /// - `JSON_BODY_LIMIT` - Max JSON body bytes (default: 102400)
    /// - `CACHE_SWEEP_INTERVAL` - Memory cache sweep seconds (default: 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a Config from an arbitrary variable lookup.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            mongodb_uri: lookup("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            environment: lookup("NODE_ENV").unwrap_or(defaults.environment),
            users_cache_ttl: parse_var(&lookup, "USERS_CACHE_TTL")
                .filter(|ttl: &u64| *ttl > 0)
                .unwrap_or(defaults.users_cache_ttl),
            cache_write_policy: lookup("USERS_CACHE_WRITE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_write_policy),
            cors: lookup("CORS_ALLOWED_ORIGINS")
                .map(|v| CorsPolicy::parse(&v))
                .unwrap_or(defaults.cors),
            json_body_limit: parse_var(&lookup, "JSON_BODY_LIMIT")
                .unwrap_or(defaults.json_body_limit),
            cache_sweep_interval: parse_var(&lookup, "CACHE_SWEEP_INTERVAL")
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(defaults.cache_sweep_interval),
        }
    }
}

/// Reads `key` through `lookup` and parses it, ignoring unparseable values.
fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            environment: "development".to_string(),
            users_cache_ttl: DEFAULT_USERS_CACHE_TTL,
            cache_write_policy: CacheWritePolicy::Blocking,
            cors: CorsPolicy::Permissive,
            json_body_limit: DEFAULT_JSON_BODY_LIMIT,
            cache_sweep_interval: 1,
        }
    }
}
