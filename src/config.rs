//! Configuration types for marvel-forwarder
//!
//! Configuration is read from named environment variables by [`Config::from_env`].
//! [`Config::from_lookup`] takes any key lookup, which keeps tests away from
//! process-wide state.

use crate::error::{Error, Result};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Upstream base URL, e.g. `https://gateway.marvel.com/v1/public/characters`
pub const ENV_API_URL: &str = "MARVEL_API_URL";
/// Public API key, sent as `apikey`
pub const ENV_PUBLIC_KEY: &str = "PUBLIC_KEY";
/// Private API key, only ever used inside the request hash
pub const ENV_PRIVATE_KEY: &str = "PRIVATE_KEY";
/// SQLite connection string
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Upstream page size
pub const ENV_PAGE_LIMIT: &str = "PAGE_LIMIT";
/// Retries per page request after the first attempt
pub const ENV_MAX_RETRIES: &str = "MAX_RETRIES";
/// Per-request HTTP timeout in seconds
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
/// Listen address of the read server
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";
/// Period between sync runs; unset means a single run
pub const ENV_SYNC_INTERVAL_SECS: &str = "SYNC_INTERVAL_SECS";

/// Main configuration shared by both binaries
#[derive(Clone, Debug)]
pub struct Config {
    /// Upstream API location and credentials
    pub upstream: UpstreamConfig,

    /// SQLite connection string (e.g. `sqlite://data/marvel.db`)
    pub database_url: String,

    /// Retry policy for upstream page requests
    pub retry: RetryConfig,

    /// Read server settings
    pub server: ServerConfig,

    /// Sync scheduling
    pub sync: SyncConfig,
}

/// Upstream API configuration
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Base URL of the paginated characters endpoint
    pub base_url: Url,

    /// Public key, sent in clear as `apikey`
    pub public_key: String,

    /// Private key, used only to compute the request hash
    pub private_key: String,

    /// Number of entities requested per page (default: 100)
    pub page_limit: i64,

    /// Timeout applied to every HTTP request (default: 30 seconds)
    pub request_timeout: Duration,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url.as_str())
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("page_limit", &self.page_limit)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl UpstreamConfig {
    /// Create an upstream config with default paging and timeout
    pub fn new(base_url: Url, public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            base_url,
            public_key: public_key.into(),
            private_key: private_key.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// Retry configuration for upstream requests
///
/// Exponential backoff without jitter: the n-th wait is
/// `initial_interval * multiplier^(n-1)`, capped at `max_interval`.
/// Retrying stops after `max_retries` retries or once the next wait would
/// push total elapsed time past `max_elapsed_time`, whichever comes first.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (default: 3)
    pub max_retries: u32,

    /// Delay before the first retry (default: 5 seconds)
    pub initial_interval: Duration,

    /// Multiplier applied to the delay after each retry (default: 1.5)
    pub multiplier: f64,

    /// Upper bound for a single delay (default: 60 seconds)
    pub max_interval: Duration,

    /// Wall-clock ceiling across all attempts (default: 1 minute)
    pub max_elapsed_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_interval: Duration::from_secs(5),
            multiplier: 1.5,
            max_interval: Duration::from_secs(60),
            max_elapsed_time: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    /// Same backoff shape, different retry budget
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }
}

/// Read server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the HTTP server binds to (default: 0.0.0.0:8080)
    pub bind_address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

/// Sync scheduling configuration
#[derive(Clone, Debug, Default)]
pub struct SyncConfig {
    /// Period between runs; `None` runs once and exits
    pub interval: Option<Duration>,
}

const DEFAULT_PAGE_LIMIT: i64 = 100;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Missing required keys and unparsable optional values are both errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = required(&lookup, ENV_API_URL)?;
        let base_url = Url::parse(&api_url)
            .map_err(|e| Error::config(ENV_API_URL, format!("invalid {ENV_API_URL}: {e}")))?;

        let page_limit = optional(&lookup, ENV_PAGE_LIMIT)?.unwrap_or(DEFAULT_PAGE_LIMIT);
        if page_limit <= 0 {
            return Err(Error::config(
                ENV_PAGE_LIMIT,
                format!("{ENV_PAGE_LIMIT} must be greater than zero, got {page_limit}"),
            ));
        }

        let upstream = UpstreamConfig {
            base_url,
            public_key: required(&lookup, ENV_PUBLIC_KEY)?,
            private_key: required(&lookup, ENV_PRIVATE_KEY)?,
            page_limit,
            request_timeout: optional::<u64, _>(&lookup, ENV_HTTP_TIMEOUT_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_HTTP_TIMEOUT),
        };

        let database_url = required(&lookup, ENV_DATABASE_URL)?;

        let retry = RetryConfig::with_max_retries(
            optional(&lookup, ENV_MAX_RETRIES)?.unwrap_or(DEFAULT_MAX_RETRIES),
        );

        let server = ServerConfig {
            bind_address: optional(&lookup, ENV_BIND_ADDRESS)?
                .unwrap_or_else(|| ServerConfig::default().bind_address),
        };

        let sync = SyncConfig {
            interval: optional::<u64, _>(&lookup, ENV_SYNC_INTERVAL_SECS)?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };

        Ok(Self {
            upstream,
            database_url,
            retry,
            server,
            sync,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::config(key, format!("missing {key}"))),
    }
}

fn optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::config(key, format!("invalid {key} {raw:?}: {e}"))),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required_env() -> HashMap<String, String> {
        env(&[
            (ENV_API_URL, "https://gateway.example.com/v1/public/characters"),
            (ENV_PUBLIC_KEY, "public"),
            (ENV_PRIVATE_KEY, "private"),
            (ENV_DATABASE_URL, "sqlite://marvel.db"),
        ])
    }

    fn load(vars: &HashMap<String, String>) -> Result<Config> {
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = load(&required_env()).unwrap();

        assert_eq!(
            config.upstream.base_url.as_str(),
            "https://gateway.example.com/v1/public/characters"
        );
        assert_eq!(config.upstream.page_limit, 100);
        assert_eq!(config.upstream.request_timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.initial_interval, Duration::from_secs(5));
        assert_eq!(config.retry.max_elapsed_time, Duration::from_secs(60));
        assert_eq!(config.server.bind_address.port(), 8080);
        assert!(config.sync.interval.is_none());
    }

    #[test]
    fn each_required_key_is_fatal_when_missing() {
        for key in [ENV_API_URL, ENV_PUBLIC_KEY, ENV_PRIVATE_KEY, ENV_DATABASE_URL] {
            let mut vars = required_env();
            vars.remove(key);

            match load(&vars) {
                Err(Error::Config { key: Some(k), message }) => {
                    assert_eq!(k, key);
                    assert_eq!(message, format!("missing {key}"));
                }
                other => panic!("expected config error for {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn optional_overrides_are_parsed() {
        let mut vars = required_env();
        vars.extend(env(&[
            (ENV_PAGE_LIMIT, "50"),
            (ENV_MAX_RETRIES, "0"),
            (ENV_HTTP_TIMEOUT_SECS, "5"),
            (ENV_BIND_ADDRESS, "127.0.0.1:9000"),
            (ENV_SYNC_INTERVAL_SECS, "3600"),
        ]));

        let config = load(&vars).unwrap();
        assert_eq!(config.upstream.page_limit, 50);
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.upstream.request_timeout, Duration::from_secs(5));
        assert_eq!(config.server.bind_address.to_string(), "127.0.0.1:9000");
        assert_eq!(config.sync.interval, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn malformed_optional_value_is_an_error() {
        let mut vars = required_env();
        vars.insert(ENV_MAX_RETRIES.into(), "many".into());

        let err = load(&vars).unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == ENV_MAX_RETRIES));
    }

    #[test]
    fn non_positive_page_limit_is_rejected() {
        let mut vars = required_env();
        vars.insert(ENV_PAGE_LIMIT.into(), "0".into());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let mut vars = required_env();
        vars.insert(ENV_API_URL.into(), "not a url".into());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn debug_output_redacts_private_key() {
        let config = load(&required_env()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"private\""));
    }
}
