//! Configuration handling for the bot.
//!
//! Every value has a development default so a bare `cargo run -- --dry-run`
//! works. `Config::from_env` reads the overrides and validates the numeric
//! ones; the publish credential is only checked when a real publish is about
//! to happen.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use crate::sources::SourceTable;

/// Environment variable names. Public so tests and deploy scripts can refer to them.
pub const ENV_MAX_ATTEMPTS: &str = "PALIMPSESTE_MAX_ATTEMPTS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "PALIMPSESTE_HTTP_TIMEOUT_SECS";
pub const ENV_SOURCES_FILE: &str = "PALIMPSESTE_SOURCES_FILE";
pub const ENV_SITE_URL: &str = "PALIMPSESTE_SITE_URL";
pub const ENV_HASHTAGS: &str = "PALIMPSESTE_HASHTAGS";
pub const ENV_PUBLISH_URL: &str = "PALIMPSESTE_PUBLISH_URL";
pub const ENV_BEARER_TOKEN: &str = "X_BEARER_TOKEN";

const DEFAULT_MAX_ATTEMPTS: u32 = 8;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SITE_URL: &str = "https://palimpseste.vercel.app";
const DEFAULT_HASHTAGS: &str = "#littérature #palimpseste";
const DEFAULT_PUBLISH_URL: &str = "https://api.twitter.com/2/tweets";

/// Bot runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    max_attempts: u32,
    http_timeout: Duration,
    sources_file: Option<PathBuf>,
    site_url: String,
    hashtags: String,
    publish_url: String,
    bearer_token: Option<String>,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_attempts = parse_var(ENV_MAX_ATTEMPTS, DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_MAX_ATTEMPTS,
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = parse_var(ENV_HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_HTTP_TIMEOUT_SECS,
                reason: "must be at least 1 second".to_string(),
            });
        }

        let sources_file = non_empty_var(ENV_SOURCES_FILE).map(PathBuf::from);
        let site_url = non_empty_var(ENV_SITE_URL).unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let hashtags = env::var(ENV_HASHTAGS).unwrap_or_else(|_| DEFAULT_HASHTAGS.to_string());
        let publish_url =
            non_empty_var(ENV_PUBLISH_URL).unwrap_or_else(|| DEFAULT_PUBLISH_URL.to_string());
        let bearer_token = non_empty_var(ENV_BEARER_TOKEN);

        Ok(Self {
            max_attempts,
            http_timeout: Duration::from_secs(timeout_secs),
            sources_file,
            site_url: site_url.trim_end_matches('/').to_string(),
            hashtags,
            publish_url,
            bearer_token,
        })
    }

    /// Retry budget for the discovery loop.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Override the retry budget (used by the `--max-attempts` flag).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Timeout applied to every outbound HTTP call.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Base URL of the web app, used for author-profile links.
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn hashtags(&self) -> &str {
        &self.hashtags
    }

    pub fn publish_url(&self) -> &str {
        &self.publish_url
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Source table: the JSON file when configured, the built-in table otherwise.
    pub fn source_table(&self) -> Result<SourceTable, ConfigError> {
        match &self.sources_file {
            Some(path) => SourceTable::from_json_file(path),
            None => SourceTable::builtin(),
        }
    }
}

impl Default for Config {
    /// Development defaults (mirrors `from_env` with no env overrides).
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            sources_file: None,
            site_url: DEFAULT_SITE_URL.to_string(),
            hashtags: DEFAULT_HASHTAGS.to_string(),
            publish_url: DEFAULT_PUBLISH_URL.to_string(),
            bearer_token: None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    match non_empty_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field: key,
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
    /// The source table file could not be read or parsed.
    Sources { path: PathBuf, reason: String },
    /// A source table that cannot drive weighted selection.
    InvalidSources(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
            ConfigError::Sources { path, reason } => {
                write!(f, "cannot load source table {}: {}", path.display(), reason)
            }
            ConfigError::InvalidSources(reason) => write!(f, "invalid source table: {}", reason),
        }
    }
}

impl Error for ConfigError {}
