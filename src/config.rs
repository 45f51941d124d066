use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_path: PathBuf,

    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Mediastack ingestion
    pub mediastack_api_url: String,
    pub mediastack_access_key: Option<String>,
    pub ingest_interval: Duration,
    pub ingest_sources: Vec<String>,
    pub ingest_categories: Vec<String>,
    pub ingest_languages: Vec<String>,
    pub ingest_countries: Vec<String>,

    // Enrichment services
    pub gravatar_base_url: String,
    pub github_base_url: String,
    pub fetch_timeout: Duration,

    // Ranking
    pub trending_threshold: i64,
    pub trending_limit: usize,
    pub top_comments: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Database
            database_path: PathBuf::from(env_or_default("DATABASE_PATH", "./data/coolpress.sqlite")),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,

            // Mediastack ingestion
            mediastack_api_url: env_or_default("MEDIASTACK_API_URL", "https://api.mediastack.com"),
            mediastack_access_key: optional_env("MEDIASTACK_ACCESS_KEY"),
            ingest_interval: Duration::from_secs(parse_env_u64("INGEST_INTERVAL_SECS", 3600)?),
            ingest_sources: parse_env_list("INGEST_SOURCES", ""),
            ingest_categories: parse_env_list("INGEST_CATEGORIES", "general"),
            ingest_languages: parse_env_list("INGEST_LANGUAGES", "en"),
            ingest_countries: parse_env_list("INGEST_COUNTRIES", "us"),

            // Enrichment services
            gravatar_base_url: env_or_default("GRAVATAR_BASE_URL", "https://www.gravatar.com"),
            github_base_url: env_or_default("GITHUB_BASE_URL", "https://github.com"),
            fetch_timeout: Duration::from_secs(parse_env_u64("FETCH_TIMEOUT_SECS", 10)?),

            // Ranking
            trending_threshold: parse_env_i64("TRENDING_THRESHOLD", 5)?,
            trending_limit: parse_env_usize("TRENDING_LIMIT", 20)?,
            top_comments: parse_env_usize("TOP_COMMENTS", 10)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trending_threshold < 0 {
            return Err(ConfigError::InvalidValue {
                name: "TRENDING_THRESHOLD".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.trending_limit == 0 {
            return Err(ConfigError::InvalidValue {
                name: "TRENDING_LIMIT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.mediastack_api_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "MEDIASTACK_API_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// A configuration suitable for tests: no ingestion key, short timeouts.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            mediastack_api_url: "http://127.0.0.1:0".to_string(),
            mediastack_access_key: None,
            ingest_interval: Duration::from_secs(3600),
            ingest_sources: Vec::new(),
            ingest_categories: vec!["general".to_string()],
            ingest_languages: vec!["en".to_string()],
            ingest_countries: vec!["us".to_string()],
            gravatar_base_url: "http://127.0.0.1:0".to_string(),
            github_base_url: "http://127.0.0.1:0".to_string(),
            fetch_timeout: Duration::from_secs(5),
            trending_threshold: 5,
            trending_limit: 20,
            top_comments: 10,
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse a comma-separated environment variable into a list, dropping blanks.
fn parse_env_list(name: &str, default: &str) -> Vec<String> {
    let raw = env_or_default(name, default);
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_i64(name: &str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
