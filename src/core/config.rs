use std::env;
use std::time::Duration;

use reqwest::Url;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8888";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Service root; always ends with `/` so endpoint paths join under it.
    pub base_url: Url,
    pub timeout: Duration,
    /// Replacement for the built-in text rendered when a reply carries no content.
    pub fallback: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SHOP_CHAT_BASE_URL is not a valid http(s) URL ({value}): {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("SHOP_CHAT_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Load configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    from_lookup(|key| env::var(key).ok())
}

/// Build a configuration from any key lookup (the environment, or a map in tests).
pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = lookup("SHOP_CHAT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = parse_base_url(&base_url)?;

    let timeout = match lookup("SHOP_CHAT_TIMEOUT_SECS") {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => return Err(ConfigError::InvalidTimeout(raw)),
        },
        None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    };

    let fallback = lookup("SHOP_CHAT_FALLBACK").filter(|s| !s.trim().is_empty());

    Ok(Config {
        base_url,
        timeout,
        fallback,
    })
}

/// Parse and normalize a service root URL.
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason,
    };
    let mut url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl Config {
    /// Replace the service root (e.g. from `--base-url`).
    pub fn with_base_url(mut self, value: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(value)?;
        Ok(self)
    }

    pub fn chat_url(&self) -> Url {
        self.endpoint("api/v1/chat")
    }

    pub fn health_url(&self) -> Url {
        self.endpoint("api/v1/health")
    }

    fn endpoint(&self, path: &str) -> Url {
        // base_url always ends with '/', so joining a relative path cannot fail
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}
