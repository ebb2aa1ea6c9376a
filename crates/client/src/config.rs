//! Client configuration from the environment.

use std::time::Duration;

use anyhow::{Context, bail};

use stockroom_observability::LogFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    pub auth_token: Option<String>,
    /// How long a fetched collection is reused before the next query refetches it.
    pub stale_time: Duration,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
    pub locale: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            stale_time: Duration::from_secs(30),
            request_timeout: Duration::from_secs(15),
            log_format: LogFormat::Json,
            locale: "en".to_string(),
        }
    }
}

impl ClientConfig {
    /// Read `STOCKROOM_*` variables from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or blank variables fall
    /// back to defaults; malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let api_url = match get("STOCKROOM_API_URL") {
            Some(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    bail!("STOCKROOM_API_URL must start with http:// or https:// (got `{url}`)");
                }
                url.trim_end_matches('/').to_string()
            }
            None => defaults.api_url,
        };

        let secs = |name: &str, default: Duration| -> anyhow::Result<Duration> {
            match get(name) {
                Some(raw) => raw
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{name} must be a whole number of seconds (got `{raw}`)")),
                None => Ok(default),
            }
        };
        let stale_time = secs("STOCKROOM_STALE_SECS", defaults.stale_time)?;
        let request_timeout = secs("STOCKROOM_TIMEOUT_SECS", defaults.request_timeout)?;
        if request_timeout.is_zero() {
            bail!("STOCKROOM_TIMEOUT_SECS must be greater than zero");
        }

        let log_format = match get("STOCKROOM_LOG_FORMAT") {
            Some(raw) => raw.parse().context("invalid STOCKROOM_LOG_FORMAT")?,
            None => defaults.log_format,
        };

        Ok(Self {
            api_url,
            auth_token: get("STOCKROOM_AUTH_TOKEN"),
            stale_time,
            request_timeout,
            log_format,
            locale: get("STOCKROOM_LOCALE").unwrap_or(defaults.locale),
        })
    }
}
