use std::{fmt::Display, net::SocketAddr, time::Duration};

use serde_derive::{Deserialize, Serialize};

use crate::domain::models::url::UrlParseError;
use crate::domain::{ApiKey, BaseUrl};

pub const DEFAULT_TIMEOUT_MS: u64 = 6000;
pub const DEFAULT_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_RESOURCE: &str = "enrichedframe";
pub const DEFAULT_LISTEN: ([u8; 4], u16) = ([127, 0, 0, 1], 8080);

/// Raw settings as read from one source. Every key is optional here; required
/// keys are checked when the typed configs are built.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: Option<u64>,
    pub interval_ms: Option<u64>,
    pub resource: Option<String>,
    pub listen: Option<SocketAddr>,
}

impl Settings {
    /// Keys set in `top` win over keys set in `self`.
    pub fn overlay(self, top: Settings) -> Settings {
        Settings {
            base_url: top.base_url.or(self.base_url),
            api_key: top.api_key.or(self.api_key),
            timeout_ms: top.timeout_ms.or(self.timeout_ms),
            interval_ms: top.interval_ms.or(self.interval_ms),
            resource: top.resource.or(self.resource),
            listen: top.listen.or(self.listen),
        }
    }

    pub fn connection(&self) -> Result<ConnectionConfig, ConfigError> {
        let base_url = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|x| !x.is_empty());
        let api_key = self
            .api_key
            .clone()
            .and_then(|x| ApiKey::try_from(x).ok());

        let (base_url, api_key) = match (base_url, api_key) {
            (Some(base_url), Some(api_key)) => (base_url, api_key),
            (base_url, api_key) => {
                let mut missing = Vec::new();
                if base_url.is_none() {
                    missing.push("base_url");
                }
                if api_key.is_none() {
                    missing.push("api_key");
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("timeout_ms"));
        }

        Ok(ConnectionConfig {
            base_url: BaseUrl::new(base_url)?,
            api_key,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn poll(&self) -> Result<PollConfig, ConfigError> {
        let interval_ms = self.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS);
        if interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("interval_ms"));
        }
        let resource = self
            .resource
            .as_deref()
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .unwrap_or(DEFAULT_RESOURCE);

        Ok(PollConfig {
            resource: resource.to_owned(),
            period: Duration::from_millis(interval_ms),
        })
    }

    pub fn listen(&self) -> SocketAddr {
        self.listen.unwrap_or_else(|| DEFAULT_LISTEN.into())
    }
}

/// Everything the HTTP client needs, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub base_url: BaseUrl,
    pub api_key: ApiKey,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub resource: String,
    pub period: Duration,
}
impl Default for PollConfig {
    fn default() -> Self {
        Self {
            resource: DEFAULT_RESOURCE.to_owned(),
            period: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required connection parameters are absent. Never defaulted.
    Missing(Vec<&'static str>),
    InvalidBaseUrl(UrlParseError),
    ZeroDuration(&'static str),
}
impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(keys) => f.write_fmt(format_args!(
                "API base URL and/or API key are not set (missing: {}).",
                keys.join(", ")
            )),
            ConfigError::InvalidBaseUrl(e) => f.write_fmt(format_args!("base_url: {e}")),
            ConfigError::ZeroDuration(key) => {
                f.write_fmt(format_args!("{key} must be greater than zero."))
            }
        }
    }
}
impl std::error::Error for ConfigError {}
impl From<UrlParseError> for ConfigError {
    fn from(e: UrlParseError) -> Self {
        ConfigError::InvalidBaseUrl(e)
    }
}
