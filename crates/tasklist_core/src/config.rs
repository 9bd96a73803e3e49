//! Store selection and remote client configuration.
//!
//! # Invariants
//! - `RemoteConfig::base_url` never ends with `/`.
//! - The core never reads environment variables; hosts build these values.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyBaseUrl,
    UnsupportedScheme(String),
    ZeroTimeout,
    UnknownMode(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBaseUrl => write!(f, "server url cannot be empty"),
            Self::UnsupportedScheme(url) => {
                write!(f, "server url must start with http:// or https://, got `{url}`")
            }
            Self::ZeroTimeout => write!(f, "request timeout must be greater than zero"),
            Self::UnknownMode(mode) => {
                write!(f, "unsupported store mode `{mode}`; expected local|remote")
            }
        }
    }
}

impl Error for ConfigError {}

/// Remote task service endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    base_url: String,
    request_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Which task store backs a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    /// Device-only collection persisted to the key-value blob.
    Local,
    /// Collection owned by the remote task service.
    Remote(RemoteConfig),
}

impl StoreMode {
    /// Parses `local` or `remote`; `remote` requires a server url.
    pub fn parse(mode: &str, server_url: Option<&str>) -> Result<Self, ConfigError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => {
                let url = server_url.ok_or(ConfigError::EmptyBaseUrl)?;
                Ok(Self::Remote(RemoteConfig::new(url)?))
            }
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote(_) => "remote",
        }
    }
}
