use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::acquisition::{
    AcquisitionSettings, Credentials, DEFAULT_BASE_URL, DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE,
    DEFAULT_FRESHNESS, DEFAULT_REQUEST_TIMEOUT,
};
use crate::conjunction::{DEFAULT_FEED_URL, DEFAULT_TRACKED};

pub const USERNAME_ENV: &str = "SPACE_TRACK_USERNAME";
pub const PASSWORD_ENV: &str = "SPACE_TRACK_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub upstream: UpstreamConfig,
    pub acquisition: AcquisitionConfig,
    pub conjunctions: ConjunctionsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub request_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            password: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub batch_size: usize,
    #[serde(deserialize_with = "deserialize_duration")]
    pub batch_delay: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub freshness: Duration,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            freshness: Duration::from_secs(DEFAULT_FRESHNESS.num_seconds().unsigned_abs()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConjunctionsConfig {
    pub feed_url: String,
    pub tracked: Vec<u32>,
}

impl Default for ConjunctionsConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            tracked: DEFAULT_TRACKED.to_vec(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise defaults; credentials from the
    /// environment take precedence either way.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.override_credentials(
            std::env::var(USERNAME_ENV).ok(),
            std::env::var(PASSWORD_ENV).ok(),
        );
        Ok(config)
    }

    /// Non-empty values replace whatever the file provided.
    pub fn override_credentials(&mut self, username: Option<String>, password: Option<String>) {
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            self.upstream.username = Some(username);
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.upstream.password = Some(password);
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(
            self.upstream.username.clone(),
            self.upstream.password.clone(),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.acquisition.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "acquisition.batch_size must be at least 1".into(),
            ));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("upstream.base_url is empty".into()));
        }
        if self.upstream.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "upstream.request_timeout must be positive".into(),
            ));
        }
        self.acquisition_settings().map(|_| ())
    }

    pub fn acquisition_settings(&self) -> Result<AcquisitionSettings, ConfigError> {
        let freshness = chrono::Duration::from_std(self.acquisition.freshness)
            .map_err(|e| ConfigError::Invalid(format!("acquisition.freshness: {}", e)))?;
        Ok(AcquisitionSettings {
            batch_size: self.acquisition.batch_size,
            batch_delay: self.acquisition.batch_delay,
            request_timeout: self.upstream.request_timeout,
            freshness,
        })
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
