#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_GENERATION_URL: &str = "http://localhost:8001";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
/// Course generation chains several model calls and routinely takes minutes.
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 300_000;

pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
pub const ENV_API_TIMEOUT: &str = "API_TIMEOUT";
pub const ENV_API_RETRY_ATTEMPTS: &str = "API_RETRY_ATTEMPTS";
pub const ENV_API_RETRY_DELAY_MS: &str = "API_RETRY_DELAY_MS";
pub const ENV_GENERATION_URL: &str = "GENERATION_URL";
pub const ENV_GENERATION_TIMEOUT: &str = "GENERATION_TIMEOUT";

/// Settings for one resilient client instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_to_millis(timeout);
        self
    }

    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = duration_to_millis(delay);
        self
    }

    /// Backend settings from `BACKEND_URL`, `API_TIMEOUT`,
    /// `API_RETRY_ATTEMPTS` and `API_RETRY_DELAY_MS`.
    pub fn backend_from_env() -> Self {
        Self::backend_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn backend_from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BACKEND_URL)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Self::with_shared_settings(base_url, &lookup)
    }

    /// Generation service settings. The timeout comes from
    /// `GENERATION_TIMEOUT`, not `API_TIMEOUT`; retry variables are shared
    /// with the backend.
    pub fn generation_from_env() -> Self {
        Self::generation_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn generation_from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_GENERATION_URL)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_GENERATION_URL.to_string());
        Self {
            timeout_ms: parse_or(lookup(ENV_GENERATION_TIMEOUT), DEFAULT_GENERATION_TIMEOUT_MS),
            ..Self::with_shared_settings(base_url, &lookup)
        }
    }

    fn with_shared_settings<F>(base_url: String, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url,
            timeout_ms: parse_or(lookup(ENV_API_TIMEOUT), DEFAULT_TIMEOUT_MS),
            retry_attempts: parse_or(lookup(ENV_API_RETRY_ATTEMPTS), DEFAULT_RETRY_ATTEMPTS),
            retry_delay_ms: parse_or(lookup(ENV_API_RETRY_DELAY_MS), DEFAULT_RETRY_DELAY_MS),
        }
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable setting '{}', using default", value);
            default
        }),
        None => default,
    }
}

impl ConfigProvider for ClientConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn max_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_range("timeout_ms", self.timeout_ms, 1, 600_000)?;
        validate_range("retry_attempts", self.retry_attempts, 1, 10)?;
        validate_range("retry_delay_ms", self.retry_delay_ms, 0, 60_000)?;
        Ok(())
    }
}
