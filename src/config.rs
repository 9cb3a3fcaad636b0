//! Model configuration
//!
//! Loads a [`ModelConfig`] from a key/value [`ConfigSource`] (normally the
//! process environment), applying defaults and rejecting malformed overrides.
//! Loading never touches the network.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// Recognised configuration keys.
pub mod keys {
    pub const API_KEY: &str = "OPENAI_API_KEY";
    pub const MODEL_NAME: &str = "OPENAI_MODEL_NAME";
    pub const BASE_URL: &str = "OPENAI_BASE_URL";
    pub const TEMPERATURE: &str = "OPENAI_TEMPERATURE";
    pub const TIMEOUT: &str = "OPENAI_TIMEOUT";
    pub const MAX_RETRIES: &str = "OPENAI_MAX_RETRIES";
}

/// Sampling temperature used when none is configured (deterministic output).
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
/// Client construction timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Construction retries used when none is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Key/value lookup the configuration is read from.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigSource for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|v| (*v).to_string())
    }
}

/// Validated model configuration.
///
/// Created once per run and not mutated afterwards. The API key is kept in a
/// [`SecretString`], so `Debug` output never contains it.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// API key for authentication
    pub api_key: SecretString,
    /// Model identifier
    pub model: String,
    /// Endpoint override; `None` means the adapter's default
    pub base_url: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound for the whole client construction (all attempts included)
    pub timeout: Duration,
    /// Construction retries after the first attempt
    pub max_retries: u32,
}

impl ModelConfig {
    /// Create a configuration with defaults for every optional field.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            model: model.into(),
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the endpoint override
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the sampling temperature
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the construction timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of construction retries
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvSource)
    }

    /// Load from an arbitrary source. Empty values count as absent.
    pub fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, ConfigError> {
        let lookup = |key: &str| source.get(key).filter(|v| !v.trim().is_empty());

        let api_key = lookup(keys::API_KEY).ok_or(ConfigError::Missing { key: keys::API_KEY })?;
        let model = lookup(keys::MODEL_NAME).ok_or(ConfigError::Missing {
            key: keys::MODEL_NAME,
        })?;
        let mut config = Self::new(api_key, model);

        if let Some(base_url) = lookup(keys::BASE_URL) {
            config.base_url = Some(base_url);
        }

        if let Some(raw) = lookup(keys::TEMPERATURE) {
            config.temperature = parse_temperature(&raw)?;
        }

        if let Some(raw) = lookup(keys::TIMEOUT) {
            config.timeout = parse_duration(&raw)
                .map_err(|reason| ConfigError::invalid(keys::TIMEOUT, &raw, reason))?;
        }

        if let Some(raw) = lookup(keys::MAX_RETRIES) {
            config.max_retries = raw.trim().parse::<u32>().map_err(|e| {
                ConfigError::invalid(
                    keys::MAX_RETRIES,
                    &raw,
                    format!("expected a non-negative integer ({e})"),
                )
            })?;
        }

        config.validate()?;
        tracing::debug!(
            model = %config.model,
            base_url = config.base_url.as_deref().unwrap_or("<default>"),
            temperature = config.temperature,
            timeout_ms = config.timeout.as_millis() as u64,
            max_retries = config.max_retries,
            "loaded model configuration"
        );
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::Missing { key: keys::API_KEY });
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: keys::MODEL_NAME,
            });
        }

        if let Some(base_url) = &self.base_url
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            return Err(ConfigError::invalid(
                keys::BASE_URL,
                base_url,
                "must start with http:// or https://",
            ));
        }

        if !self.temperature.is_finite() {
            return Err(ConfigError::invalid(
                keys::TEMPERATURE,
                &self.temperature.to_string(),
                "must be a finite number",
            ));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::invalid(
                keys::TIMEOUT,
                "0s",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let value = raw.trim().parse::<f32>().map_err(|e| {
        ConfigError::invalid(keys::TEMPERATURE, raw, format!("expected a number ({e})"))
    })?;
    if !value.is_finite() {
        return Err(ConfigError::invalid(
            keys::TEMPERATURE,
            raw,
            "must be a finite number",
        ));
    }
    Ok(value)
}

/// Parse a duration such as `30s`, `1m30s`, `1.5s`, `250ms` or a bare number
/// of seconds (`45`, `2.5`).
///
/// Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. Negative values are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    if s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        let secs: f64 = s.parse().map_err(|_| format!("invalid number {s:?}"))?;
        return nanos_to_duration(secs * 1e9);
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut rest = s;
    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let num_end = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        if num_end == 0 {
            return Err(format!("expected a number at {rest:?}"));
        }
        let value: f64 = rest[..num_end]
            .parse()
            .map_err(|_| format!("invalid number {:?}", &rest[..num_end]))?;
        rest = &rest[num_end..];

        let unit_end = rest.find(is_number).unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in {s:?}")),
            other => return Err(format!("unknown unit {other:?} in {s:?}")),
        };
        total_nanos += value * nanos_per_unit;
        rest = &rest[unit_end..];
    }

    nanos_to_duration(total_nanos)
}

fn nanos_to_duration(nanos: f64) -> Result<Duration, String> {
    if !nanos.is_finite() || nanos < 0.0 || nanos >= u64::MAX as f64 {
        return Err("duration out of range".to_string());
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}
