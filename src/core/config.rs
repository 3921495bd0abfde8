//! Proxy endpoint configuration
//!
//! The client needs exactly two values: where the proxy lives and the anon
//! key it expects. Both are read once at startup; a missing value is a fatal
//! configuration error, never a per-call condition. The resulting
//! [`ProxyConfig`] is immutable and handed to the client explicitly so no
//! code path reads the environment ad hoc.

use std::env;
use std::error::Error;
use std::fmt;

use crate::utils::url::normalize_base_url;

/// Environment variable naming the proxy's base URL.
pub const BASE_URL_VAR: &str = "AI_PROXY_BASE_URL";

/// Environment variable naming the anon key presented to the proxy.
pub const ANON_KEY_VAR: &str = "AI_PROXY_ANON_KEY";

/// Immutable connection settings for the chat proxy.
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    base_url: String,
    anon_key: String,
}

impl ProxyConfig {
    /// Build a config from explicit values. The base URL is normalized so
    /// endpoint construction never produces double slashes.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            anon_key: anon_key.into(),
        }
    }

    /// Read both required values from the process environment.
    ///
    /// Hosts call this once during startup and treat an `Err` as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = require(&lookup, BASE_URL_VAR)?;
        let anon_key = require(&lookup, ANON_KEY_VAR)?;
        Ok(Self::new(base_url, anon_key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    // An empty value is as fatal as an absent one.
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

/// Failure to assemble a [`ProxyConfig`] at startup.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => write!(
                f,
                "Missing required configuration value {name} for the chat proxy client"
            ),
        }
    }
}

impl Error for ConfigError {}
