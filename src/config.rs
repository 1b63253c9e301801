//! # Configuration
//!
//! [`RestConfig`] is read from a JSON file (every key optional) and then
//! overridden by environment variables:
//!
//! | Variable | Key |
//! |----------|-----|
//! | `POLICY_ACCESS_REST_URL` | `restUrl` |
//! | `POLICY_ACCESS_TIMEOUT_MS` | `timeoutMs` |
//! | `POLICY_ACCESS_REQUEST_BUFFER` | `requestBuffer` |
//! | `POLICY_ACCESS_CACHE_TTL_MS` | `cacheTtlMs` |
//!
//! Log levels are not configured here; see [`setup_tracing`](crate::lifecycle::setup_tracing).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::framework::HalEndpoint;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestConfig {
    /// Root of the REST API, e.g. `http://localhost:8080/server/api`.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// Link path -> href, for collections not directly below `rest_url`.
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Capacity of the request cache's message queue.
    #[serde(default = "default_request_buffer")]
    pub request_buffer: usize,
    /// How long a completed response is served from the cache.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
}

fn default_rest_url() -> String {
    "http://localhost:8080/server/api".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_request_buffer() -> usize {
    32
}

fn default_cache_ttl_ms() -> u64 {
    15 * 60 * 1000
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            endpoints: HashMap::new(),
            timeout_ms: default_timeout_ms(),
            request_buffer: default_request_buffer(),
            cache_ttl_ms: default_cache_ttl_ms(),
        }
    }
}

impl RestConfig {
    /// Loads `path`, then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)?.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Applies `POLICY_ACCESS_*` overrides looked up through `lookup`.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = lookup("POLICY_ACCESS_REST_URL") {
            self.rest_url = url;
        }
        if let Some(value) = lookup("POLICY_ACCESS_TIMEOUT_MS") {
            self.timeout_ms = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "POLICY_ACCESS_TIMEOUT_MS",
                value,
            })?;
        }
        if let Some(value) = lookup("POLICY_ACCESS_REQUEST_BUFFER") {
            self.request_buffer = match value.parse() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "POLICY_ACCESS_REQUEST_BUFFER",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("POLICY_ACCESS_CACHE_TTL_MS") {
            self.cache_ttl_ms = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "POLICY_ACCESS_CACHE_TTL_MS",
                value,
            })?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn endpoint(&self) -> HalEndpoint {
        self.endpoints
            .iter()
            .fold(HalEndpoint::new(&self.rest_url), |endpoint, (link_path, href)| {
                endpoint.with_link(link_path, href)
            })
    }
}
