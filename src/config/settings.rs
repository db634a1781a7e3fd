//! Settings structures for placefinder configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default base URL of the remote place service
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (PLACEFINDER_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("PLACEFINDER_API_KEY") {
            self.remote.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("PLACEFINDER_BASE_URL") {
            self.remote.base_url = val;
        }
        if let Ok(val) = std::env::var("PLACEFINDER_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.search.request_timeout = secs;
            }
        }
    }
}

/// Remote place service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// API key for the remote service; absence is detected before any
    /// network call is made
    pub api_key: Option<String>,
    /// Base URL, without the `/place/...` suffix
    pub base_url: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Per-request timeout in seconds, passed through to the transport
    pub request_timeout: f64,
    /// Language name used when a request does not set one (see
    /// `Language::from_name`); English when absent or unknown
    pub default_language: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            default_language: None,
        }
    }
}

impl SearchSettings {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout)
    }
}

/// Outgoing HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Connection-level timeout in seconds
    pub request_timeout: f64,
    /// Whether to verify SSL certificates
    pub verify_ssl: bool,
    /// Maximum idle connections per host
    pub pool_maxsize: usize,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            verify_ssl: true,
            pool_maxsize: 10,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Proxy for all protocols
    pub all: Option<String>,
    /// HTTP-only proxy
    pub http: Option<String>,
    /// HTTPS-only proxy
    pub https: Option<String>,
}
