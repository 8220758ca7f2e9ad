//! Application configuration
//!
//! Loaded once from YAML at startup and immutable afterwards. Every section
//! is optional; the defaults reproduce the demo setup (paged, 2 per page,
//! at most 20).

use crate::error::{Error, Result};
use crate::pagination::PaginationSettings;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::net::lookup_host;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Collection windowing
    #[serde(default)]
    pub pagination: PaginationSettings,

    /// HTTP listener
    #[serde(default)]
    pub server: ServerSettings,

    /// Demo data
    #[serde(default)]
    pub seed: SeedSettings,

    /// Edit client
    #[serde(default)]
    pub client: ClientSettings,
}

impl AppConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<()> {
        self.pagination.validate()?;
        if self.client.base_url.trim().is_empty() {
            return Err(Error::invalid_config("client.base_url", "must not be empty"));
        }
        if self.server.host.trim().is_empty() {
            return Err(Error::invalid_config("server.host", "must not be empty"));
        }
        url::Url::parse(&self.client.base_url)?;
        if self.client.request_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "client.request_timeout_secs",
                "must be at least 1",
            ));
        }
        if self.client.save_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "client.save_timeout_secs",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Resolve the host to the first socket address to bind
    ///
    /// Accepts IP literals as well as names such as `localhost`.
    pub async fn addr(&self) -> Result<SocketAddr> {
        let mut addrs = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| Error::invalid_config("server.host", format!("{}: {e}", self.host)))?;
        addrs.next().ok_or_else(|| {
            Error::invalid_config("server.host", format!("{} resolves to no address", self.host))
        })
    }
}

/// Seed settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSettings {
    /// Number of articles created at startup
    #[serde(default = "default_seed_articles")]
    pub articles: usize,
}

fn default_seed_articles() -> usize {
    5
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            articles: default_seed_articles(),
        }
    }
}

/// Settings for the edit client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSettings {
    /// Server the client talks to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound on one save, retries included
    #[serde(default = "default_save_timeout_secs")]
    pub save_timeout_secs: u64,
    /// Retries on retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_save_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            save_timeout_secs: default_save_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn save_timeout(&self) -> Duration {
        Duration::from_secs(self.save_timeout_secs)
    }
}
