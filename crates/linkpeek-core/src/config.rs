//! Engine configuration.
//!
//! Parses the embedder-supplied configuration blob. Endpoint and link
//! prefix default to the public encyclopedia endpoints; the user agent has
//! no default because the summary endpoint rejects anonymous clients.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";
const DEFAULT_HREF_PREFIX: &str = "https://en.wikipedia.org/wiki/";
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Static configuration for one preview engine instance.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// REST endpoint a title is appended to when fetching its summary.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Links whose href starts with this prefix are previewable; everything
    /// else is silently ignored.
    #[serde(default = "default_href_prefix")]
    pub href_prefix: String,
    /// Client identification sent with every summary request. Required.
    pub user_agent: String,
    /// Upper bound on a single summary request, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_href_prefix() -> String {
    DEFAULT_HREF_PREFIX.to_string()
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

impl PreviewConfig {
    /// Build a config with defaults for everything but the user agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            href_prefix: default_href_prefix(),
            user_agent: user_agent.into(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }

    /// Parse and validate a JSON configuration blob.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: PreviewConfig =
            serde_json::from_str(raw).context("Failed to parse preview configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check URL shape and the mandatory user agent.
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent is required by the summary endpoint");
        }
        Url::parse(&self.endpoint).context("endpoint is not a valid URL")?;
        Url::parse(&self.href_prefix).context("href_prefix is not a valid URL")?;
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
