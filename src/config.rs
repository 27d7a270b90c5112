use std::time::Duration;

use anyhow::Context;

/// Connection settings for the Mirror API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base path every endpoint is resolved against, e.g.
    /// `https://dev.refinemirror.com/api/v1/`.
    pub base_url: String,
    /// Transport-level request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("MIRROR_API_BASE")
            .unwrap_or_else(|_| "https://dev.refinemirror.com/api/v1/".into());
        base_url
            .parse::<reqwest::Url>()
            .context("MIRROR_API_BASE is not a valid URL")?;

        let timeout_secs = std::env::var("MIRROR_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
