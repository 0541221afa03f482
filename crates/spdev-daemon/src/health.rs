//! HTTP health probe for the backend

use spdev_core::prelude::*;
use std::time::Duration;

/// Per-request timeout for a single probe
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Reusable HTTP client for health checks
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: reqwest::Client,
}

impl HealthProbe {
    pub fn new() -> Result<Self> {
        // Redirects are not followed: only a direct 2xx counts as healthy.
        // The backend is local, so proxy settings from the environment are ignored.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| Error::process(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// `true` when `url` answers with a 2xx status
    pub async fn check(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                trace!("Health probe {} -> {}", url, status);
                status.is_success()
            }
            Err(e) => {
                trace!("Health probe {} failed: {}", url, e);
                false
            }
        }
    }
}
