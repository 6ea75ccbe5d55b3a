use std::time::Duration;

use reqwest::Client;

use super::error::MangaDexError;
use crate::config::MangaDexConfig;
use crate::traits::JsonFetcher;

/// reqwest-backed [`JsonFetcher`].
///
/// Every request carries the configured `User-Agent` and is bounded by the
/// connect and read timeouts. Failures are logged once here and returned.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(config: &MangaDexConfig) -> Result<Self, MangaDexError> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .build()?;
        Ok(Self { http })
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, MangaDexError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(MangaDexError::Api {
                status,
                message: body,
            })
        }
    }

    async fn get(&self, url: &str) -> Result<serde_json::Value, MangaDexError> {
        let resp = self.http.get(url).send().await?;
        let resp = Self::check_response(resp).await?;

        tracing::debug!(url, status = %resp.status(), "MangaDex response received");
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| MangaDexError::Parse(e.to_string()))
    }
}

impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, MangaDexError> {
        tracing::debug!(url, "MangaDex request");

        self.get(url).await.inspect_err(|e| {
            tracing::warn!(url, error = %e, "MangaDex request failed");
        })
    }
}
