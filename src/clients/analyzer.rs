//! Client for the website analyzer service

use super::{HealthProbe, Result, build_http_client, post_envelope, probe_health};
use crate::config::{ServicesConfig, TimeoutConfig};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct AnalyzePayload<'a> {
    url: &'a str,
    include_seo: bool,
    max_pages: u32,
}

/// Client for `POST {analyzer_url}/analyze` and `GET {analyzer_url}/health`
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    analyze_timeout: Duration,
    health_timeout: Duration,
}

impl AnalyzerClient {
    pub fn new(
        services: &ServicesConfig,
        timeouts: &TimeoutConfig,
        token: Option<String>,
    ) -> Result<Self> {
        let http = build_http_client(timeouts.connect())?;

        Ok(Self {
            http,
            base_url: services.analyzer_url.trim_end_matches('/').to_string(),
            token,
            analyze_timeout: timeouts.analyze(),
            health_timeout: timeouts.health(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a full website analysis. This is the long call of the workflow:
    /// the analyzer may crawl up to `max_pages` pages before answering.
    pub async fn analyze(&self, url: &str, include_seo: bool, max_pages: u32) -> Result<Value> {
        let endpoint = format!("{}/analyze", self.base_url);
        let payload = AnalyzePayload {
            url,
            include_seo,
            max_pages,
        };

        debug!(url, include_seo, max_pages, endpoint, "Requesting analysis");

        post_envelope(
            &self.http,
            &self.base_url,
            &endpoint,
            self.token.as_deref(),
            &payload,
            self.analyze_timeout,
            "Analysis failed",
        )
        .await
    }

    pub async fn health(&self) -> Result<HealthProbe> {
        probe_health(&self.http, &self.base_url, self.health_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn base_url_is_normalized() {
        let mut config = Config::default();
        config.services.analyzer_url = "http://analyzer:8001/".to_string();

        let client =
            AnalyzerClient::new(&config.services, &config.timeouts, None).unwrap();
        assert_eq!(client.base_url(), "http://analyzer:8001");
    }
}
