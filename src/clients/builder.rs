//! Client for the homepage builder service

use super::{HealthProbe, Result, build_http_client, post_envelope, probe_health};
use crate::config::{ServicesConfig, TimeoutConfig};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GeneratePayload<'a> {
    analysis_result: &'a Value,
    business_name: &'a str,
    style_preference: &'a str,
    include_booking: bool,
}

#[derive(Debug, Serialize)]
struct ScreenshotPayload<'a> {
    html_code: &'a str,
    css_code: &'a str,
    format: &'a str,
    viewport: &'a str,
}

/// Client for the builder's `/generate`, `/screenshot` and `/health`
/// endpoints
#[derive(Debug, Clone)]
pub struct BuilderClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    generate_timeout: Duration,
    screenshot_timeout: Duration,
    health_timeout: Duration,
}

impl BuilderClient {
    pub fn new(
        services: &ServicesConfig,
        timeouts: &TimeoutConfig,
        token: Option<String>,
    ) -> Result<Self> {
        let http = build_http_client(timeouts.connect())?;

        Ok(Self {
            http,
            base_url: services.builder_url.trim_end_matches('/').to_string(),
            token,
            generate_timeout: timeouts.generate(),
            screenshot_timeout: timeouts.screenshot(),
            health_timeout: timeouts.health(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a homepage from a completed analysis
    pub async fn generate(
        &self,
        analysis_result: &Value,
        business_name: &str,
        style_preference: &str,
        include_booking: bool,
    ) -> Result<Value> {
        let endpoint = format!("{}/generate", self.base_url);
        let payload = GeneratePayload {
            analysis_result,
            business_name,
            style_preference,
            include_booking,
        };

        debug!(
            business_name,
            style_preference, include_booking, endpoint, "Requesting homepage generation"
        );

        post_envelope(
            &self.http,
            &self.base_url,
            &endpoint,
            self.token.as_deref(),
            &payload,
            self.generate_timeout,
            "Homepage generation failed",
        )
        .await
    }

    /// Render a PNG screenshot of generated homepage code (desktop viewport)
    pub async fn screenshot(&self, html_code: &str, css_code: &str) -> Result<Value> {
        let endpoint = format!("{}/screenshot", self.base_url);
        let payload = ScreenshotPayload {
            html_code,
            css_code,
            format: "png",
            viewport: "desktop",
        };

        debug!(
            html_len = html_code.len(),
            css_len = css_code.len(),
            endpoint,
            "Requesting screenshot"
        );

        post_envelope(
            &self.http,
            &self.base_url,
            &endpoint,
            self.token.as_deref(),
            &payload,
            self.screenshot_timeout,
            "Screenshot generation failed",
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
        config.services.builder_url = "http://builder:8002///".to_string();

        let client = BuilderClient::new(&config.services, &config.timeouts, None).unwrap();
        assert_eq!(client.base_url(), "http://builder:8002");
    }
}
