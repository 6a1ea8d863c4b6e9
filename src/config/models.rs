use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:3000".parse().unwrap()
}

/// Base URLs of the downstream services the orchestrator drives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServicesConfig {
    #[serde(default = "default_analyzer_url")]
    pub analyzer_url: String,
    #[serde(default = "default_builder_url")]
    pub builder_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            analyzer_url: default_analyzer_url(),
            builder_url: default_builder_url(),
        }
    }
}

fn default_analyzer_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_builder_url() -> String {
    "http://127.0.0.1:8002".to_string()
}

/// Per-call timeouts for downstream requests, in seconds.
///
/// The analyze call dominates latency because the analyzer may crawl
/// several pages, so it gets the longest budget. Generation and screenshot
/// are shorter; health probes shortest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_analyze_secs")]
    pub analyze_secs: u64,
    #[serde(default = "default_generate_secs")]
    pub generate_secs: u64,
    #[serde(default = "default_screenshot_secs")]
    pub screenshot_secs: u64,
    #[serde(default = "default_health_secs")]
    pub health_secs: u64,
    #[serde(default = "default_connect_secs")]
    pub connect_secs: u64,
}

impl TimeoutConfig {
    pub fn analyze(&self) -> Duration {
        Duration::from_secs(self.analyze_secs)
    }

    pub fn generate(&self) -> Duration {
        Duration::from_secs(self.generate_secs)
    }

    pub fn screenshot(&self) -> Duration {
        Duration::from_secs(self.screenshot_secs)
    }

    pub fn health(&self) -> Duration {
        Duration::from_secs(self.health_secs)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            analyze_secs: default_analyze_secs(),
            generate_secs: default_generate_secs(),
            screenshot_secs: default_screenshot_secs(),
            health_secs: default_health_secs(),
            connect_secs: default_connect_secs(),
        }
    }
}

fn default_analyze_secs() -> u64 {
    120
}

fn default_generate_secs() -> u64 {
    60
}

fn default_screenshot_secs() -> u64 {
    30
}

fn default_health_secs() -> u64 {
    5
}

fn default_connect_secs() -> u64 {
    10
}

/// Service-to-service authentication
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Shared bearer token (loaded from environment, not from config file).
    /// A missing token is not a startup error; requests to protected
    /// endpoints fail with `auth_not_configured` until it is set.
    #[serde(skip)]
    pub service_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.services.analyzer_url, "http://127.0.0.1:8001");
        assert_eq!(config.services.builder_url, "http://127.0.0.1:8002");
        assert_eq!(config.timeouts.analyze(), Duration::from_secs(120));
        assert_eq!(config.timeouts.generate(), Duration::from_secs(60));
        assert_eq!(config.timeouts.screenshot(), Duration::from_secs(30));
        assert_eq!(config.timeouts.health(), Duration::from_secs(5));
        assert!(config.auth.service_token.is_none());
    }
}
