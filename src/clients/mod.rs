//! HTTP clients for the downstream analyzer and builder services
//!
//! Both services speak the same `{success, data, error}` envelope and are
//! authenticated with a shared bearer token. Each call carries its own
//! timeout; expiry is reported as an ordinary [`ServiceError`] and the
//! caller decides whether that is fatal. There is deliberately no retry
//! logic here: every downstream failure is reported exactly once.

mod analyzer;
mod builder;

pub use analyzer::AnalyzerClient;
pub use builder::BuilderClient;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a response: connect failure, timeout,
    /// DNS error. `url` is the service base URL for error reporting.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The service answered with a non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The service answered 2xx but reported failure in its envelope,
    /// or the body was not a decodable envelope.
    #[error("{0}")]
    Service(String),
}

impl ServiceError {
    /// Upstream HTTP status, when one was received
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures the service itself reported (as opposed to
    /// transport-level or HTTP-status failures)
    pub fn is_service_level(&self) -> bool {
        matches!(self, ServiceError::Service(_))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Wire shape shared by both downstream services
#[derive(Debug, Deserialize)]
struct ServiceEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<ServiceErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Outcome of one health probe against a downstream service
#[derive(Debug, Clone)]
pub struct HealthProbe {
    pub body: Value,
    pub response_time: Duration,
}

pub(crate) fn build_http_client(connect_timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|e| ServiceError::Service(e.to_string()))
}

/// POST a JSON payload to `endpoint` and unwrap the service envelope.
///
/// `base_url` labels transport/status errors (the caller-facing error
/// details reference the service, not the exact endpoint). `default_error`
/// is used when the service reports failure without a message, matching
/// the downstream contract's loosely-populated error bodies.
pub(crate) async fn post_envelope<B: serde::Serialize>(
    http: &Client,
    base_url: &str,
    endpoint: &str,
    token: Option<&str>,
    payload: &B,
    timeout: Duration,
    default_error: &str,
) -> Result<Value> {
    let mut request = http.post(endpoint).json(payload).timeout(timeout);

    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(|e| ServiceError::Transport {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Status {
            url: base_url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| ServiceError::Transport {
        url: base_url.to_string(),
        message: format!("failed to read body: {}", e),
    })?;

    debug!(url = endpoint, size = bytes.len(), "Downstream response received");

    unwrap_envelope(&bytes, default_error)
}

/// Decode a `{success, data, error}` envelope body into its data payload
pub(crate) fn unwrap_envelope(body: &[u8], default_error: &str) -> Result<Value> {
    let envelope: ServiceEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) => return Err(ServiceError::Service(default_error.to_string())),
    };

    if !envelope.success {
        let message = envelope
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| default_error.to_string());
        return Err(ServiceError::Service(message));
    }

    envelope
        .data
        .ok_or_else(|| ServiceError::Service(default_error.to_string()))
}

/// GET `{base_url}/health` with a short timeout.
///
/// Health probes are unauthenticated; interpretation of the body (healthy
/// vs. unhealthy) is left to the caller.
pub(crate) async fn probe_health(
    http: &Client,
    base_url: &str,
    timeout: Duration,
) -> Result<HealthProbe> {
    let endpoint = format!("{}/health", base_url);
    let started = Instant::now();

    let response = http
        .get(&endpoint)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ServiceError::Transport {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Status {
            url: base_url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .json::<Value>()
        .await
        .map_err(|e| ServiceError::Transport {
            url: base_url.to_string(),
            message: format!("failed to read body: {}", e),
        })?;

    Ok(HealthProbe {
        body,
        response_time: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_envelope_returns_data() {
        let body = json!({"success": true, "data": {"id": "a-1"}}).to_string();
        let data = unwrap_envelope(body.as_bytes(), "failed").unwrap();
        assert_eq!(data["id"], "a-1");
    }

    #[test]
    fn unwrap_envelope_uses_reported_message() {
        let body = json!({
            "success": false,
            "error": {"message": "crawl blocked by robots.txt"}
        })
        .to_string();

        let err = unwrap_envelope(body.as_bytes(), "failed").unwrap_err();
        assert!(err.is_service_level());
        assert_eq!(err.to_string(), "crawl blocked by robots.txt");
    }

    #[test]
    fn unwrap_envelope_falls_back_on_missing_message() {
        let body = json!({"success": false}).to_string();
        let err = unwrap_envelope(body.as_bytes(), "generation failed").unwrap_err();
        assert_eq!(err.to_string(), "generation failed");
    }

    #[test]
    fn unwrap_envelope_rejects_non_envelope_body() {
        let err = unwrap_envelope(b"<html>oops</html>", "failed").unwrap_err();
        assert!(err.is_service_level());
    }

    #[test]
    fn unwrap_envelope_rejects_success_without_data() {
        let body = json!({"success": true}).to_string();
        let err = unwrap_envelope(body.as_bytes(), "failed").unwrap_err();
        assert!(err.is_service_level());
    }

    #[test]
    fn upstream_status_only_on_status_errors() {
        let status_err = ServiceError::Status {
            url: "http://analyzer:8001".to_string(),
            status: 502,
        };
        assert_eq!(status_err.upstream_status(), Some(502));

        let transport_err = ServiceError::Transport {
            url: "http://analyzer:8001".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(transport_err.upstream_status(), None);
    }
}
