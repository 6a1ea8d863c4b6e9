//! API models for the siteboost orchestration and health endpoints.
//!
//! The external contract is a uniform envelope on every `/api/analyze`
//! response:
//!
//! ```json
//! {
//!   "success": true,
//!   "data": {
//!     "analysis": { "...": "opaque analyzer payload" },
//!     "homepage": { "...": "opaque builder payload, optional" },
//!     "total_processing_time": 4182,
//!     "workflow_id": "workflow_1714569600000_3f9c2ab41"
//!   },
//!   "timestamp": "2024-05-01T10:00:00.000Z"
//! }
//! ```
//!
//! or, on failure, `{"success": false, "error": {"message", "code",
//! "details"?}, "timestamp"}`. The analyzer and homepage payloads are pass-
//! through values owned by the downstream services; this crate never
//! interprets them beyond the business name and the generated code fields.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Inbound body of `POST /api/analyze`.
///
/// `url` stays optional at the wire level so a missing field can be
/// reported as `missing_url` rather than a generic deserialization error;
/// everything else defaults to the values the original funnel form uses.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub url: Option<String>,
    #[serde(default = "default_true")]
    pub include_seo: bool,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_true")]
    pub generate_homepage: bool,
    #[serde(default)]
    pub style_preference: StylePreference,
    #[serde(default)]
    pub include_booking: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_pages() -> u32 {
    3
}

/// Design style for generated homepages (the funnel form's choices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreference {
    #[default]
    Modern,
    Professional,
    Minimal,
    Bold,
    Classic,
}

impl StylePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            StylePreference::Modern => "modern",
            StylePreference::Professional => "professional",
            StylePreference::Minimal => "minimal",
            StylePreference::Bold => "bold",
            StylePreference::Classic => "classic",
        }
    }
}

/// Success payload of one completed workflow
#[derive(Debug, Serialize)]
pub struct WorkflowData {
    pub analysis: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<Value>,
    /// Milliseconds from request entry to response construction
    pub total_processing_time: u64,
    pub workflow_id: String,
}

/// Machine-readable error body carried inside the envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// The uniform `{success, data|error, timestamp}` response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: envelope_timestamp(),
        }
    }
}

impl ApiResponse<Value> {
    pub fn failure(error: ErrorBody) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            timestamp: envelope_timestamp(),
        }
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix
pub fn envelope_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Aggregate health of the orchestrator and its downstream services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateHealth {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health of one downstream service as seen from the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceHealthState {
    Healthy,
    Unhealthy,
    Unreachable,
}

impl ServiceHealthState {
    pub fn is_reachable(&self) -> bool {
        !matches!(self, ServiceHealthState::Unreachable)
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ServiceHealthState::Healthy)
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: ServiceHealthState,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ServiceHealth {
    pub fn unreachable(url: &str) -> Self {
        Self {
            status: ServiceHealthState::Unreachable,
            url: url.to_string(),
            response_time: None,
            version: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrchestratorHealth {
    pub status: &'static str,
    pub version: String,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
pub struct ServicesHealth {
    pub orchestrator: OrchestratorHealth,
    pub analyzer: ServiceHealth,
    pub builder: ServiceHealth,
}

/// Body of `GET /api/health`; always delivered with HTTP 200
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: AggregateHealth,
    pub version: String,
    pub uptime: u64,
    pub timestamp: String,
    pub services: ServicesHealth,
    pub checks: BTreeMap<&'static str, bool>,
}
