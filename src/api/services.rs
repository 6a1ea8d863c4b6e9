use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

use super::{
    error::ApiError,
    models::{
        AggregateHealth, AnalyzeRequest, ApiResponse, HealthStatus, OrchestratorHealth,
        ServiceHealth, ServiceHealthState, ServicesHealth, WorkflowData,
    },
    state::AppState,
    validation::{self, RequestValidationError},
};
use crate::clients::{HealthProbe, ServiceError};
use crate::workflow;

/// Orchestration endpoint (POST /api/analyze)
///
/// Drives one analysis workflow through at most three downstream calls:
///
/// 1. Analyzer `/analyze`: mandatory; any failure aborts the request.
/// 2. Builder `/generate`: only when requested and the analysis carries a
///    business name; failure is absorbed and the response ships without a
///    homepage.
/// 3. Builder `/screenshot`: only after a generated homepage; failure
///    leaves the homepage without its screenshot field.
///
/// Whatever happens downstream, a caller whose analysis succeeded gets a
/// 200 envelope with at least the analysis in it.
pub async fn analyze(
    State(state): State<AppState>,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let request_started = Instant::now();
    let workflow_id = state.ids.next_id();

    let body_bytes = read_body(body, &workflow_id).await?;
    let request = parse_request(&body_bytes)?;
    let url = validation::validate_request(&request).map_err(map_validation_error)?;

    let output = workflow::run(
        &workflow_id,
        url,
        &request,
        &state.analyzer,
        &state.builder,
        &state.metrics,
    )
    .await
    .map_err(ApiError::from_analyzer_failure)?;

    let homepage = output.homepage.into_value();
    let total_processing_time = request_started.elapsed().as_millis() as u64;
    info!(
        workflow_id,
        total_processing_time,
        homepage = homepage.is_some(),
        "Workflow completed"
    );

    let data = WorkflowData {
        analysis: output.analysis,
        homepage,
        total_processing_time,
        workflow_id,
    };

    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Fallback for non-POST methods on the analyze route
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Reads the request body; an interrupted read after the workflow id was
/// assigned surfaces as the generic workflow failure for that id
async fn read_body(body: axum::body::Body, workflow_id: &str) -> Result<Vec<u8>, ApiError> {
    body.collect()
        .await
        .map(|collected| collected.to_bytes().to_vec())
        .map_err(|err| ApiError::WorkflowFailed {
            workflow_id: workflow_id.to_string(),
            message: err.to_string(),
        })
}

/// Parse the analyze body. An empty body behaves like an empty object
/// (no URL); malformed JSON is a client error.
fn parse_request(bytes: &[u8]) -> Result<AnalyzeRequest, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::MissingUrl);
    }

    serde_json::from_slice(bytes).map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

fn map_validation_error(err: RequestValidationError) -> ApiError {
    match err {
        RequestValidationError::MissingUrl => ApiError::MissingUrl,
        RequestValidationError::InvalidUrl => ApiError::InvalidUrl,
        RequestValidationError::InvalidMaxPages(_) => ApiError::InvalidPayload(err.to_string()),
    }
}

/// Health check endpoint (GET /api/health)
///
/// Probes both downstream services and reports an aggregate plus
/// per-service detail. Always answers HTTP 200: the orchestrator is
/// healthy by virtue of responding, downstream availability is
/// informational payload.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let analyzer = service_health(state.analyzer.health().await, state.analyzer.base_url());
    let builder = service_health(state.builder.health().await, state.builder.base_url());

    let status = aggregate(&analyzer, &builder);
    let uptime = state.started_at.elapsed().as_millis() as u64;
    let version = env!("CARGO_PKG_VERSION").to_string();

    let checks = [
        ("orchestrator_ready", true),
        ("analyzer_reachable", analyzer.status.is_reachable()),
        ("analyzer_healthy", analyzer.status.is_healthy()),
        ("builder_reachable", builder.status.is_reachable()),
        ("builder_healthy", builder.status.is_healthy()),
        (
            "all_services_operational",
            analyzer.status.is_healthy() && builder.status.is_healthy(),
        ),
    ]
    .into_iter()
    .collect();

    let body = HealthStatus {
        status,
        version: version.clone(),
        uptime,
        timestamp: super::models::envelope_timestamp(),
        services: ServicesHealth {
            orchestrator: OrchestratorHealth {
                status: "healthy",
                version,
                uptime,
            },
            analyzer,
            builder,
        },
        checks,
    };

    (StatusCode::OK, Json(body))
}

/// Interpret one probe result: reachable services are healthy only when
/// they say so themselves, everything else is unreachable
fn service_health(result: Result<HealthProbe, ServiceError>, base_url: &str) -> ServiceHealth {
    match result {
        Ok(probe) => {
            let reported_healthy =
                probe.body.get("status").and_then(Value::as_str) == Some("healthy");

            ServiceHealth {
                status: if reported_healthy {
                    ServiceHealthState::Healthy
                } else {
                    ServiceHealthState::Unhealthy
                },
                url: base_url.to_string(),
                response_time: Some(probe.response_time.as_millis() as u64),
                version: probe
                    .body
                    .get("version")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
        }
        Err(e) => {
            warn!(url = base_url, error = %e, "Health check failed");
            ServiceHealth::unreachable(base_url)
        }
    }
}

fn aggregate(analyzer: &ServiceHealth, builder: &ServiceHealth) -> AggregateHealth {
    if analyzer.status.is_healthy() && builder.status.is_healthy() {
        AggregateHealth::Healthy
    } else if analyzer.status.is_reachable() || builder.status.is_reachable() {
        AggregateHealth::Degraded
    } else {
        AggregateHealth::Unhealthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn healthy_probe() -> Result<HealthProbe, ServiceError> {
        Ok(HealthProbe {
            body: json!({"status": "healthy", "version": "2.1.0"}),
            response_time: Duration::from_millis(12),
        })
    }

    fn unhealthy_probe() -> Result<HealthProbe, ServiceError> {
        Ok(HealthProbe {
            body: json!({"status": "starting"}),
            response_time: Duration::from_millis(3),
        })
    }

    fn unreachable_probe() -> Result<HealthProbe, ServiceError> {
        Err(ServiceError::Transport {
            url: "http://analyzer:8001".to_string(),
            message: "connection refused".to_string(),
        })
    }

    #[test]
    fn service_health_reads_status_and_version() {
        let health = service_health(healthy_probe(), "http://analyzer:8001");
        assert_eq!(health.status, ServiceHealthState::Healthy);
        assert_eq!(health.version.as_deref(), Some("2.1.0"));
        assert_eq!(health.response_time, Some(12));
    }

    #[test]
    fn service_health_maps_failed_probe_to_unreachable() {
        let health = service_health(unreachable_probe(), "http://analyzer:8001");
        assert_eq!(health.status, ServiceHealthState::Unreachable);
        assert!(health.response_time.is_none());
        assert!(health.version.is_none());
    }

    #[test]
    fn aggregate_levels() {
        let healthy = service_health(healthy_probe(), "http://svc");
        let unhealthy = service_health(unhealthy_probe(), "http://svc");
        let unreachable = service_health(unreachable_probe(), "http://svc");

        assert_eq!(aggregate(&healthy, &healthy), AggregateHealth::Healthy);
        assert_eq!(aggregate(&healthy, &unhealthy), AggregateHealth::Degraded);
        assert_eq!(aggregate(&unreachable, &healthy), AggregateHealth::Degraded);
        assert_eq!(
            aggregate(&unreachable, &unreachable),
            AggregateHealth::Unhealthy
        );
    }

    #[test]
    fn parse_request_treats_empty_body_as_missing_url() {
        let err = parse_request(b"").unwrap_err();
        assert_eq!(err.code(), "missing_url");
    }

    #[test]
    fn parse_request_rejects_malformed_json() {
        let err = parse_request(b"{not json").unwrap_err();
        assert_eq!(err.code(), "invalid_payload");
    }

    #[test]
    fn parse_request_reads_fields() {
        let request = parse_request(br#"{"url": "https://example.com", "max_pages": 5}"#).unwrap();
        assert_eq!(request.url.as_deref(), Some("https://example.com"));
        assert_eq!(request.max_pages, 5);
    }
}
