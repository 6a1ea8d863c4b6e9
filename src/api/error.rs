use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};
use thiserror::Error;

use super::models::{ApiResponse, ErrorBody};
use crate::clients::ServiceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("URL is required")]
    MissingUrl,
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    #[error("Authentication not properly configured")]
    AuthNotConfigured,
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Invalid authentication token")]
    InvalidToken,
    #[error("Authentication error")]
    AuthError(String),
    #[error("Analysis service failed: {message}")]
    AnalyzerService {
        message: String,
        status: Option<u16>,
        url: String,
    },
    #[error("Website analysis failed")]
    AnalysisFailed { message: String },
    #[error("Workflow execution failed")]
    WorkflowFailed {
        workflow_id: String,
        message: String,
    },
}

impl ApiError {
    /// Map a failed mandatory analyzer call to its caller-facing error:
    /// transport/status failures identify the service, application-level
    /// failures identify the analysis itself.
    pub fn from_analyzer_failure(err: ServiceError) -> Self {
        match err {
            ServiceError::Service(message) => ApiError::AnalysisFailed { message },
            ServiceError::Transport { url, message } => ApiError::AnalyzerService {
                message,
                status: None,
                url,
            },
            ServiceError::Status { url, status } => ApiError::AnalyzerService {
                message: format!("HTTP {}", status),
                status: Some(status),
                url,
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingUrl | ApiError::InvalidUrl | ApiError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::AuthNotConfigured
            | ApiError::AuthError(_)
            | ApiError::AnalyzerService { .. }
            | ApiError::AnalysisFailed { .. }
            | ApiError::WorkflowFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::MissingUrl => "missing_url",
            ApiError::InvalidUrl => "invalid_url",
            ApiError::InvalidPayload(_) => "invalid_payload",
            ApiError::AuthNotConfigured => "auth_not_configured",
            ApiError::MissingToken => "missing_token",
            ApiError::InvalidToken => "invalid_token",
            ApiError::AuthError(_) => "auth_error",
            ApiError::AnalyzerService { .. } => "analyzer_service_error",
            ApiError::AnalysisFailed { .. } => "analysis_failed",
            ApiError::WorkflowFailed { .. } => "workflow_failed",
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            ApiError::MissingToken => {
                Some(json!("Authorization header with Bearer token required"))
            }
            ApiError::AuthError(message) => Some(json!(message)),
            ApiError::AnalyzerService { status, url, .. } => match status {
                Some(status) => Some(json!({"status": status, "url": url})),
                None => Some(json!({"url": url})),
            },
            ApiError::AnalysisFailed { message } => Some(json!({"error": message})),
            ApiError::WorkflowFailed {
                workflow_id,
                message,
            } => Some(json!({"workflow_id": workflow_id, "error": message})),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ApiResponse::failure(ErrorBody {
            message: self.to_string(),
            code: self.code(),
            details: self.details(),
        });

        (status, Json(body)).into_response()
    }
}
