use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::{Error, FieldViolation};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub violations: Vec<FieldViolation>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Maps a service error to a response. Validation messages pass through;
    /// everything else gets `context` as its message and the cause is logged.
    pub fn from_service(err: Error, context: &str) -> Self {
        let status = status_for(&err);
        match err {
            Error::Validation(validation) => Self {
                status,
                message: validation
                    .violations
                    .iter()
                    .map(|v| v.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
                violations: validation.violations,
            },
            other => {
                error!("{}: {:#}", context, other);
                Self {
                    status,
                    message: context.to_string(),
                    violations: Vec::new(),
                }
            }
        }
    }
}

pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::ReferenceCheck(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Configuration(_) | Error::Connection(_) | Error::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = if self.status.is_server_error() {
            let code = if self.status == StatusCode::SERVICE_UNAVAILABLE {
                "service_unavailable"
            } else {
                "internal_error"
            };
            json!({"message": self.message, "error": code})
        } else if self.violations.is_empty() {
            json!({"message": self.message})
        } else {
            json!({"message": self.message, "errors": self.violations})
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        Self::bad_request(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        error!("Serialization error: {}", err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Serialization error".to_string(),
            violations: Vec::new(),
        }
    }
}
