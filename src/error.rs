use axum::extract::rejection::JsonRejection;
use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Backend unreachable: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Backend response did not match {expected}: {reason}")]
    UpstreamShape {
        expected: &'static str,
        reason: String,
    },

    #[error("Uploads are not configured")]
    UploadsDisabled,

    #[error("Object store error: {0}")]
    Storage(#[from] object_store::Error),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
            AppError::Upstream(e) => {
                error!("backend request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::UpstreamShape { expected, reason } => {
                error!("backend returned malformed {}: {}", expected, reason);
                (
                    StatusCode::BAD_GATEWAY,
                    "Backend returned an unexpected response".to_string(),
                )
            }
            AppError::UploadsDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Uploads are not configured".to_string(),
            ),
            AppError::Storage(e) => {
                error!("object store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_errors_map_to_bad_gateway() {
        let response = AppError::UpstreamShape {
            expected: "course",
            reason: "missing field `title`".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn disabled_uploads_map_to_service_unavailable() {
        let response = AppError::UploadsDisabled.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
