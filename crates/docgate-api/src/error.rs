//! HTTP error response conversion
//!
//! **Preferred handler pattern:** return `Result<impl IntoResponse,
//! HttpAppError>`. Use `AppError` for errors and `.map_err(Into::into)` so
//! they become `HttpAppError` and render consistently (status, body,
//! logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docgate_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse.
/// Needed because of the orphan rule: IntoResponse is external, AppError
/// lives in docgate-core.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;

        match err.log_level() {
            LogLevel::Debug => {
                tracing::debug!(error_type = err.error_type(), "{}", err.detailed_message())
            }
            LogLevel::Warn => {
                tracing::warn!(error_type = err.error_type(), "{}", err.detailed_message())
            }
            LogLevel::Error => {
                tracing::error!(error_type = err.error_type(), "{}", err.detailed_message())
            }
        }

        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = ErrorResponse {
            error: err.client_message(),
            code: err.error_code().to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let resp = HttpAppError(AppError::NotFound("Document not found".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let resp = HttpAppError(AppError::PayloadTooLarge("too big".into())).into_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_storage_error_maps_to_500() {
        let resp = HttpAppError(AppError::Storage("disk on fire".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
