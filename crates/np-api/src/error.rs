//! Unified API error type with Axum `IntoResponse` support.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use np_assistant::pipeline::PipelineError;
use np_protocol::ExecutionOutcome;

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, stage, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, None, msg.clone()),
            ApiError::Pipeline(err) => {
                let status = match err {
                    PipelineError::Execution {
                        outcome: ExecutionOutcome::TimeoutFailure(_),
                        ..
                    } => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, Some(err.stage()), err.user_message())
            }
        };

        let body = json!({
            "error": message,
            "stage": stage,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
