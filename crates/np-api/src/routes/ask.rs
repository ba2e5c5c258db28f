//! Question answering endpoint.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use np_protocol::{AnswerReport, DeviceCredentials};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for asking a question.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural-language question about the device.
    pub question: String,
    /// Device to query; falls back to the configured default.
    #[serde(default)]
    pub device: Option<DeviceCredentials>,
}

/// POST /api/v1/ask: answer a question about a device.
///
/// If the client disconnects, the handler future is dropped and any open
/// device session goes with it.
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<AnswerReport>> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".into()));
    }

    let device: &DeviceCredentials = match (&req.device, &state.default_device) {
        (Some(device), _) => device,
        (None, Some(device)) => device.as_ref(),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "no device in request and no default device configured".into(),
            ));
        }
    };

    let report = state.pipeline.run(question, device).await?;
    Ok(Json(report))
}
