//! Shared application state for the Axum server.

use std::sync::Arc;

use np_assistant::config::AssistantConfig;
use np_assistant::pipeline::Pipeline;
use np_protocol::DeviceCredentials;

/// Shared application state; cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Question pipeline (corpus, completion client, device adapter).
    pub pipeline: Pipeline,
    /// Device used when a request does not name one.
    pub default_device: Option<Arc<DeviceCredentials>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, default_device: Option<DeviceCredentials>) -> Self {
        Self {
            pipeline,
            default_device: default_device.map(Arc::new),
        }
    }

    /// Build production state from the assistant config.
    pub fn from_config(config: &AssistantConfig) -> anyhow::Result<Self> {
        let pipeline = Pipeline::from_config(config)?;
        Ok(Self::new(pipeline, Some(config.device.clone())))
    }
}
