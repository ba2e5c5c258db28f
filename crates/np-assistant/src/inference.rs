//! Ollama completion client for command synthesis and output interpretation.
//!
//! Calls the Ollama HTTP API (`/api/generate`). The service streams its
//! answer as newline-delimited JSON objects, each carrying a `response`
//! fragment; fragments are concatenated in order. A non-200 status or any
//! line that fails to parse fails the whole call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::postprocess::{IndexPrefixStripper, Postprocessor};

/// Prompt asking for a short status summary of raw device output.
fn interpretation_prompt(raw_output: &str) -> String {
    format!(
        "The following output was received from a router command:\n{raw_output}\n\n\
         Provide a brief, human-readable summary of the router's status in one or two sentences."
    )
}

/// Errors from the completion service.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion service unreachable: {0}")]
    Transport(String),
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode completion response: {0}")]
    Decode(String),
    #[error("completion service error: {0}")]
    Service(String),
    #[error("completion service returned no text")]
    Empty,
}

/// Convenience alias for completion results.
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Text-completion operations used by the pipeline.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Turn a natural-language question into a device command.
    async fn synthesize_command(&self, question: &str) -> CompletionResult<String>;

    /// Summarise raw device output in one or two sentences.
    async fn interpret_output(&self, raw_output: &str) -> CompletionResult<String>;
}

/// Configuration for the Ollama completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Model used to synthesize commands.
    #[serde(default = "default_command_model")]
    pub command_model: String,
    /// Model used to summarise device output.
    #[serde(default = "default_summary_model")]
    pub summary_model: String,
    /// Sampling temperature for summaries.
    #[serde(default)]
    pub summary_temperature: f64,
    /// Bound on each request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Marker token stripped from the start of completions ("" disables).
    #[serde(default = "default_prefix_token")]
    pub prefix_token: String,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_command_model() -> String {
    "llama3.1".into()
}
fn default_summary_model() -> String {
    "llama3.2:1b-instruct-fp16".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_prefix_token() -> String {
    "0".into()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            command_model: default_command_model(),
            summary_model: default_summary_model(),
            summary_temperature: 0.0,
            timeout_secs: default_timeout_secs(),
            prefix_token: default_prefix_token(),
        }
    }
}

/// Ollama generate API request body.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
}

/// One line of the generate stream (only fields we need).
#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the Ollama completion endpoint.
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
    postprocessor: Arc<dyn Postprocessor>,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> CompletionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::Transport(format!("failed to build http client: {e}")))?;
        let postprocessor = Arc::new(IndexPrefixStripper::new(&config.prefix_token));
        Ok(Self {
            client,
            config,
            postprocessor,
        })
    }

    /// Replace the completion clean-up step.
    pub fn with_postprocessor(mut self, postprocessor: Arc<dyn Postprocessor>) -> Self {
        self.postprocessor = postprocessor;
        self
    }

    /// Send `prompt` to `model` and return the concatenated completion.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        temperature: Option<f64>,
    ) -> CompletionResult<String> {
        let url = format!("{}/api/generate", self.config.host.trim_end_matches('/'));
        let body = GenerateRequest {
            model,
            prompt,
            options: temperature.map(|temperature| GenerateOptions { temperature }),
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            tracing::warn!(error = %e, model, "completion request failed");
            if e.is_timeout() {
                CompletionError::Transport(format!(
                    "request timed out after {}s",
                    self.config.timeout_secs
                ))
            } else {
                CompletionError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = %status, model, "completion service returned non-200");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let completion = parse_stream(&text)?;
        tracing::debug!(model, chars = completion.len(), "completion received");
        Ok(completion)
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    async fn synthesize_command(&self, question: &str) -> CompletionResult<String> {
        let raw = self
            .generate(&self.config.command_model, question, None)
            .await?;
        Ok(self.postprocessor.clean(&raw))
    }

    async fn interpret_output(&self, raw_output: &str) -> CompletionResult<String> {
        let prompt = interpretation_prompt(raw_output);
        let raw = self
            .generate(
                &self.config.summary_model,
                &prompt,
                Some(self.config.summary_temperature),
            )
            .await?;
        Ok(self.postprocessor.clean(&raw))
    }
}

/// Concatenate the `response` fragments of a (possibly single-line) stream.
fn parse_stream(body: &str) -> CompletionResult<String> {
    let body = body.trim();
    if body.is_empty() {
        return Err(CompletionError::Decode("empty response body".into()));
    }

    let mut full = String::new();
    for (idx, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let chunk: GenerateChunk = serde_json::from_str(line).map_err(|e| {
            tracing::warn!(error = %e, line = idx + 1, "invalid completion stream line");
            CompletionError::Decode(format!("line {}: {e}", idx + 1))
        })?;
        if let Some(error) = chunk.error {
            return Err(CompletionError::Service(error));
        }
        full.push_str(&chunk.response);
    }

    Ok(full.trim().to_string())
}
