//! Pipeline coordinator: resolve, execute, interpret.
//!
//! Strictly sequential per request. Failures at any stage end the request
//! with a short user-facing message; the shared corpus and completion
//! client are untouched.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use np_corpus::Corpus;
use np_device_tools::{ExecutionAdapter, SshConnector};
use np_protocol::{AnswerReport, DeviceCredentials, ExecutionOutcome};
use uuid::Uuid;

use crate::config::AssistantConfig;
use crate::inference::{CompletionError, CompletionService, OllamaClient};
use crate::resolver::{CommandResolver, ResolveError};

/// Errors that end a request, by stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("device execution of '{command}' failed: {}", .outcome.kind())]
    Execution {
        command: String,
        outcome: ExecutionOutcome,
    },

    #[error("interpretation of device output failed: {0}")]
    Interpretation(#[source] CompletionError),
}

impl PipelineError {
    /// Stage the request failed in.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Resolve(_) => "resolve",
            Self::Execution { .. } => "execute",
            Self::Interpretation(_) => "interpret",
        }
    }

    /// Short diagnostic suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Resolve(ResolveError::NoMatchAndSynthesisFailure(e)) => format!(
                "No matching question was found and the language model could not suggest a command ({e})."
            ),
            Self::Execution { outcome, .. } => outcome
                .failure_message()
                .unwrap_or_else(|| "The device command failed.".into()),
            Self::Interpretation(e) => {
                format!("The command ran, but its output could not be interpreted ({e}).")
            }
        }
    }
}

/// Answers questions about a device end to end.
#[derive(Clone)]
pub struct Pipeline {
    resolver: CommandResolver,
    adapter: ExecutionAdapter,
    completion: Arc<dyn CompletionService>,
}

impl Pipeline {
    pub fn new(
        resolver: CommandResolver,
        adapter: ExecutionAdapter,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            resolver,
            adapter,
            completion,
        }
    }

    /// Wire the production pipeline: CSV corpus, Ollama, SSH.
    pub fn from_config(config: &AssistantConfig) -> anyhow::Result<Self> {
        let corpus = Arc::new(Corpus::load(
            &config.corpus.path,
            config.corpus.train_ratio,
            config.corpus.seed,
        )?);
        tracing::info!(
            train = corpus.train().len(),
            held_out = corpus.held_out().len(),
            "corpus ready"
        );

        let completion: Arc<dyn CompletionService> =
            Arc::new(OllamaClient::new(config.ollama.clone())?);
        let resolver = CommandResolver::new(corpus, completion.clone(), config.corpus.threshold);
        let adapter = ExecutionAdapter::new(Arc::new(SshConnector::new()));
        Ok(Self::new(resolver, adapter, completion))
    }

    /// Answer `question` using the device in `credentials`.
    pub async fn run(
        &self,
        question: &str,
        credentials: &DeviceCredentials,
    ) -> Result<AnswerReport, PipelineError> {
        let start = Instant::now();
        let request_id = Uuid::now_v7();
        tracing::info!(%request_id, question = %question, device = %credentials.address(), "answering question");

        let resolution = self.resolver.resolve(question).await?;

        let raw_output = match self.adapter.execute(&resolution.command, credentials).await {
            ExecutionOutcome::Success(raw) => raw,
            outcome => {
                return Err(PipelineError::Execution {
                    command: resolution.command,
                    outcome,
                });
            }
        };

        let summary = self
            .completion
            .interpret_output(&raw_output)
            .await
            .and_then(|summary| {
                if summary.is_empty() {
                    Err(CompletionError::Empty)
                } else {
                    Ok(summary)
                }
            })
            .map_err(|e| {
                tracing::warn!(%request_id, error = %e, "interpretation failed");
                PipelineError::Interpretation(e)
            })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::info!(%request_id, latency_ms, "question answered");

        Ok(AnswerReport {
            request_id,
            question: question.to_string(),
            command: resolution.command,
            resolution: resolution.source,
            raw_output,
            summary,
            latency_ms,
            answered_at: Utc::now(),
        })
    }

    /// Answer `question`, returning either the summary or a diagnostic.
    pub async fn answer(&self, question: &str, credentials: &DeviceCredentials) -> String {
        match self.run(question, credentials).await {
            Ok(report) => report.summary,
            Err(e) => {
                tracing::warn!(stage = e.stage(), error = %e, "request failed");
                e.user_message()
            }
        }
    }
}
