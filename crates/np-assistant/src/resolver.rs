//! Command resolver: corpus first, completion service fallback.
//!
//! Looks the question up in the training corpus. On a hit the stored command
//! is returned verbatim; on a miss the completion service synthesizes one.
//! There is no retry between the two.

use std::sync::Arc;

use np_corpus::{Corpus, find_best_match};
use np_protocol::ResolutionSource;

use crate::inference::{CompletionError, CompletionService};

/// Errors from command resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no corpus match and command synthesis failed: {0}")]
    NoMatchAndSynthesisFailure(#[source] CompletionError),
}

/// A command ready to run, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub command: String,
    pub source: ResolutionSource,
}

/// Resolves questions to device commands.
#[derive(Clone)]
pub struct CommandResolver {
    corpus: Arc<Corpus>,
    completion: Arc<dyn CompletionService>,
    threshold: f64,
}

impl CommandResolver {
    pub fn new(corpus: Arc<Corpus>, completion: Arc<dyn CompletionService>, threshold: f64) -> Self {
        Self {
            corpus,
            completion,
            threshold,
        }
    }

    /// Resolve `question` to a command.
    pub async fn resolve(&self, question: &str) -> Result<Resolution, ResolveError> {
        if let Some(hit) = find_best_match(question, self.corpus.train(), self.threshold) {
            tracing::info!(
                matched_question = %hit.pair.question,
                score = hit.score,
                command = %hit.pair.answer,
                "closest match found in corpus"
            );
            return Ok(Resolution {
                command: hit.pair.answer,
                source: ResolutionSource::Dataset {
                    matched_question: hit.pair.question,
                    score: hit.score,
                },
            });
        }

        tracing::info!("no corpus match, asking completion service for a command");
        let command = self
            .completion
            .synthesize_command(question)
            .await
            .and_then(|command| {
                if command.is_empty() {
                    Err(CompletionError::Empty)
                } else {
                    Ok(command)
                }
            })
            .map_err(|e| {
                tracing::warn!(error = %e, "command synthesis failed");
                ResolveError::NoMatchAndSynthesisFailure(e)
            })?;

        tracing::info!(command = %command, "command synthesized");
        Ok(Resolution {
            command,
            source: ResolutionSource::Model,
        })
    }
}
