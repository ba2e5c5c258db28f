//! Corpus error types.

use thiserror::Error;

/// Errors that can occur while loading or splitting the corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus row: {0}")]
    Csv(#[from] csv::Error),

    #[error("corpus is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("train ratio must be within [0, 1], got {0}")]
    InvalidRatio(f64),
}

/// Convenience alias for corpus results.
pub type CorpusResult<T> = Result<T, CorpusError>;
