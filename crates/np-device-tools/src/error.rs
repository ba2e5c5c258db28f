//! Device session error types.

use std::fmt;

use np_protocol::ExecutionOutcome;
use thiserror::Error;

/// Session stage a timeout fired in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutStage {
    Socket,
    Transport,
    Ops,
}

impl fmt::Display for TimeoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Socket => "socket",
            Self::Transport => "transport",
            Self::Ops => "operation",
        })
    }
}

/// Errors raised inside a device session.
///
/// These never leave the execution adapter; see [`SessionError::into_outcome`].
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("authentication rejected")]
    Auth,

    #[error("{0}")]
    Connect(String),

    #[error("{stage} timed out after {secs}s")]
    Timeout { stage: TimeoutStage, secs: u64 },

    #[error("command execution failed: {0}")]
    Exec(String),

    #[error("{0}")]
    Other(String),
}

impl SessionError {
    /// Classify into the outcome reported to callers.
    pub fn into_outcome(self) -> ExecutionOutcome {
        match self {
            Self::Auth => ExecutionOutcome::AuthFailure,
            Self::Connect(detail) => ExecutionOutcome::ConnectFailure(detail),
            err @ Self::Timeout { .. } => ExecutionOutcome::TimeoutFailure(err.to_string()),
            err @ (Self::Exec(_) | Self::Other(_)) => {
                ExecutionOutcome::UnknownFailure(err.to_string())
            }
        }
    }
}

/// Convenience alias for session results.
pub type SessionResult<T> = Result<T, SessionError>;
