use serde::{Deserialize, Serialize};

/// Result of running one command on a device.
///
/// Every failure mode of a device session is folded into one of these
/// variants; nothing past the execution adapter sees a raw transport error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Raw textual output of the command.
    Success(String),
    AuthFailure,
    ConnectFailure(String),
    TimeoutFailure(String),
    UnknownFailure(String),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Short label for logs and API error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::AuthFailure => "auth_failure",
            Self::ConnectFailure(_) => "connect_failure",
            Self::TimeoutFailure(_) => "timeout_failure",
            Self::UnknownFailure(_) => "unknown_failure",
        }
    }

    /// User-facing diagnostic for a failed outcome. `None` on success.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::AuthFailure => {
                Some("Authentication failed. Please check your username and password.".into())
            }
            Self::ConnectFailure(detail) => Some(format!("Connection error: {detail}")),
            Self::TimeoutFailure(detail) => Some(format!("Timeout error: {detail}")),
            Self::UnknownFailure(detail) => {
                Some(format!("An unexpected error occurred: {detail}"))
            }
        }
    }
}
