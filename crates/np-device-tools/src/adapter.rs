//! Remote execution adapter.
//!
//! Runs exactly one command per call over a fresh session:
//!
//! ```text
//! Idle -> Connecting -> Authenticating -> Executing -> Closed
//! ```
//!
//! A failure in any stage jumps straight to `Closed` and is reported as an
//! `ExecutionOutcome` variant. No retries happen here.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use np_protocol::{DeviceCredentials, ExecutionOutcome};
use tokio::time::timeout;

use crate::error::{SessionError, SessionResult, TimeoutStage};
use crate::session::{DeviceConnector, DeviceSession};

/// Maximum device output passed on to interpretation (64 KB).
const MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// Lifecycle stage of a single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Idle,
    Connecting,
    Authenticating,
    Executing,
    Closed,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::Executing => "executing",
            Self::Closed => "closed",
        })
    }
}

/// Executes single commands on devices through a `DeviceConnector`.
#[derive(Clone)]
pub struct ExecutionAdapter {
    connector: Arc<dyn DeviceConnector>,
}

impl ExecutionAdapter {
    pub fn new(connector: Arc<dyn DeviceConnector>) -> Self {
        Self { connector }
    }

    /// Run `command` on the device described by `credentials`.
    ///
    /// Never returns an error: every failure is folded into the outcome.
    /// Once a session is open it is closed on every path out of this call;
    /// if the returned future is dropped mid-flight, dropping the session
    /// releases the connection instead.
    pub async fn execute(&self, command: &str, credentials: &DeviceCredentials) -> ExecutionOutcome {
        let start = Instant::now();
        let mut stage = SessionStage::Idle;
        tracing::debug!(device = %credentials.address(), %stage, "execution requested");

        let outcome = match self.open(credentials, &mut stage).await {
            Ok(mut session) => {
                let result = run_command(session.as_mut(), command, credentials, &mut stage).await;
                // Best effort; a close that hangs is abandoned and the drop releases it.
                let _ = timeout(credentials.timeouts.ops(), session.close()).await;
                match result {
                    Ok(raw) => ExecutionOutcome::Success(cap_output(raw)),
                    Err(err) => err.into_outcome(),
                }
            }
            Err(err) => err.into_outcome(),
        };

        let failed_in = stage;
        stage = SessionStage::Closed;
        let latency_ms = start.elapsed().as_millis() as u64;
        match outcome.failure_message() {
            None => tracing::info!(
                device = %credentials.address(),
                command = %command,
                latency_ms,
                %stage,
                "device command completed"
            ),
            Some(message) => tracing::warn!(
                device = %credentials.address(),
                command = %command,
                outcome = outcome.kind(),
                failed_in = %failed_in,
                latency_ms,
                %stage,
                "{message}"
            ),
        }
        outcome
    }

    async fn open(
        &self,
        credentials: &DeviceCredentials,
        stage: &mut SessionStage,
    ) -> SessionResult<Box<dyn DeviceSession>> {
        *stage = SessionStage::Connecting;
        // Backstop in case a connector ignores its own stage timeouts.
        let budget = credentials
            .timeouts
            .socket()
            .saturating_add(credentials.timeouts.transport());
        match timeout(budget, self.connector.connect(credentials)).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout {
                stage: TimeoutStage::Transport,
                secs: budget.as_secs(),
            }),
        }
    }
}

async fn run_command(
    session: &mut dyn DeviceSession,
    command: &str,
    credentials: &DeviceCredentials,
    stage: &mut SessionStage,
) -> SessionResult<String> {
    *stage = SessionStage::Authenticating;
    let transport = credentials.timeouts.transport();
    bounded(
        transport,
        TimeoutStage::Transport,
        session.authenticate(&credentials.username, &credentials.password),
    )
    .await?;

    *stage = SessionStage::Executing;
    bounded(credentials.timeouts.ops(), TimeoutStage::Ops, session.exec(command)).await
}

async fn bounded<T>(
    limit: Duration,
    stage: TimeoutStage,
    fut: impl Future<Output = SessionResult<T>>,
) -> SessionResult<T> {
    timeout(limit, fut).await.unwrap_or(Err(SessionError::Timeout {
        stage,
        secs: limit.as_secs(),
    }))
}

/// Truncate oversized output at the last full line.
fn cap_output(mut output: String) -> String {
    if output.len() <= MAX_OUTPUT_BYTES {
        return output;
    }
    let mut cut = MAX_OUTPUT_BYTES;
    while !output.is_char_boundary(cut) {
        cut -= 1;
    }
    output.truncate(cut);
    if let Some(pos) = output.rfind('\n') {
        output.truncate(pos + 1);
    }
    output.push_str("\n... [output truncated at 64KB]");
    tracing::info!("device output was truncated");
    output
}
