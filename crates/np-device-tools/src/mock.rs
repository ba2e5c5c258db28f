//! Mock device connector for testing.
//!
//! Supports scripted command output, credential checks, injected failures
//! and delays, and records session lifecycle so tests can assert that every
//! session was closed. Used instead of a real device so the suite runs
//! anywhere.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use np_protocol::DeviceCredentials;

use crate::error::{SessionError, SessionResult};
use crate::session::{DeviceConnector, DeviceSession};

/// Output returned for commands with no scripted response.
const INVALID_INPUT: &str = "% Invalid input detected at '^' marker.";

#[derive(Debug, Default)]
struct Journal {
    opened: usize,
    closed: usize,
    graceful_closes: usize,
    executed: Vec<String>,
}

/// Scripted `DeviceConnector`.
#[derive(Debug, Default)]
pub struct MockConnector {
    outputs: HashMap<String, String>,
    credentials: Option<(String, String)>,
    connect_error: Option<SessionError>,
    exec_error: Option<SessionError>,
    connect_delay: Option<Duration>,
    auth_delay: Option<Duration>,
    exec_delay: Option<Duration>,
    journal: Arc<Mutex<Journal>>,
}

impl MockConnector {
    /// A device that accepts any login and knows no commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output of `command`.
    pub fn with_output(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }

    /// Only accept this username/password pair.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Fail every `connect` with `error`.
    pub fn with_connect_error(mut self, error: SessionError) -> Self {
        self.connect_error = Some(error);
        self
    }

    /// Fail every `exec` with `error`.
    pub fn with_exec_error(mut self, error: SessionError) -> Self {
        self.exec_error = Some(error);
        self
    }

    /// Delay `connect` by `delay`.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Delay `authenticate` by `delay`.
    pub fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth_delay = Some(delay);
        self
    }

    /// Delay `exec` by `delay`.
    pub fn with_exec_delay(mut self, delay: Duration) -> Self {
        self.exec_delay = Some(delay);
        self
    }

    /// Number of sessions successfully opened.
    pub fn opened(&self) -> usize {
        self.journal.lock().unwrap().opened
    }

    /// Sessions opened but not yet closed or dropped.
    pub fn open_sessions(&self) -> usize {
        let journal = self.journal.lock().unwrap();
        journal.opened - journal.closed
    }

    /// Sessions closed through `DeviceSession::close`.
    pub fn graceful_closes(&self) -> usize {
        self.journal.lock().unwrap().graceful_closes
    }

    /// Commands sent to the device, in order.
    pub fn executed(&self) -> Vec<String> {
        self.journal.lock().unwrap().executed.clone()
    }
}

#[async_trait]
impl DeviceConnector for MockConnector {
    async fn connect(&self, _credentials: &DeviceCredentials) -> SessionResult<Box<dyn DeviceSession>> {
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.connect_error {
            return Err(err.clone());
        }

        self.journal.lock().unwrap().opened += 1;
        Ok(Box::new(MockSession {
            outputs: self.outputs.clone(),
            credentials: self.credentials.clone(),
            exec_error: self.exec_error.clone(),
            auth_delay: self.auth_delay,
            exec_delay: self.exec_delay,
            authenticated: false,
            journal: Arc::clone(&self.journal),
        }))
    }
}

struct MockSession {
    outputs: HashMap<String, String>,
    credentials: Option<(String, String)>,
    exec_error: Option<SessionError>,
    auth_delay: Option<Duration>,
    exec_delay: Option<Duration>,
    authenticated: bool,
    journal: Arc<Mutex<Journal>>,
}

#[async_trait]
impl DeviceSession for MockSession {
    async fn authenticate(&mut self, username: &str, password: &str) -> SessionResult<()> {
        if let Some(delay) = self.auth_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((user, pass)) = &self.credentials {
            if user != username || pass != password {
                return Err(SessionError::Auth);
            }
        }
        self.authenticated = true;
        Ok(())
    }

    async fn exec(&mut self, command: &str) -> SessionResult<String> {
        if !self.authenticated {
            return Err(SessionError::Other("exec before authentication".into()));
        }
        if let Some(delay) = self.exec_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.exec_error {
            return Err(err.clone());
        }
        self.journal.lock().unwrap().executed.push(command.to_string());
        Ok(self
            .outputs
            .get(command)
            .cloned()
            .unwrap_or_else(|| INVALID_INPUT.to_string()))
    }

    async fn close(self: Box<Self>) {
        self.journal.lock().unwrap().graceful_closes += 1;
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        if let Ok(mut journal) = self.journal.lock() {
            journal.closed += 1;
        }
    }
}
