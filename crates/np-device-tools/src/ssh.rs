//! SSH device sessions over russh.
//!
//! The socket is opened with `tokio::net::TcpStream` under the socket timeout
//! and the SSH handshake runs under the transport timeout, so each stage
//! reports its own `TimeoutStage`. Commands run on an exec channel, which
//! sidesteps CLI paging; output is normalised to `\n` line endings.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use np_protocol::DeviceCredentials;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::{SessionError, SessionResult, TimeoutStage};
use crate::session::{DeviceConnector, DeviceSession};

/// Opens SSH sessions to network devices.
#[derive(Debug, Clone, Default)]
pub struct SshConnector;

impl SshConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeviceConnector for SshConnector {
    async fn connect(&self, credentials: &DeviceCredentials) -> SessionResult<Box<dyn DeviceSession>> {
        let address = credentials.address();
        let timeouts = credentials.timeouts;

        let stream = match timeout(timeouts.socket(), TcpStream::connect(&address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(SessionError::Connect(format!("{address}: {e}"))),
            Err(_) => {
                return Err(SessionError::Timeout {
                    stage: TimeoutStage::Socket,
                    secs: timeouts.socket().as_secs(),
                });
            }
        };

        let config = Arc::new(client::Config {
            inactivity_timeout: Some(timeouts.ops().saturating_add(Duration::from_secs(5))),
            ..Default::default()
        });
        let verifier = HostKeyVerifier {
            host: address.clone(),
            expected: credentials.host_key_fingerprint.clone(),
        };

        let handle = match timeout(
            timeouts.transport(),
            client::connect_stream(config, stream, verifier),
        )
        .await
        {
            Ok(Ok(handle)) => handle,
            Ok(Err(russh::Error::UnknownKey)) => {
                return Err(SessionError::Connect(format!(
                    "{address}: host key does not match the configured fingerprint"
                )));
            }
            Ok(Err(e)) => return Err(SessionError::Connect(format!("{address}: {e}"))),
            Err(_) => {
                return Err(SessionError::Timeout {
                    stage: TimeoutStage::Transport,
                    secs: timeouts.transport().as_secs(),
                });
            }
        };

        tracing::debug!(device = %address, "ssh transport established");
        Ok(Box::new(SshSession { handle, address }))
    }
}

/// Accepts the server key when no fingerprint is configured, otherwise
/// requires an exact fingerprint match.
struct HostKeyVerifier {
    host: String,
    expected: Option<String>,
}

#[async_trait]
impl client::Handler for HostKeyVerifier {
    type Error = russh::Error;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        let fingerprint = server_public_key.fingerprint();
        match &self.expected {
            None => {
                tracing::debug!(device = %self.host, %fingerprint, "accepting unverified host key");
                Ok(true)
            }
            Some(expected) => {
                let expected = expected.trim_start_matches("SHA256:");
                let accepted = expected == fingerprint;
                if !accepted {
                    tracing::warn!(device = %self.host, %fingerprint, "host key fingerprint mismatch");
                }
                Ok(accepted)
            }
        }
    }
}

/// One SSH connection. Dropping the handle tears the connection down.
struct SshSession {
    handle: Handle<HostKeyVerifier>,
    address: String,
}

#[async_trait]
impl DeviceSession for SshSession {
    async fn authenticate(&mut self, username: &str, password: &str) -> SessionResult<()> {
        let accepted = self
            .handle
            .authenticate_password(username, password)
            .await
            .map_err(|e| SessionError::Connect(format!("{}: {e}", self.address)))?;
        if accepted {
            Ok(())
        } else {
            Err(SessionError::Auth)
        }
    }

    async fn exec(&mut self, command: &str) -> SessionResult<String> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| SessionError::Exec(format!("open channel: {e}")))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| SessionError::Exec(format!("exec: {e}")))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_status = None;
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => stderr.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                _ => {}
            }
        }

        let mut output = normalise(&stdout);
        let stderr = normalise(&stderr);
        if !stderr.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("[stderr] {stderr}"));
        }
        tracing::debug!(device = %self.address, ?exit_status, bytes = output.len(), "exec finished");
        Ok(output)
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            tracing::debug!(device = %self.address, error = %e, "ssh disconnect failed");
        }
    }
}

/// Decode device output, dropping carriage returns and trailing blank space.
fn normalise(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .replace("\r\n", "\n")
        .replace('\r', "")
        .trim_end()
        .to_string()
}
