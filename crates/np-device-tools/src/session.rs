//! Device session abstraction.
//!
//! `DeviceConnector` opens a transport-level session; `DeviceSession` logs in,
//! runs one command and closes. Two impls:
//! - `SshConnector`: russh over TCP (in `ssh.rs`)
//! - `MockConnector`: scripted responses for tests (in `mock.rs`)
//!
//! Dropping a session without calling `close` must still release the
//! underlying connection, so cancelled requests never leak a session.

use async_trait::async_trait;
use np_protocol::DeviceCredentials;

use crate::error::SessionResult;

/// Opens sessions to network devices.
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    /// Establish the socket and negotiate the transport, without logging in.
    ///
    /// Implementations enforce the socket and transport timeouts from
    /// `credentials.timeouts` and report them as `SessionError::Timeout`.
    async fn connect(&self, credentials: &DeviceCredentials)
    -> SessionResult<Box<dyn DeviceSession>>;
}

/// One open connection to one device.
#[async_trait]
pub trait DeviceSession: Send {
    /// Log in with username and password.
    async fn authenticate(&mut self, username: &str, password: &str) -> SessionResult<()>;

    /// Run a single command and return its textual output.
    async fn exec(&mut self, command: &str) -> SessionResult<String>;

    /// Close the session gracefully.
    async fn close(self: Box<Self>);
}
