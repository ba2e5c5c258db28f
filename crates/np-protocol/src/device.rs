use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection and login details for a single network device.
///
/// Loaded from configuration or supplied per request; only held for the
/// lifetime of one session.
#[derive(Clone, Deserialize)]
pub struct DeviceCredentials {
    /// Hostname or IP address of the device.
    pub host: String,
    /// SSH port.
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Expected host key fingerprint. `None` accepts any key.
    #[serde(default)]
    pub host_key_fingerprint: Option<String>,
    /// Per-stage timeouts.
    #[serde(flatten)]
    pub timeouts: DeviceTimeouts,
}

fn default_port() -> u16 {
    22
}

impl DeviceCredentials {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: username.into(),
            password: password.into(),
            host_key_fingerprint: None,
            timeouts: DeviceTimeouts::default(),
        }
    }

    /// `host:port` string used for logging and socket establishment.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Keeps the password out of logs and panic messages.
impl fmt::Debug for DeviceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host_key_fingerprint", &self.host_key_fingerprint)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

/// Independent timeouts for the three stages of a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTimeouts {
    /// TCP socket establishment.
    #[serde(default = "default_timeout_secs")]
    pub timeout_socket_secs: u64,
    /// SSH transport negotiation and authentication.
    #[serde(default = "default_timeout_secs")]
    pub timeout_transport_secs: u64,
    /// Per-operation execution (sending the command and reading its output).
    #[serde(default = "default_timeout_secs")]
    pub timeout_ops_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

/// Upper bound applied to every stage timeout (one hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

impl DeviceTimeouts {
    /// Socket timeout, capped at [`MAX_TIMEOUT_SECS`].
    pub fn socket(&self) -> Duration {
        capped(self.timeout_socket_secs)
    }

    /// Transport timeout, capped at [`MAX_TIMEOUT_SECS`].
    pub fn transport(&self) -> Duration {
        capped(self.timeout_transport_secs)
    }

    /// Operation timeout, capped at [`MAX_TIMEOUT_SECS`].
    pub fn ops(&self) -> Duration {
        capped(self.timeout_ops_secs)
    }
}

fn capped(secs: u64) -> Duration {
    Duration::from_secs(secs.min(MAX_TIMEOUT_SECS))
}

impl Default for DeviceTimeouts {
    fn default() -> Self {
        Self {
            timeout_socket_secs: default_timeout_secs(),
            timeout_transport_secs: default_timeout_secs(),
            timeout_ops_secs: default_timeout_secs(),
        }
    }
}
