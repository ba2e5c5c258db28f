//! API server configuration.

/// Top-level API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Path to the assistant TOML config.
    pub assistant_config: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_assistant_config() -> String {
    "/etc/netpilot/assistant.toml".to_string()
}

impl ApiConfig {
    /// Load config from `NP_API_HOST`, `NP_API_PORT` and `NP_CONFIG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("NP_API_PORT").map(|p| p.parse::<u16>()) {
            Some(Ok(port)) => port,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "invalid NP_API_PORT, using default");
                defaults.port
            }
            None => defaults.port,
        };
        Self {
            host: lookup("NP_API_HOST").unwrap_or(defaults.host),
            port,
            assistant_config: lookup("NP_CONFIG").unwrap_or(defaults.assistant_config),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            assistant_config: default_assistant_config(),
        }
    }
}
