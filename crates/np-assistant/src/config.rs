//! Assistant configuration, loadable from TOML.

use np_corpus::{DEFAULT_SEED, DEFAULT_THRESHOLD, DEFAULT_TRAIN_RATIO};
use np_protocol::DeviceCredentials;
use serde::Deserialize;

use crate::inference::OllamaConfig;

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Known-question corpus settings.
    pub corpus: CorpusConfig,
    /// Completion service settings. Defaults to a local Ollama.
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Default device to run commands on.
    pub device: DeviceCredentials,
}

/// Where the corpus lives and how it is split and matched.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    /// CSV file with `question` and `answer` columns.
    pub path: String,
    /// Share of rows used for matching.
    #[serde(default = "default_train_ratio")]
    pub train_ratio: f64,
    /// Shuffle seed for the split.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Minimum similarity for a corpus match.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_train_ratio() -> f64 {
    DEFAULT_TRAIN_RATIO
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl AssistantConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
