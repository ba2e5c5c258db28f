//! NetPilot assistant: ask a network device questions in plain language.
//!
//! Usage: `np-assistant [--config <path>] [question...]`. The config path
//! falls back to `NP_CONFIG`, then `/etc/netpilot/assistant.toml`. With no
//! question on the command line, questions are read from stdin one per line.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use np_assistant::config::AssistantConfig;
use np_assistant::pipeline::Pipeline;
use np_protocol::{AnswerReport, DeviceCredentials, ResolutionSource};

const DEFAULT_CONFIG_PATH: &str = "/etc/netpilot/assistant.toml";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct CliArgs {
    config_path: String,
    question: String,
}

impl CliArgs {
    /// Parse `args` (without the program name). `env_config` is `NP_CONFIG`.
    fn parse(
        args: impl IntoIterator<Item = String>,
        env_config: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config_path = None;
        let mut words = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--config" || arg == "-c" {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{arg} requires a path"))?;
                config_path = Some(path);
            } else if let Some(path) = arg.strip_prefix("--config=") {
                config_path = Some(path.to_string());
            } else {
                words.push(arg);
            }
        }

        Ok(Self {
            config_path: config_path
                .or(env_config)
                .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()),
            question: words.join(" ").trim().to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "np-assistant starting");

    // ── Load config ─────────────────────────────────────────────
    let cli = CliArgs::parse(std::env::args().skip(1), std::env::var("NP_CONFIG").ok())?;
    let config = AssistantConfig::from_file(&cli.config_path)?;
    tracing::info!(
        corpus = %config.corpus.path,
        device = %config.device.address(),
        "config loaded"
    );

    // ── Build pipeline ──────────────────────────────────────────
    let pipeline = Pipeline::from_config(&config)?;

    // ── One-shot or interactive ─────────────────────────────────
    if !cli.question.is_empty() {
        ask_cancellable(&pipeline, &cli.question, &config.device).await;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                break;
            }
        };
        let Some(line) = line else { break };
        let question = line.trim();
        if !question.is_empty() {
            ask_cancellable(&pipeline, question, &config.device).await;
        }
    }

    tracing::info!("np-assistant stopped");
    Ok(())
}

/// Run one question; Ctrl-C drops the in-flight request and its device session.
async fn ask_cancellable(pipeline: &Pipeline, question: &str, device: &DeviceCredentials) {
    tokio::select! {
        () = ask(pipeline, question, device) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(question = %question, "request cancelled");
            println!("Request cancelled.");
        }
    }
}

async fn ask(pipeline: &Pipeline, question: &str, device: &DeviceCredentials) {
    match pipeline.run(question, device).await {
        Ok(report) => print_report(&report),
        Err(e) => {
            tracing::warn!(stage = e.stage(), error = %e, "request failed");
            println!("{}", e.user_message());
        }
    }
}

fn print_report(report: &AnswerReport) {
    match &report.resolution {
        ResolutionSource::Dataset {
            matched_question, ..
        } => println!("Closest match found in dataset: {matched_question}"),
        ResolutionSource::Model => {
            println!("No match found in dataset. Command suggested by the language model.")
        }
    }
    println!("Command: {}", report.command);
    println!("Response:\n{}", report.summary);
}
