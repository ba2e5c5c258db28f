//! Shared test harness for E2E integration tests.
//!
//! Wires a CSV corpus, a wiremock completion service, and a scripted device
//! into the real pipeline and HTTP router.

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use np_api::routes::build_router;
use np_api::state::AppState;
use np_assistant::inference::{CompletionService, OllamaClient, OllamaConfig};
use np_assistant::pipeline::Pipeline;
use np_assistant::resolver::CommandResolver;
use np_corpus::{Corpus, DEFAULT_THRESHOLD};
use np_device_tools::{ExecutionAdapter, MockConnector};
use np_protocol::DeviceCredentials;

/// Corpus used by every harness.
pub const SAMPLE_CSV: &str = "\
question,answer
show interfaces,show ip int brief
what version is running,show version
show the routing table,show route
";

pub const COMMAND_MODEL: &str = "llama3.1";
pub const SUMMARY_MODEL: &str = "llama3.2:1b-instruct-fp16";

/// End-to-end test harness.
pub struct TestHarness {
    /// Mock completion service (Ollama `/api/generate`).
    pub ollama: MockServer,
    /// Scripted device.
    pub device: Arc<MockConnector>,
    /// Pipeline wired to the mocks.
    pub pipeline: Pipeline,
    /// Axum router over the same pipeline.
    pub router: Router,
    /// Credentials the device accepts.
    pub credentials: DeviceCredentials,
}

impl TestHarness {
    /// Harness whose completion client talks to a fresh wiremock server.
    pub async fn start(device: MockConnector) -> Self {
        let ollama = MockServer::start().await;
        let host = ollama.uri();
        Self::build(ollama, host, device)
    }

    /// Harness whose completion client points at a closed port.
    pub async fn with_unreachable_completion(device: MockConnector) -> Self {
        let ollama = MockServer::start().await;
        Self::build(ollama, "http://127.0.0.1:9".into(), device)
    }

    fn build(ollama: MockServer, host: String, device: MockConnector) -> Self {
        let mut csv = tempfile::NamedTempFile::new().unwrap();
        csv.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        let corpus = Arc::new(Corpus::load(csv.path(), 1.0, 1).unwrap());

        let completion: Arc<dyn CompletionService> = Arc::new(
            OllamaClient::new(OllamaConfig {
                host,
                timeout_secs: 2,
                ..OllamaConfig::default()
            })
            .unwrap(),
        );
        let device = Arc::new(device);
        let resolver = CommandResolver::new(corpus, completion.clone(), DEFAULT_THRESHOLD);
        let pipeline = Pipeline::new(
            resolver,
            ExecutionAdapter::new(device.clone()),
            completion,
        );
        let credentials = DeviceCredentials::new("sandbox-iosxr", "admin", "C1sco12345");
        let router = build_router(AppState::new(pipeline.clone(), Some(credentials.clone())));

        Self {
            ollama,
            device,
            pipeline,
            router,
            credentials,
        }
    }

    /// Answer command-synthesis requests with an NDJSON stream of `fragments`.
    pub async fn mount_command(&self, fragments: &[&str]) {
        self.mount_for_model(COMMAND_MODEL, ResponseTemplate::new(200).set_body_string(ndjson(fragments)))
            .await;
    }

    /// Answer interpretation requests with an NDJSON stream of `fragments`.
    pub async fn mount_summary(&self, fragments: &[&str]) {
        self.mount_for_model(SUMMARY_MODEL, ResponseTemplate::new(200).set_body_string(ndjson(fragments)))
            .await;
    }

    /// Answer requests for `model` with `template`.
    pub async fn mount_for_model(&self, model: &str, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({ "model": model })))
            .respond_with(template)
            .mount(&self.ollama)
            .await;
    }

    /// Number of requests the completion service received for `model`.
    pub async fn completion_calls(&self, model: &str) -> usize {
        self.ollama
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| {
                serde_json::from_slice::<serde_json::Value>(&r.body)
                    .map(|b| b["model"] == model)
                    .unwrap_or(false)
            })
            .count()
    }

    /// POST /api/v1/ask. Returns (HTTP status code, response JSON body).
    pub async fn ask(&self, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/api/v1/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}

/// Build an Ollama-style NDJSON generate stream.
pub fn ndjson(fragments: &[&str]) -> String {
    fragments
        .iter()
        .enumerate()
        .map(|(i, fragment)| {
            serde_json::json!({
                "model": "mock",
                "response": fragment,
                "done": i + 1 == fragments.len(),
            })
            .to_string()
                + "\n"
        })
        .collect()
}

/// IOS XR style `show ip int brief` output.
pub const INT_BRIEF: &str = "\
Interface                      IP-Address      Status          Protocol Vrf-Name
Loopback0                      10.0.0.1        Up              Up       default
MgmtEth0/RP0/CPU0/0            192.168.1.10    Up              Up       default
GigabitEthernet0/0/0/0         unassigned      Shutdown        Down     default";
