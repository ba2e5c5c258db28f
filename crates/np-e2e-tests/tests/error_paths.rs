//! E2E tests for failures at each pipeline stage.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::ResponseTemplate;

use helpers::{COMMAND_MODEL, INT_BRIEF, SUMMARY_MODEL, TestHarness};
use np_device_tools::MockConnector;
use np_device_tools::SessionError;
use np_device_tools::error::TimeoutStage;

/// Wrong password: auth failure message, no interpretation, session closed.
#[tokio::test]
async fn e2e_auth_failure() {
    let h = TestHarness::start(
        MockConnector::new()
            .with_credentials("admin", "different")
            .with_output("show ip int brief", INT_BRIEF),
    )
    .await;
    h.mount_summary(&["should not be used"]).await;

    let (status, body) = h.ask(json!({ "question": "show interfaces" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["stage"], "execute");
    assert_eq!(
        body["error"],
        "Authentication failed. Please check your username and password."
    );

    assert_eq!(h.device.opened(), 1);
    assert_eq!(h.device.open_sessions(), 0);
    assert!(h.device.executed().is_empty());
    assert_eq!(h.completion_calls(SUMMARY_MODEL).await, 0);
}

/// Unreachable device surfaces a connection error.
#[tokio::test]
async fn e2e_connect_failure() {
    let h = TestHarness::start(
        MockConnector::new().with_connect_error(SessionError::Connect("connection refused".into())),
    )
    .await;

    let (status, body) = h.ask(json!({ "question": "show interfaces" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["stage"], "execute");
    assert_eq!(body["error"], "Connection error: connection refused");
    assert_eq!(h.device.opened(), 0);
}

/// A timeout maps to 504.
#[tokio::test]
async fn e2e_timeout_failure() {
    let h = TestHarness::start(MockConnector::new().with_connect_error(SessionError::Timeout {
        stage: TimeoutStage::Socket,
        secs: 10,
    }))
    .await;

    let (status, body) = h.ask(json!({ "question": "show interfaces" })).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["stage"], "execute");
    assert_eq!(body["error"], "Timeout error: socket timed out after 10s");
}

/// Exec failures are reported as unexpected errors and still close the session.
#[tokio::test]
async fn e2e_exec_failure() {
    let h = TestHarness::start(
        MockConnector::new().with_exec_error(SessionError::Exec("channel closed by peer".into())),
    )
    .await;

    let (status, body) = h.ask(json!({ "question": "show interfaces" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "An unexpected error occurred: command execution failed: channel closed by peer"
    );
    assert_eq!(h.device.open_sessions(), 0);
}

/// Device ran the command but the completion service is unreachable:
/// interpretation-stage failure, raw output is not returned.
#[tokio::test]
async fn e2e_interpretation_unreachable() {
    let h = TestHarness::with_unreachable_completion(
        MockConnector::new().with_output("show ip int brief", INT_BRIEF),
    )
    .await;

    let (status, body) = h.ask(json!({ "question": "show interfaces" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["stage"], "interpret");
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("The command ran, but its output could not be interpreted"));
    assert!(!error.contains("Loopback0"));
    assert!(body.get("raw_output").is_none());

    assert_eq!(h.device.executed(), vec!["show ip int brief"]);
    assert_eq!(h.device.open_sessions(), 0);
}

/// Interpretation request answered with non-200.
#[tokio::test]
async fn e2e_interpretation_service_error() {
    let h = TestHarness::start(MockConnector::new().with_output("show ip int brief", INT_BRIEF)).await;
    h.mount_for_model(
        SUMMARY_MODEL,
        ResponseTemplate::new(500).set_body_string("model not loaded"),
    )
    .await;

    let (status, body) = h.ask(json!({ "question": "show interfaces" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["stage"], "interpret");
    assert!(body["error"].as_str().unwrap().contains("500"));
}

/// Corpus miss and synthesis fails: resolve-stage failure, device never contacted.
#[tokio::test]
async fn e2e_no_match_and_synthesis_failure() {
    let h = TestHarness::start(MockConnector::new()).await;
    h.mount_for_model(
        COMMAND_MODEL,
        ResponseTemplate::new(503).set_body_string("overloaded"),
    )
    .await;

    let (status, body) = h.ask(json!({ "question": "list bgp neighbors" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["stage"], "resolve");
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("No matching question was found")
    );
    assert_eq!(h.device.opened(), 0);
}

/// A malformed stream line is fatal; nothing is salvaged from earlier fragments.
#[tokio::test]
async fn e2e_malformed_stream_is_fatal() {
    let h = TestHarness::start(MockConnector::new()).await;
    h.mount_for_model(
        COMMAND_MODEL,
        ResponseTemplate::new(200).set_body_string("{\"response\":\"show \"}\nnot json\n"),
    )
    .await;

    let (status, body) = h.ask(json!({ "question": "list bgp neighbors" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["stage"], "resolve");
    assert!(h.device.executed().is_empty());
}

/// Empty question is rejected before anything runs.
#[tokio::test]
async fn e2e_empty_question_rejected() {
    let h = TestHarness::start(MockConnector::new()).await;

    let (status, body) = h.ask(json!({ "question": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["stage"].is_null());
    assert_eq!(h.device.opened(), 0);
    assert!(h.ollama.received_requests().await.unwrap().is_empty());
}

/// A failed request leaves the process able to answer the next one.
#[tokio::test]
async fn e2e_failure_does_not_poison_next_request() {
    let h = TestHarness::start(
        MockConnector::new()
            .with_credentials("admin", "C1sco12345")
            .with_output("show ip int brief", INT_BRIEF),
    )
    .await;
    h.mount_summary(&["Interfaces look healthy."]).await;

    let (status, _) = h
        .ask(json!({
            "question": "show interfaces",
            "device": { "host": "sandbox-iosxr", "username": "admin", "password": "wrong" },
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, report) = h.ask(json!({ "question": "show interfaces" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["summary"], "Interfaces look healthy.");
    assert_eq!(h.device.open_sessions(), 0);
}
