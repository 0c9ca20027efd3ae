//! CLI integration tests

use std::process::Command;

fn skillctl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_skillctl"));
    cmd.env_remove("SKILLCTL_URL");
    cmd
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = skillctl()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Skill Prediction Service"), "Should show app name");
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("health"), "Should show health command");
    assert!(stdout.contains("--url"), "Should show url option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = skillctl()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("skillctl"), "Should show binary name");
}

/// Test predict against a mock service with JSON output
#[test]
fn test_predict_json_output() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"skill_tested": "data-structures"}"#)
        .create();

    let output = skillctl()
        .args([
            "--url",
            &server.url(),
            "--format",
            "json",
            "predict",
            "Reverse a linked list",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Predict should succeed");

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        rows,
        serde_json::json!([{"question": "Reverse a linked list", "skill_tested": "data-structures"}])
    );
}

/// Test predict exits non-zero when the service rejects the request
#[test]
fn test_predict_reports_service_error() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/predict")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "inference failed: model exploded"}"#)
        .create();

    let output = skillctl()
        .args(["--url", &server.url(), "predict", "Anything"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Predict should fail");
    assert!(stderr.contains("model exploded"), "got: {}", stderr);
}

/// Test predict requires at least one question
#[test]
fn test_predict_requires_question() {
    let output = skillctl()
        .arg("predict")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

/// Test health output when the service is not ready
#[test]
fn test_health_not_ready() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/healthz")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status": "healthy", "started_at": 1700000000,
                "components": {"classifier": {"status": "healthy", "last_check_timestamp": 1700000000}}}"#,
        )
        .create();
    server
        .mock("GET", "/readyz")
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ready": false, "reason": "Classifier not loaded yet"}"#)
        .create();

    let output = skillctl()
        .args(["--url", &server.url(), "--format", "json", "health"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Health should succeed");

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["health"]["status"], "healthy");
    assert_eq!(json["readiness"]["ready"], false);
}
