//! Process-level startup tests for the prediction-service binary

use std::net::TcpListener;
use std::process::Command;

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// A missing artifact must stop the process before it binds its port
#[test]
fn test_missing_artifact_exits_before_binding() {
    let dir = tempfile::TempDir::new().unwrap();
    let artifact = dir.path().join("skill_classifier.json");
    let port = free_port();

    let output = Command::new(env!("CARGO_BIN_EXE_prediction-service"))
        .current_dir(dir.path())
        .env("PREDICTOR_ARTIFACT_PATH", &artifact)
        .env("PREDICTOR_PORT", port.to_string())
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute prediction-service");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success(), "Startup should fail");
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stdout.contains("not found"),
        "Should explain the missing artifact on stdout, got: {}",
        stdout
    );
    assert!(
        !stdout.contains("Prediction service listening"),
        "Should never start listening"
    );

    // The port was never taken
    TcpListener::bind(("127.0.0.1", port)).expect("port should still be free");
}

/// A corrupt artifact is just as fatal as a missing one
#[test]
fn test_invalid_artifact_exits() {
    let dir = tempfile::TempDir::new().unwrap();
    let artifact = dir.path().join("skill_classifier.json");
    std::fs::write(&artifact, "{ definitely not a model").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_prediction-service"))
        .current_dir(dir.path())
        .env("PREDICTOR_ARTIFACT_PATH", &artifact)
        .env("PREDICTOR_PORT", free_port().to_string())
        .output()
        .expect("Failed to execute prediction-service");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("failed to parse classifier artifact"), "got: {}", stdout);
}
