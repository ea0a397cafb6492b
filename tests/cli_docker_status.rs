#![cfg(unix)]

use std::process::Command;

mod common;

// check-docker-status reflects an unreachable runtime as isRunning:false and
// a reachable one as isRunning:true, and never exits non-zero.
#[test]
fn test_docker_status_json_reflects_reachability() {
    let bin = env!("CARGO_BIN_EXE_modeldock");

    let out = Command::new(bin)
        .args(["--json", "docker-status"])
        .env("MODELDOCK_SKIP_DOCKER", "1")
        .output()
        .expect("failed to run modeldock docker-status");
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        r#"{"isRunning":false}"#
    );

    let fake = common::fake_docker("  info) exit 0 ;;");
    let out = Command::new(bin)
        .args(["--json", "docker-status"])
        .env("MODELDOCK_DOCKER", &fake.bin)
        .env_remove("MODELDOCK_SKIP_DOCKER")
        .output()
        .expect("failed to run modeldock docker-status");
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        r#"{"isRunning":true}"#
    );

    let fake = common::fake_docker("  info) exit 1 ;;");
    let out = Command::new(bin)
        .args(["docker-status"])
        .env("MODELDOCK_DOCKER", &fake.bin)
        .env_remove("MODELDOCK_SKIP_DOCKER")
        .output()
        .expect("failed to run modeldock docker-status");
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "docker: not running"
    );
}

// start-docker short-circuits when the daemon is already reachable.
#[test]
fn test_start_docker_already_running() {
    let fake = common::fake_docker("  info) exit 0 ;;");
    let bin = env!("CARGO_BIN_EXE_modeldock");
    let out = Command::new(bin)
        .args(["start-docker"])
        .env("MODELDOCK_DOCKER", &fake.bin)
        .env_remove("MODELDOCK_SKIP_DOCKER")
        .output()
        .expect("failed to run modeldock start-docker");
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "Docker is already running."
    );
}
