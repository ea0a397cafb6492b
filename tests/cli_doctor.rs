#![cfg(unix)]

use std::process::Command;

#[test]
fn test_doctor_reports_missing_docker() {
    let bin = env!("CARGO_BIN_EXE_modeldock");
    let out = Command::new(bin)
        .arg("doctor")
        .env("MODELDOCK_SKIP_DOCKER", "1")
        .output()
        .expect("failed to run modeldock doctor");

    assert!(
        out.status.success(),
        "doctor exited non-zero: {:?}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stderr)
    );
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("modeldock doctor"), "got:\n{err}");
    assert!(err.contains("docker: not found"), "got:\n{err}");
    assert!(err.contains("doctor: completed diagnostics."), "got:\n{err}");
}
