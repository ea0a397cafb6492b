#![cfg(unix)]

use modeldock::docker::run_model;
use modeldock::{BackendConfig, ExecService, Model};

mod common;

fn demo_model() -> Model {
    Model {
        id: 1,
        display_name: "Demo".into(),
        docker_image: "demo/model:1".into(),
        container_name: "demo-model".into(),
        port: "8080".into(),
    }
}

fn backend() -> BackendConfig {
    BackendConfig {
        url: "https://backend.example.com".into(),
        anon_key: "anon-key".into(),
    }
}

// run-model force-removes any same-named container first, so calling it
// twice never errors with a name collision.
#[test]
fn test_run_twice_never_collides_on_name() {
    let fake = common::fake_docker(
        "  ps) echo abc123 ;;\n  rm) exit 0 ;;\n  run) echo deadbeef ;;",
    );
    let exec = ExecService::new();
    let model = demo_model();

    let first = run_model(&exec, &fake.bin, &model, &backend()).expect("first run");
    let second = run_model(&exec, &fake.bin, &model, &backend()).expect("second run");
    assert_eq!(
        first,
        "Successfully started container demo-model for demo/model:1 with auto-removal enabled"
    );
    assert_eq!(first, second);

    assert_eq!(fake.count_invocations_of("rm"), 2);
    assert_eq!(fake.count_invocations_of("run"), 2);
    let calls = fake.invocations();
    assert!(
        calls.iter().any(|l| l.starts_with("rm -f demo-model")),
        "stale container should be force-removed: {calls:?}"
    );
}

// The launch carries auto-removal, GPU access, the record's port mapping and
// the two backend env vars.
#[test]
fn test_run_flags_and_port_mapping() {
    let fake = common::fake_docker("  ps) exit 0 ;;\n  run) echo deadbeef ;;");
    let exec = ExecService::new();

    run_model(&exec, &fake.bin, &demo_model(), &backend()).expect("run");

    let calls = fake.invocations();
    let run_line = calls
        .iter()
        .find(|l| l.starts_with("run"))
        .expect("run was invoked");
    for needle in [
        "-d --rm --gpus all",
        "--name demo-model",
        "-p 8080:7860",
        "-e url=https://backend.example.com",
        "-e key=anon-key",
        "demo/model:1",
    ] {
        assert!(run_line.contains(needle), "missing {needle:?} in {run_line}");
    }
    // No same-named container existed, so nothing was removed.
    assert_eq!(fake.count_invocations_of("rm"), 0);
}

// Benign "Starting" chatter on stderr is not a failure; anything else is,
// with the raw text attached.
#[test]
fn test_run_stderr_classification() {
    let fake = common::fake_docker(
        "  ps) exit 0 ;;\n  run) echo 'Starting container' >&2; echo deadbeef ;;",
    );
    let exec = ExecService::new();
    run_model(&exec, &fake.bin, &demo_model(), &backend()).expect("benign stderr");

    let fake = common::fake_docker(
        "  ps) exit 0 ;;\n  run) echo 'could not select device driver' >&2; exit 125 ;;",
    );
    let err = run_model(&exec, &fake.bin, &demo_model(), &backend())
        .expect_err("driver error should fail");
    assert!(err.to_string().contains("could not select device driver"));
}
