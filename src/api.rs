//! Boundary surface for the presentation layer.
//!
//! One function per operation, mirroring the channels the renderer used to
//! invoke. Each call is attempt-once; the readiness poll inside
//! [`start_docker`] is the only retry loop. Nothing here serializes two
//! concurrent invocations against the same named resource; the caller is
//! expected to keep at most one operation in flight per model.

use serde::Serialize;

use crate::catalog::{self, Model};
use crate::config::BackendConfig;
use crate::docker::registry::RegistryCredentials;
use crate::docker::runtime::{self, StartOutcome, READY_ATTEMPTS, READY_DELAY};
use crate::docker::{self, ModelStatus};
use crate::errors::OpResult;
use crate::exec::ExecService;

/// Reachability of the container runtime, in the wire form the original
/// presentation layer expects.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DockerStatus {
    #[serde(rename = "isRunning")]
    pub is_running: bool,
}

/// Bound on the nvidia-smi probe; a wedged driver must not hang the
/// catalog fetch. Docker invocations stay unbounded.
const CUDA_PROBE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// fetch-models: ordered model records, empty on any failure.
pub fn fetch_models() -> Vec<Model> {
    let exec = ExecService::with_default_timeout(CUDA_PROBE_TIMEOUT);
    catalog::fetch_models(&exec, &BackendConfig::from_env())
}

/// check-model-status: classify image/container presence for one model.
pub fn check_model_status(image: &str, container_name: &str) -> OpResult<ModelStatus> {
    let exec = ExecService::new();
    let rt = runtime::runtime_path()?;
    docker::check_status(&exec, &rt, image, container_name)
}

/// install-model: pull the image, with a scoped registry login when
/// credentials are supplied.
pub fn install_model(image: &str, creds: Option<RegistryCredentials>) -> OpResult<String> {
    let exec = ExecService::new();
    docker::install_image(&exec, image, creds.as_ref())
}

/// run-model: replace any same-named container and start a fresh one.
pub fn run_model(model: &Model) -> OpResult<String> {
    let exec = ExecService::new();
    let rt = runtime::runtime_path()?;
    docker::run_model(&exec, &rt, model, &BackendConfig::from_env())
}

/// stop-model: stop by name, or report the designated no-op message.
pub fn stop_model(model: &Model) -> OpResult<String> {
    let exec = ExecService::new();
    let rt = runtime::runtime_path()?;
    docker::stop_model(&exec, &rt, model)
}

/// check-docker-status: liveness probe, never errors.
pub fn check_docker_status() -> DockerStatus {
    let exec = ExecService::new();
    DockerStatus {
        is_running: runtime::ping(&exec),
    }
}

/// start-docker: start the daemon if needed, then poll until it answers.
pub fn start_docker() -> StartOutcome {
    let exec = ExecService::new();

    if runtime::ping(&exec) {
        return StartOutcome::ok("Docker is already running.");
    }

    let started = runtime::start_daemon(&exec);
    if !started.success {
        return started;
    }

    if runtime::wait_until_ready(&exec, READY_ATTEMPTS, READY_DELAY) {
        StartOutcome::ok("Docker has been started successfully.")
    } else {
        StartOutcome::failed(
            "Docker was started but is not responding. It might still be initializing.",
        )
    }
}
