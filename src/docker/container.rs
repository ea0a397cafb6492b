//! Named-container lifecycle: run with replacement, stop with auto-removal.

use std::path::Path;

use crate::catalog::Model;
use crate::config::BackendConfig;
use crate::errors::{OpError, OpResult};
use crate::exec::{ExecRequest, ExecService};

/// Container-side port the model servers listen on; the record's port is the
/// host side of the mapping.
const MODEL_CONTAINER_PORT: u16 = 7860;

/// Start the model's container, force-removing any same-named container
/// first so the name is always free. At most one container exists per name.
///
/// The container runs detached with auto-removal on exit, GPU access, the
/// record's port mapping and two env vars carrying backend connection info.
/// Idempotent with respect to pre-existing same-named containers.
pub fn run_model(
    exec: &ExecService,
    runtime: &Path,
    model: &Model,
    backend: &BackendConfig,
) -> OpResult<String> {
    let name = &model.container_name;
    let image = &model.docker_image;

    match lookup_container(exec, runtime, name, true) {
        Ok(Some(id)) => {
            tracing::info!(container = %name, id = %id, "removing existing container before run");
            if let Err(e) = exec.run(ExecRequest::new(runtime).args(["rm", "-f", name])) {
                // Removal errors are logged only; the run attempt decides.
                tracing::info!(container = %name, error = %format!("{e:#}"), "error removing existing container");
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::info!(container = %name, error = %e, "no existing container found or error checking");
        }
    }

    let port_mapping = format!("{}:{}", model.port, MODEL_CONTAINER_PORT);
    let out = exec
        .run(
            ExecRequest::new(runtime)
                .args(["run", "-d", "--rm", "--gpus", "all", "--name"])
                .arg(name)
                .args(["-p", &port_mapping, "-e"])
                .arg(format!("url={}", backend.url))
                .arg("-e")
                .arg(format!("key={}", backend.anon_key))
                .arg(image),
        )
        .map_err(OpError::exec)?;
    tracing::debug!(stdout = %out.stdout.trim(), "docker run stdout");

    if run_failed(out.success(), &out.stderr) {
        tracing::error!(container = %name, stderr = %out.stderr.trim(), "docker run failed");
        return Err(OpError::CommandFailed(out.stderr.trim().to_string()));
    }

    Ok(format!(
        "Successfully started container {name} for {image} with auto-removal enabled"
    ))
}

/// Stop the model's container by name. When no container with the name is
/// running this is a no-op: the designated message is returned and no stop
/// command is issued. A successful stop also removes the container because
/// run requested auto-removal.
pub fn stop_model(exec: &ExecService, runtime: &Path, model: &Model) -> OpResult<String> {
    let name = &model.container_name;
    tracing::info!(container = %name, image = %model.docker_image, "stopping model");

    if lookup_container(exec, runtime, name, false)?.is_none() {
        return Ok(format!("No running container found with name {name}"));
    }

    let out = exec
        .run(ExecRequest::new(runtime).args(["stop", name]))
        .map_err(OpError::exec)?;
    tracing::debug!(stdout = %out.stdout.trim(), "docker stop stdout");

    if !out.success() || !out.stderr.trim().is_empty() {
        tracing::error!(container = %name, stderr = %out.stderr.trim(), "docker stop failed");
        return Err(OpError::CommandFailed(out.stderr.trim().to_string()));
    }

    Ok(format!(
        "Successfully stopped container {name}. Container will be automatically removed."
    ))
}

/// Query the container id for `name`, across all states when `any_state`,
/// otherwise running containers only. Empty listing means no match.
fn lookup_container(
    exec: &ExecService,
    runtime: &Path,
    name: &str,
    any_state: bool,
) -> OpResult<Option<String>> {
    let mut req = ExecRequest::new(runtime).arg("ps");
    if any_state {
        req = req.arg("-a");
    }
    let out = exec
        .run(
            req.arg("--filter")
                .arg(format!("name={name}"))
                .args(["--format", "{{.ID}}"]),
        )
        .map_err(OpError::exec)?;
    if !out.success() {
        return Err(OpError::CommandFailed(out.stderr.trim().to_string()));
    }
    let id = out.stdout.trim();
    Ok(if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    })
}

/// Startup noise on stderr containing the benign "Starting" marker is not a
/// failure; any other non-empty diagnostic stream is.
pub(crate) fn run_failed(status_ok: bool, stderr: &str) -> bool {
    let trimmed = stderr.trim();
    if !status_ok {
        return true;
    }
    !trimmed.is_empty() && !trimmed.contains("Starting")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_run_is_success() {
        assert!(!run_failed(true, ""));
        assert!(!run_failed(true, "  \n"));
    }

    #[test]
    fn starting_marker_is_benign() {
        assert!(!run_failed(true, "Starting container...\n"));
    }

    #[test]
    fn other_stderr_or_nonzero_exit_fails() {
        assert!(run_failed(
            true,
            "docker: Error response from daemon: could not select device driver"
        ));
        assert!(run_failed(false, ""));
    }
}
