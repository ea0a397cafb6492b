//! Image install orchestration: login, pull, classify, cleanup.

use crate::docker::registry::{RegistryCredentials, RegistrySession};
use crate::docker::runtime;
use crate::errors::{OpError, OpResult};
use crate::exec::{ExecRequest, ExecService};

/// Benign progress markers docker emits on stderr during a normal pull.
/// Anything else on stderr is treated as a hard failure.
const PULL_BENIGN_MARKERS: [&str; 5] = [
    "Downloaded",
    "already up to date",
    "Pulling from",
    "Digest:",
    "Status:",
];

/// Ensure `image` is present locally, optionally authenticating first.
///
/// The registry session (when credentials are usable) lives for the scope of
/// the pull; its drop performs logout and secret cleanup regardless of the
/// pull's outcome. Credentials with an empty username skip the login/logout
/// sequence entirely.
pub fn install_image(
    exec: &ExecService,
    image: &str,
    creds: Option<&RegistryCredentials>,
) -> OpResult<String> {
    tracing::info!(image, "starting pull process");

    let runtime = runtime::runtime_path()?;
    if !runtime::ping(exec) {
        tracing::error!(image, "docker is not running or not accessible");
        return Err(OpError::RuntimeUnavailable);
    }

    let _session = match creds.filter(|c| c.is_usable()) {
        Some(c) => Some(RegistrySession::login(exec, &runtime, c)?),
        None => None,
    };

    tracing::info!(image, "pulling docker image");
    let out = exec
        .run(ExecRequest::new(&runtime).args(["pull", image]))
        .map_err(OpError::exec)?;
    if !out.stdout.is_empty() {
        tracing::debug!(stdout = %out.stdout.trim(), "docker pull stdout");
    }
    if !out.stderr.is_empty() {
        tracing::debug!(stderr = %out.stderr.trim(), "docker pull stderr");
    }

    if let Some(err) = classify_pull_failure(out.success(), &out.stderr, image) {
        tracing::error!(image, error = %err, "docker pull failed");
        return Err(err);
    }

    tracing::info!(image, "successfully pulled image");
    Ok(format!("Successfully installed {image}"))
}

/// Translate pull diagnostics into the error taxonomy. Returns None when the
/// pull is considered successful (clean stderr or benign progress only).
pub(crate) fn classify_pull_failure(
    status_ok: bool,
    stderr: &str,
    image: &str,
) -> Option<OpError> {
    let trimmed = stderr.trim();
    if trimmed.is_empty() && status_ok {
        return None;
    }
    if status_ok && PULL_BENIGN_MARKERS.iter().any(|m| trimmed.contains(m)) {
        return None;
    }

    if trimmed.contains("authentication required") {
        Some(OpError::AuthenticationRequired)
    } else if trimmed.contains("unauthorized") {
        Some(OpError::Unauthorized)
    } else if trimmed.contains("not found") {
        Some(OpError::ImageNotFound(image.to_string()))
    } else if trimmed.is_empty() {
        Some(OpError::CommandFailed(format!(
            "docker pull {image} exited with failure and no diagnostics"
        )))
    } else {
        Some(OpError::CommandFailed(trimmed.to_string()))
    }
}
