//! Runtime-derived model status classification.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{OpError, OpResult};
use crate::exec::{ExecRequest, ExecService};

/// Status enumeration shown to the presentation layer.
///
/// Only `NotInstalled`, `Installed` and `Running` are ever derived from the
/// runtime. The remaining values are transient intent states a caller sets
/// optimistically around an in-flight operation and reconciles by
/// re-invoking [`check_status`] afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    NotInstalled,
    Installing,
    Installed,
    Starting,
    Running,
    Stopping,
    Error,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::NotInstalled => "not_installed",
            ModelStatus::Installing => "installing",
            ModelStatus::Installed => "installed",
            ModelStatus::Starting => "starting",
            ModelStatus::Running => "running",
            ModelStatus::Stopping => "stopping",
            ModelStatus::Error => "error",
        }
    }
}

/// Classify image/container presence via two read-only queries.
pub fn check_status(
    exec: &ExecService,
    runtime: &Path,
    image: &str,
    container_name: &str,
) -> OpResult<ModelStatus> {
    let images = exec
        .run(
            ExecRequest::new(runtime)
                .args(["image", "ls"])
                .arg(image)
                .args(["--format", "{{.Repository}}:{{.Tag}}"]),
        )
        .map_err(OpError::exec)?;
    if !images.success() {
        return Err(OpError::CommandFailed(images.stderr.trim().to_string()));
    }

    // Image absent: the container query is pointless.
    if images.stdout.trim().is_empty() {
        return Ok(ModelStatus::NotInstalled);
    }

    let containers = exec
        .run(
            ExecRequest::new(runtime)
                .arg("ps")
                .arg("--filter")
                .arg(format!("name={container_name}"))
                .args(["--format", "{{.ID}}"]),
        )
        .map_err(OpError::exec)?;
    if !containers.success() {
        return Err(OpError::CommandFailed(containers.stderr.trim().to_string()));
    }

    Ok(classify_presence(&images.stdout, &containers.stdout))
}

/// Presence rules over the two raw listings: image absent → not installed;
/// image present without a matching container → installed; matching
/// container present → running.
pub(crate) fn classify_presence(image_listing: &str, container_listing: &str) -> ModelStatus {
    if image_listing.trim().is_empty() {
        ModelStatus::NotInstalled
    } else if container_listing.trim().is_empty() {
        ModelStatus::Installed
    } else {
        ModelStatus::Running
    }
}
