//! Error taxonomy for docker orchestration.
//!
//! Recognized classes carry curated user-facing messages; only
//! `CommandFailed` exposes raw diagnostic text. Exit-code mapping follows
//! the usual CLI convention: 127 when the docker binary itself is missing,
//! 1 for everything else.

use std::io;

use thiserror::Error;

/// Result type alias for orchestration operations.
pub type OpResult<T> = Result<T, OpError>;

#[derive(Error, Debug)]
pub enum OpError {
    #[error("Docker is not running or not accessible")]
    RuntimeUnavailable,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authentication required for this registry. Please provide valid credentials.")]
    AuthenticationRequired,

    #[error("Invalid credentials or insufficient permissions to pull this image.")]
    Unauthorized,

    #[error("Image not found: {0}. Please check the image name and try again.")]
    ImageNotFound(String),

    #[error("docker command failed: {0}")]
    CommandFailed(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl OpError {
    /// Wrap an exec-layer failure (spawn/pipe errors) as an unclassified failure.
    pub fn exec(e: anyhow::Error) -> Self {
        OpError::CommandFailed(format!("{e:#}"))
    }
}

/// Map an error to a process exit code:
/// - 127 when the underlying cause is a NotFound io::Error (docker missing)
/// - 1 for all other errors
pub fn exit_code_for(e: &OpError) -> u8 {
    match e {
        OpError::Io(ioe) if ioe.kind() == io::ErrorKind::NotFound => 127,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_missing_maps_to_127() {
        let e = OpError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "Docker is required but was not found in PATH.",
        ));
        assert_eq!(exit_code_for(&e), 127);
    }

    #[test]
    fn other_errors_map_to_1() {
        assert_eq!(exit_code_for(&OpError::RuntimeUnavailable), 1);
        assert_eq!(
            exit_code_for(&OpError::ImageNotFound("demo/model:1".into())),
            1
        );
    }

    #[test]
    fn recognized_classes_hide_raw_diagnostics() {
        let msg = OpError::Unauthorized.to_string();
        assert_eq!(
            msg,
            "Invalid credentials or insufficient permissions to pull this image."
        );
        let raw = OpError::CommandFailed("boom from stderr".into()).to_string();
        assert!(raw.contains("boom from stderr"));
    }
}
