//! modeldock: host-side manager for containerized AI model images.
//!
//! Orchestrates the installed Docker CLI to pull model images (with
//! optional registry-scoped authentication), run them as named containers
//! with auto-removal, stop them, and classify their status for display.
//! The boundary operations in [`api`] mirror the channels of the desktop
//! frontend this library backs.

pub mod api;
pub mod catalog;
pub mod config;
pub mod cuda;
pub mod docker;
pub mod errors;
pub mod exec;

pub use api::{
    check_docker_status, check_model_status, fetch_models, install_model, run_model, start_docker,
    stop_model, DockerStatus,
};
pub use catalog::Model;
pub use config::BackendConfig;
pub use docker::registry::RegistryCredentials;
pub use docker::runtime::{runtime_path, StartOutcome};
pub use docker::ModelStatus;
pub use errors::{exit_code_for, OpError, OpResult};
pub use exec::{ExecOutput, ExecRequest, ExecService};
