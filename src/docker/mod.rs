#![allow(clippy::module_name_repetitions)]
//! Docker CLI orchestration: runtime discovery, registry sessions, image
//! pulls, named-container lifecycle and status classification.

pub mod container;
pub mod pull;
pub mod registry;
pub mod runtime;
pub mod status;

pub use container::{run_model, stop_model};
pub use pull::install_image;
pub use registry::{RegistryCredentials, RegistrySession};
pub use runtime::{ping, runtime_path, start_daemon, wait_until_ready, StartOutcome};
pub use status::{check_status, ModelStatus};
