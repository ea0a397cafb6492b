use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "modeldock",
    version,
    about = "Manage containerized AI model images via the Docker CLI: browse the catalog, install, run and stop.",
    after_long_help = "Examples:\n  modeldock models --json\n  modeldock status demo/model:1 demo-model\n  modeldock install demo/model:1 --username alice --server-address registry.example.com\n  modeldock run demo/model:1 --name demo-model --port 8080\n  modeldock stop demo-model\n  modeldock start-docker\n"
)]
pub(crate) struct Cli {
    /// Print detailed execution info
    #[arg(long)]
    pub(crate) verbose: bool,

    /// Emit machine-readable JSON instead of plain text
    #[arg(long)]
    pub(crate) json: bool,

    #[command(subcommand)]
    pub(crate) command: Op,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Op {
    /// Run diagnostics to check environment and configuration
    Doctor,

    /// Fetch the installable model catalog for this host
    Models,

    /// Classify a model's status (not_installed / installed / running)
    Status {
        /// Image reference to look for locally
        image: String,
        /// Container name to look for among running containers
        container_name: String,
    },

    /// Pull a model image, optionally authenticating against its registry
    Install {
        /// Image reference to pull
        image: String,
        /// Registry username; when omitted the pull is anonymous
        #[arg(long)]
        username: Option<String>,
        /// Registry password; falls back to MODELDOCK_REGISTRY_PASSWORD
        #[arg(long)]
        password: Option<String>,
        /// Registry server address (default: Docker Hub)
        #[arg(long = "server-address")]
        server_address: Option<String>,
    },

    /// Start a model container (replacing any same-named container)
    Run {
        /// Image reference to run
        image: String,
        /// Container name
        #[arg(long)]
        name: String,
        /// Host port mapped to the model server
        #[arg(long, default_value = "7860")]
        port: String,
    },

    /// Stop a model container by name
    Stop {
        /// Container name
        name: String,
    },

    /// Check whether the Docker daemon is reachable
    DockerStatus,

    /// Start the Docker daemon and wait for it to become reachable
    StartDocker,
}
