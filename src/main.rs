use std::env;
use std::process::{Command, ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use modeldock::{
    api, config, cuda, exit_code_for, BackendConfig, ExecService, Model, OpError,
    RegistryCredentials,
};

mod cli;

use cli::{Cli, Op};

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "modeldock=debug"
    } else {
        "modeldock=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_doctor() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("modeldock doctor");
    eprintln!("  version: v{}", version);
    eprintln!(
        "  build: {} ({}, {})",
        env!("MODELDOCK_BUILD_DATE"),
        env!("MODELDOCK_BUILD_TARGET"),
        env!("MODELDOCK_BUILD_PROFILE")
    );
    eprintln!("  rustc: {}", env!("MODELDOCK_BUILD_RUSTC"));
    eprintln!(
        "  host: {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    match modeldock::runtime_path() {
        Ok(p) => {
            eprintln!("  docker: {}", p.display());
            if let Ok(out) = Command::new(&p).arg("--version").output() {
                let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
                if !s.is_empty() {
                    eprintln!("  docker --version: {}", s);
                }
            }
            let exec = ExecService::new();
            eprintln!(
                "  docker daemon: {}",
                if modeldock::docker::ping(&exec) {
                    "reachable"
                } else {
                    "unreachable"
                }
            );
        }
        Err(e) => {
            eprintln!("  docker: not found ({e})");
        }
    }

    let exec = ExecService::with_default_timeout(std::time::Duration::from_secs(10));
    let gpu = cuda::detect(&exec);
    if gpu.installed {
        eprintln!(
            "  cuda: {} (driver: {})",
            gpu.version,
            gpu.driver_version.as_deref().unwrap_or("unknown")
        );
    } else {
        eprintln!("  cuda: not detected");
    }

    let backend = BackendConfig::from_env();
    eprintln!(
        "  backend: {}",
        if backend.is_configured() {
            backend.url.as_str()
        } else {
            "(not configured)"
        }
    );

    eprintln!("doctor: completed diagnostics.");
}

fn report(result: Result<String, OpError>, json: bool) -> ExitCode {
    match result {
        Ok(message) => {
            if json {
                println!("{}", serde_json::json!({ "message": message }));
            } else {
                println!("{message}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "operation failed");
            if json {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                eprintln!("modeldock: {e}");
            }
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    config::load_dotenv();

    match cli.command {
        Op::Doctor => {
            run_doctor();
            ExitCode::SUCCESS
        }

        Op::Models => {
            let models = api::fetch_models();
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&models).unwrap_or_else(|_| "[]".to_string())
                );
            } else if models.is_empty() {
                println!("no installable models for this host");
            } else {
                for m in &models {
                    println!(
                        "{}\t{}\t{} (container: {}, port {})",
                        m.id, m.display_name, m.docker_image, m.container_name, m.port
                    );
                }
            }
            ExitCode::SUCCESS
        }

        Op::Status {
            image,
            container_name,
        } => match api::check_model_status(&image, &container_name) {
            Ok(status) => {
                if cli.json {
                    println!("{}", serde_json::json!({ "status": status }));
                } else {
                    println!("{}", status.as_str());
                }
                ExitCode::SUCCESS
            }
            Err(e) => report(Err(e), cli.json),
        },

        Op::Install {
            image,
            username,
            password,
            server_address,
        } => {
            let creds = username.map(|username| RegistryCredentials {
                username,
                password: password
                    .or_else(|| env::var("MODELDOCK_REGISTRY_PASSWORD").ok())
                    .unwrap_or_default(),
                server_address,
            });
            report(api::install_model(&image, creds), cli.json)
        }

        Op::Run { image, name, port } => {
            let model = Model {
                id: 0,
                display_name: name.clone(),
                docker_image: image,
                container_name: name,
                port,
            };
            report(api::run_model(&model), cli.json)
        }

        Op::Stop { name } => {
            let model = Model {
                id: 0,
                display_name: name.clone(),
                docker_image: String::new(),
                container_name: name,
                port: String::new(),
            };
            report(api::stop_model(&model), cli.json)
        }

        Op::DockerStatus => {
            let status = api::check_docker_status();
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&status).unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                println!(
                    "docker: {}",
                    if status.is_running {
                        "running"
                    } else {
                        "not running"
                    }
                );
            }
            ExitCode::SUCCESS
        }

        Op::StartDocker => {
            let outcome = api::start_docker();
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&outcome).unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                println!("{}", outcome.message);
            }
            if outcome.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
