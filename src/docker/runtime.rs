#![allow(clippy::module_name_repetitions)]
//! Docker runtime discovery, liveness probing and daemon startup.

use std::env;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use which::which;

use crate::exec::{ExecRequest, ExecService};

/// Default readiness-poll policy: up to 30 attempts, 1000ms apart.
pub const READY_ATTEMPTS: u32 = 30;
pub const READY_DELAY: Duration = Duration::from_millis(1000);

pub fn runtime_path() -> io::Result<PathBuf> {
    // Allow tests or callers to explicitly disable Docker detection to avoid hard failures
    if env::var("MODELDOCK_SKIP_DOCKER").ok().as_deref() == Some("1") {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "Docker disabled by environment override.",
        ));
    }

    // Explicit binary override (used by tests to point at a stub runtime)
    if let Ok(p) = env::var("MODELDOCK_DOCKER") {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p));
        }
    }

    if let Ok(p) = which("docker") {
        return Ok(p);
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        "Docker is required but was not found in PATH.",
    ))
}

/// Liveness probe: `docker info`. Reachable iff the command exits zero.
pub fn ping(exec: &ExecService) -> bool {
    let runtime = match runtime_path() {
        Ok(p) => p,
        Err(_) => return false,
    };
    exec.run(ExecRequest::new(runtime).arg("info"))
        .map(|out| out.success())
        .unwrap_or(false)
}

/// Block until the daemon answers the liveness probe or attempts run out.
/// Short-circuits on first success; returns false rather than erroring so
/// callers treat exhaustion as a soft failure.
pub fn wait_until_ready(exec: &ExecService, attempts: u32, delay: Duration) -> bool {
    for attempt in 0..attempts {
        if ping(exec) {
            tracing::debug!(attempt, "docker daemon became reachable");
            return true;
        }
        thread::sleep(delay);
    }
    tracing::warn!(attempts, "docker daemon still unreachable after polling");
    false
}

/// Outcome of a daemon start attempt or a start-docker boundary call.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StartOutcome {
    pub success: bool,
    pub message: String,
}

impl StartOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Attempt to start the Docker daemon for the host platform.
///
/// Windows and macOS launch Docker Desktop; Linux starts the docker service
/// via systemctl (may prompt for sudo credentials on the terminal).
pub fn start_daemon(exec: &ExecService) -> StartOutcome {
    let (program, args): (&str, Vec<&str>) = match env::consts::OS {
        "windows" => (
            "cmd",
            vec![
                "/C",
                "start",
                "",
                "C:\\Program Files\\Docker\\Docker\\Docker Desktop.exe",
            ],
        ),
        "macos" => ("open", vec!["-a", "Docker Desktop"]),
        "linux" => ("sudo", vec!["systemctl", "start", "docker"]),
        other => {
            return StartOutcome::failed(format!(
                "Unsupported platform: {other}. Please start Docker manually."
            ));
        }
    };

    tracing::info!(program, ?args, "attempting to start docker daemon");
    match exec.run(ExecRequest::new(program).args(args)) {
        Ok(out) if out.success() => {
            let noun = if env::consts::OS == "linux" {
                "Docker service"
            } else {
                "Docker Desktop"
            };
            StartOutcome::ok(format!("{noun} is starting. Please wait..."))
        }
        Ok(out) => StartOutcome::failed(format!(
            "Failed to start Docker: {}. Please start Docker manually.",
            out.stderr.trim()
        )),
        Err(e) => StartOutcome::failed(format!(
            "Failed to start Docker: {e:#}. Please start Docker manually."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_poll_defaults_match_policy() {
        assert_eq!(READY_ATTEMPTS, 30);
        assert_eq!(READY_DELAY, Duration::from_millis(1000));
    }
}
