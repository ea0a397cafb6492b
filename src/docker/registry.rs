#![allow(clippy::module_name_repetitions)]
//! Scoped registry sessions: login for the duration of one pull, then logout.
//!
//! The session is an owned value rather than ambient host state; dropping it
//! always performs logout and secret-file cleanup, and both cleanup steps
//! swallow their own errors (logged, not raised) so cleanup failure never
//! masks the primary outcome.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::{OpError, OpResult};
use crate::exec::{ExecRequest, ExecService};

/// Ephemeral registry credentials, constructed per install request and never
/// persisted. An unset server address means Docker Hub.
#[derive(Debug, Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
    pub server_address: Option<String>,
}

impl RegistryCredentials {
    /// Credentials with an empty username or password cannot open a session;
    /// install skips the login/logout sequence entirely for them.
    pub fn is_usable(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }

    fn server(&self) -> &str {
        self.server_address
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
    }
}

/// An authenticated registry session, valid until dropped.
pub struct RegistrySession {
    exec: ExecService,
    runtime: PathBuf,
    server: String,
    secret: Option<NamedTempFile>,
}

impl RegistrySession {
    /// Write the password to a single-use owner-only temp file, then log in
    /// via `docker login --password-stdin` with the file's content.
    ///
    /// Output classification: "Login Succeeded" anywhere in the result text
    /// wins; otherwise any non-empty diagnostic stream (or a non-zero exit)
    /// is an authentication failure.
    pub fn login(
        exec: &ExecService,
        runtime: &Path,
        creds: &RegistryCredentials,
    ) -> OpResult<Self> {
        let server = creds.server().to_string();
        let registry_label = if server.is_empty() {
            "Docker Hub"
        } else {
            server.as_str()
        };
        tracing::info!(
            registry = registry_label,
            username = %creds.username,
            "authenticating to registry"
        );

        let secret = write_secret_file(&creds.password)?;

        let mut req = ExecRequest::new(runtime).arg("login");
        if !server.is_empty() {
            req = req.arg(&server);
        }
        let password = fs::read(secret.path())?;
        req = req
            .arg("--username")
            .arg(&creds.username)
            .arg("--password-stdin")
            .stdin(password);

        let out = exec.run(req).map_err(OpError::exec)?;
        if !login_succeeded(out.success(), &out.stdout, &out.stderr) {
            let detail = if out.stderr.trim().is_empty() {
                out.stdout.trim().to_string()
            } else {
                out.stderr.trim().to_string()
            };
            tracing::error!(registry = registry_label, detail = %detail, "docker login failed");
            // Secret file is dropped (removed) here before the error surfaces.
            return Err(OpError::AuthenticationFailed(format!(
                "Docker login failed: {detail}"
            )));
        }

        tracing::info!(registry = registry_label, "docker login successful");
        Ok(Self {
            exec: exec.clone(),
            runtime: runtime.to_path_buf(),
            server,
            secret: Some(secret),
        })
    }

    /// Path of the transient secret file, for as long as the session lives.
    pub fn secret_path(&self) -> Option<PathBuf> {
        self.secret.as_ref().map(|f| f.path().to_path_buf())
    }
}

impl Drop for RegistrySession {
    fn drop(&mut self) {
        // Remove the secret first so a hanging logout cannot prolong its life.
        if let Some(secret) = self.secret.take() {
            let path = secret.path().to_path_buf();
            if let Err(e) = secret.close() {
                tracing::debug!(path = %path.display(), error = %e, "failed to remove secret file");
            } else {
                tracing::debug!("temporary secret file removed");
            }
        }

        let registry_label = if self.server.is_empty() {
            "Docker Hub"
        } else {
            self.server.as_str()
        };
        let mut req = ExecRequest::new(&self.runtime).arg("logout");
        if !self.server.is_empty() {
            req = req.arg(&self.server);
        }
        match self.exec.run(req) {
            Ok(out) if out.success() => {
                tracing::info!(registry = registry_label, "docker logout successful");
            }
            Ok(out) => {
                tracing::warn!(
                    registry = registry_label,
                    stderr = %out.stderr.trim(),
                    "docker logout error"
                );
            }
            Err(e) => {
                tracing::warn!(registry = registry_label, error = %format!("{e:#}"), "docker logout error");
            }
        }
    }
}

fn write_secret_file(password: &str) -> OpResult<NamedTempFile> {
    let mut secret = tempfile::Builder::new()
        .prefix("modeldock-secret-")
        .tempfile()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(secret.path(), fs::Permissions::from_mode(0o600))?;
    }
    secret.write_all(password.as_bytes())?;
    secret.flush()?;
    Ok(secret)
}

/// Known success signature beats everything; otherwise any non-empty
/// diagnostic stream is a failure, and an undetermined (silent) result
/// falls back to the exit status.
pub(crate) fn login_succeeded(status_ok: bool, stdout: &str, stderr: &str) -> bool {
    if stdout.contains("Login Succeeded") || stderr.contains("Login Succeeded") {
        return true;
    }
    if !stderr.trim().is_empty() {
        return false;
    }
    status_ok
}
