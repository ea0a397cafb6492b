//! Backend connection settings, read from the environment.

use std::env;

/// Connection info for the catalog backend. The same two values are injected
/// into model containers as the `url` and `key` environment variables.
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self {
            url: env_trimmed("MODELDOCK_BACKEND_URL"),
            anon_key: env_trimmed("MODELDOCK_BACKEND_KEY"),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }
}

fn env_trimmed(key: &str) -> String {
    env::var(key)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Load a .env file if present. Errors are ignored: a missing file is the
/// common case and real configuration may come from the environment proper.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
