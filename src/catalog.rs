//! Catalog client: fetch the installable model records from the backend,
//! filtered by the host's CUDA version.

use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::cuda;
use crate::exec::ExecService;

/// One installable model image. Created by the catalog service, immutable
/// once fetched; the port is the host side of the container port mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    pub display_name: String,
    pub docker_image: String,
    pub container_name: String,
    pub port: String,
}

/// Fetch the ordered model list for this host. Never errors: any failure
/// (no CUDA, unconfigured backend, HTTP or decode problems) yields an empty
/// list, which the presentation layer renders as "nothing installable".
pub fn fetch_models(exec: &ExecService, backend: &BackendConfig) -> Vec<Model> {
    let version = match cuda::check_requirements(exec) {
        Some(v) => v,
        None => {
            tracing::info!("no usable CUDA installation detected; catalog is empty");
            return Vec::new();
        }
    };
    fetch_models_for_cuda(backend, &version)
}

pub fn fetch_models_for_cuda(backend: &BackendConfig, cuda_version: &str) -> Vec<Model> {
    if !backend.is_configured() {
        tracing::warn!("backend URL/key not configured; catalog is empty");
        return Vec::new();
    }

    let url = models_endpoint(&backend.url, cuda_version);
    tracing::debug!(url = %url, "fetching model catalog");

    let client = match reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to build catalog http client");
            return Vec::new();
        }
    };

    let response = client
        .get(&url)
        .header("apikey", &backend.anon_key)
        .header("Authorization", format!("Bearer {}", backend.anon_key))
        .send();

    match response.and_then(|r| r.error_for_status()) {
        Ok(r) => match r.json::<Vec<Model>>() {
            Ok(models) => {
                tracing::info!(count = models.len(), cuda_version, "fetched model catalog");
                models
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to decode model catalog");
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "model catalog request failed");
            Vec::new()
        }
    }
}

/// REST endpoint for the models table, filtered by exact CUDA version.
pub(crate) fn models_endpoint(base_url: &str, cuda_version: &str) -> String {
    format!(
        "{}/rest/v1/models?select=*&cuda_version=eq.{}",
        base_url.trim_end_matches('/'),
        cuda_version
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_trailing_slash() {
        assert_eq!(
            models_endpoint("https://backend.example.com/", "12.4"),
            "https://backend.example.com/rest/v1/models?select=*&cuda_version=eq.12.4"
        );
        assert_eq!(
            models_endpoint("https://backend.example.com", "11.8"),
            "https://backend.example.com/rest/v1/models?select=*&cuda_version=eq.11.8"
        );
    }

    #[test]
    fn model_record_round_trips_snake_case_fields() {
        let raw = r#"{"id":7,"display_name":"Demo","docker_image":"demo/model:1","container_name":"demo-model","port":"8080"}"#;
        let m: Model = serde_json::from_str(raw).expect("decode");
        assert_eq!(m.docker_image, "demo/model:1");
        assert_eq!(m.port, "8080");
    }

    #[test]
    fn unconfigured_backend_yields_empty_list() {
        let backend = BackendConfig::default();
        assert!(fetch_models_for_cuda(&backend, "12.4").is_empty());
    }
}
