//! Host CUDA detection by parsing the `nvidia-smi` banner.

use crate::exec::{ExecRequest, ExecService};

#[derive(Debug, Clone)]
pub struct CudaVersionInfo {
    pub version: String,
    pub driver_version: Option<String>,
    pub installed: bool,
}

impl CudaVersionInfo {
    fn not_installed() -> Self {
        Self {
            version: "Unknown".to_string(),
            driver_version: None,
            installed: false,
        }
    }
}

/// Probe the installed CUDA version via `nvidia-smi`. A missing binary or an
/// unparseable banner degrades to "not installed" rather than erroring.
pub fn detect(exec: &ExecService) -> CudaVersionInfo {
    let out = match exec.run(ExecRequest::new("nvidia-smi")) {
        Ok(out) if out.success() => out,
        _ => return CudaVersionInfo::not_installed(),
    };

    match parse_smi_banner(&out.stdout) {
        Some((version, driver_version)) => CudaVersionInfo {
            version,
            driver_version,
            installed: true,
        },
        None => CudaVersionInfo::not_installed(),
    }
}

/// Return the CUDA version string when CUDA is installed and the version is
/// numeric; None otherwise. This is the gate for catalog filtering.
pub fn check_requirements(exec: &ExecService) -> Option<String> {
    let info = detect(exec);
    if !info.installed {
        return None;
    }
    // Accept only versions with a numeric leading component, e.g. "12.4".
    if info.version.split('.').next()?.parse::<u32>().is_err() {
        return None;
    }
    Some(info.version)
}

/// Pull "CUDA Version: X.Y" (and "Driver Version: X.Y" when present) out of
/// the nvidia-smi banner text.
pub(crate) fn parse_smi_banner(output: &str) -> Option<(String, Option<String>)> {
    let version = scan_labeled_version(output, "CUDA Version:")?;
    let driver = scan_labeled_version(output, "Driver Version:");
    Some((version, driver))
}

fn scan_labeled_version(output: &str, label: &str) -> Option<String> {
    let rest = &output[output.find(label)? + label.len()..];
    let rest = rest.trim_start();
    let version: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMI_BANNER: &str = "\
+-----------------------------------------------------------------------------+\n\
| NVIDIA-SMI 550.54.14    Driver Version: 550.54.14    CUDA Version: 12.4     |\n\
|-------------------------------+----------------------+----------------------+\n";

    #[test]
    fn parses_cuda_and_driver_versions() {
        let (cuda, driver) = parse_smi_banner(SMI_BANNER).expect("banner should parse");
        assert_eq!(cuda, "12.4");
        assert_eq!(driver.as_deref(), Some("550.54.14"));
    }

    #[test]
    fn missing_cuda_label_yields_none() {
        assert!(parse_smi_banner("No devices were found\n").is_none());
        assert!(parse_smi_banner("CUDA Version: n/a").is_none());
    }

    #[test]
    fn driver_version_is_optional() {
        let (cuda, driver) = parse_smi_banner("CUDA Version: 11.8 |").expect("parse");
        assert_eq!(cuda, "11.8");
        assert!(driver.is_none());
    }
}
