#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A stub `docker` shell script that records every invocation to a log file
/// and responds according to the per-test case body it was built with.
pub struct FakeDocker {
    dir: TempDir,
    pub bin: PathBuf,
    pub log: PathBuf,
}

/// Build a fake docker binary. `case_body` is a set of `cmd)` branches for a
/// shell `case "$1" in ... esac`; unmatched subcommands exit 0 silently.
pub fn fake_docker(case_body: &str) -> FakeDocker {
    let dir = tempfile::tempdir().expect("tempdir for fake docker");
    let log = dir.path().join("invocations.log");
    let bin = dir.path().join("docker");
    let script = format!(
        "#!/bin/sh\nLOG=\"{}\"\necho \"$@\" >> \"$LOG\"\ncase \"$1\" in\n{}\nesac\nexit 0\n",
        log.display(),
        case_body
    );
    fs::write(&bin, script).expect("write fake docker script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).expect("chmod fake docker");
    }
    FakeDocker { dir, bin, log }
}

impl FakeDocker {
    /// Recorded invocations, one argv line per call.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn count_invocations_of(&self, subcommand: &str) -> usize {
        self.invocations()
            .iter()
            .filter(|line| line.split_whitespace().next() == Some(subcommand))
            .count()
    }
}
