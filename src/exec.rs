use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::{ChildStderr, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use wait_timeout::ChildExt;

/// Structured command execution: capture stdout/stderr, surface exit status.
///
/// No timeout is applied unless one is set on the request or as a service
/// default; docker invocations run until completion by default. Output is
/// read concurrently with the wait, so a chatty child never blocks on a
/// full pipe.
#[derive(Debug, Clone, Default)]
pub struct ExecService {
    default_timeout: Option<Duration>,
}

impl ExecService {
    pub fn new() -> Self {
        Self {
            default_timeout: None,
        }
    }

    pub fn with_default_timeout(default_timeout: Duration) -> Self {
        Self {
            default_timeout: Some(default_timeout),
        }
    }

    pub fn run(&self, request: ExecRequest) -> Result<ExecOutput> {
        let mut cmd = Command::new(&request.program);
        for arg in &request.args {
            cmd.arg(arg);
        }

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        if request.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }

        let mut child = cmd.spawn().with_context(|| {
            format!(
                "failed to spawn {:?} with args {:?}",
                request.program, request.args
            )
        })?;

        if let Some(payload) = &request.stdin {
            if let Some(mut pipe) = child.stdin.take() {
                pipe.write_all(payload)
                    .context("failed to write process stdin")?;
                // Drop closes the pipe so the child sees EOF.
            }
        }

        // Drain both pipes on reader threads while waiting. Reading only
        // after wait() would deadlock once the child fills a pipe buffer.
        let stdout_reader = child.stdout.take().map(spawn_reader::<ChildStdout>);
        let stderr_reader = child.stderr.take().map(spawn_reader::<ChildStderr>);

        let timeout = request.timeout.or(self.default_timeout);
        let started = Instant::now();
        let status = match timeout {
            None => child.wait().context("failed to wait for process")?,
            Some(timeout) => match child
                .wait_timeout(timeout)
                .context("failed to wait with timeout")?
            {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    // Readers see EOF once the child is gone; reap them so
                    // the threads do not outlive the call.
                    if let Some(h) = stdout_reader {
                        let _ = join_reader(h);
                    }
                    if let Some(h) = stderr_reader {
                        let _ = join_reader(h);
                    }
                    return Err(anyhow!(
                        "command {:?} timed out after {:?}",
                        request.program,
                        timeout
                    ));
                }
            },
        };

        let duration = started.elapsed();
        let stdout = match stdout_reader {
            Some(h) => join_reader(h).context("failed to read process stdout")?,
            None => String::new(),
        };
        let stderr = match stderr_reader {
            Some(h) => join_reader(h).context("failed to read process stderr")?,
            None => String::new(),
        };

        Ok(ExecOutput {
            status,
            duration,
            stdout,
            stderr,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut stream: R) -> JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut buf = String::new();
        stream.read_to_string(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(handle: JoinHandle<std::io::Result<String>>) -> Result<String> {
    match handle.join() {
        Ok(read) => read.context("failed to read process output"),
        Err(_) => Err(anyhow!("process output reader thread panicked")),
    }
}

#[derive(Debug, Default)]
pub struct ExecRequest {
    program: OsString,
    args: Vec<OsString>,
    stdin: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl ExecRequest {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Feed the given bytes to the child's stdin (used for --password-stdin).
    pub fn stdin(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug)]
pub struct ExecOutput {
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}
