//! Subprocess plumbing shared by the adapters.
//!
//! Two runners: a blocking one for the short-lived tools (`git`, `gh`,
//! `copier`) and an async one for the installer stage, where commands can
//! run for minutes and the dispatcher awaits them on the runtime.

use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {status}: {stderr}")]
    NonZero {
        program: String,
        status: i32,
        stderr: String,
    },
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

fn capture(program: &str, output: std::process::Output) -> CommandOutput {
    let out = CommandOutput {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };
    trace!(program, status = out.status, "subprocess finished");
    out
}

/// Run a command to completion, capturing output. Nonzero exit is not an
/// error here; callers that need that use [`run_checked`].
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput, ProcessError> {
    debug!(program, ?args, "running command");
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let output = cmd.output().map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })?;
    Ok(capture(program, output))
}

/// Like [`run`], but a nonzero exit becomes `ProcessError::NonZero`.
pub fn run_checked(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, ProcessError> {
    let output = run(program, args, cwd)?;
    if output.success() {
        Ok(output)
    } else {
        Err(ProcessError::NonZero {
            program: program.to_string(),
            status: output.status,
            stderr: output.stderr,
        })
    }
}

/// Async variant for the installer stage, with optional extra environment.
pub async fn run_async(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    env: &[(String, String)],
) -> Result<CommandOutput, ProcessError> {
    debug!(program, ?args, "running command (async)");
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    for (k, v) in env {
        cmd.env(k, v);
    }
    let output = cmd.output().await.map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })?;
    Ok(capture(program, output))
}

/// Run a shell pipeline asynchronously (`sh -c` on unix, `powershell` on
/// windows). Used only for the package-manager install script.
pub async fn run_shell_async(script: &str) -> Result<CommandOutput, ProcessError> {
    debug!(script, "running shell command (async)");
    let (shell, flag) = if cfg!(windows) {
        ("powershell", "-Command")
    } else {
        ("sh", "-c")
    };
    let output = tokio::process::Command::new(shell)
        .arg(flag)
        .arg(script)
        .output()
        .await
        .map_err(|source| ProcessError::Spawn {
            program: shell.to_string(),
            source,
        })?;
    Ok(capture(shell, output))
}

/// Retry `probe` until it returns true or `timeout` elapses. Returns
/// whether the probe ever succeeded.
pub fn poll_until<F>(timeout: Duration, interval: Duration, mut probe: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(interval);
    }
}
