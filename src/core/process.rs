//! Process execution utilities
//!
//! Runs the downloader through `sh -c` and captures both output streams.
//! The download itself has no timeout; only short probes such as
//! `--version` go through [`run_with_timeout`].

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::core::error::{AppError, AppResult};

/// Captured result of a finished shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, as a user would see it in a terminal
    pub fn combined(&self) -> String {
        match (self.stdout.trim_end().is_empty(), self.stderr.trim_end().is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr.trim_end()),
            (false, true) => self.stdout.trim_end().to_string(),
            (true, false) => self.stderr.trim_end().to_string(),
            (true, true) => String::new(),
        }
    }

    /// Last non-empty line of stdout
    pub fn last_stdout_line(&self) -> Option<&str> {
        self.stdout.lines().map(str::trim).filter(|line| !line.is_empty()).last()
    }
}

impl From<Output> for ShellOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs `command_line` through `sh -c` inside `cwd` and waits for it
///
/// A non-zero exit is not an error here; only a failure to start the shell is.
pub async fn run_shell(command_line: &str, cwd: &Path) -> AppResult<ShellOutput> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .await?;

    Ok(output.into())
}

/// Run an async Command with a timeout.
///
/// Returns the process Output on success, or an AppError on timeout/IO failure.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> AppResult<Output> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(AppError::Io(e)),
        Err(_) => Err(AppError::Download(format!(
            "Process timed out after {}s",
            timeout.as_secs()
        ))),
    }
}

/// Returns the trimmed `--version` output of a tool
pub async fn tool_version(tool: &Path, timeout: Duration) -> AppResult<String> {
    let mut cmd = Command::new(tool);
    cmd.arg("--version").stdin(Stdio::null()).kill_on_drop(true);

    let output: ShellOutput = run_with_timeout(&mut cmd, timeout).await?.into();
    if !output.success() {
        return Err(AppError::Download(format!(
            "{} --version exited with {:?}: {}",
            tool.display(),
            output.code,
            output.combined()
        )));
    }

    Ok(output.stdout.trim().to_string())
}
