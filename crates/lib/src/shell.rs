//! Shell command execution.
//!
//! The planner hands fully expanded command lines to a [`Shell`]. The
//! production implementation, [`SystemShell`], runs them through the platform
//! shell with the resolved variables layered over the inherited environment.

use std::future::Future;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::vars::Vars;

/// Options for a single command invocation.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions<'a> {
  /// Variables set for the command, on top of the inherited environment.
  pub env: &'a Vars,
}

impl<'a> RunOptions<'a> {
  /// Run with `env` and collect stdout and stderr.
  pub fn captured(env: &'a Vars) -> Self {
    Self { env }
  }
}

/// A command that could not be run or exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command failed with exit code {code:?}")]
pub struct ShellFailure {
  /// Exit code, if the process exited normally.
  pub code: Option<i32>,
  /// Whatever the command wrote before failing.
  pub output: String,
}

/// Executes command lines.
pub trait Shell {
  /// Run `command` and return its captured output.
  fn run(&self, command: &str, options: &RunOptions<'_>) -> impl Future<Output = Result<String, ShellFailure>> + Send;
}

/// Runs commands through `/bin/sh -c` (Unix) or `cmd.exe /C` (Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl SystemShell {
  pub fn new() -> Self {
    Self
  }
}

impl Shell for SystemShell {
  async fn run(&self, command: &str, options: &RunOptions<'_>) -> Result<String, ShellFailure> {
    info!(cmd = %command, "executing command");

    let (shell_cmd, shell_args) = get_shell();
    debug!(shell = %shell_cmd, vars = options.env.len(), "spawning process");

    let output = Command::new(shell_cmd)
      .args(shell_args)
      .arg(command)
      .envs(options.env.iter())
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .output()
      .await
      .map_err(spawn_failure)?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
      debug!(output = %text, "command output");
      return Err(ShellFailure {
        code: output.status.code(),
        output: text,
      });
    }

    Ok(text)
  }
}

fn spawn_failure(e: std::io::Error) -> ShellFailure {
  ShellFailure {
    code: None,
    output: format!("failed to spawn shell: {e}"),
  }
}

/// Get the shell command and arguments for the current platform.
fn get_shell() -> (&'static str, &'static [&'static str]) {
  #[cfg(unix)]
  {
    ("/bin/sh", &["-c"])
  }

  #[cfg(windows)]
  {
    ("cmd.exe", &["/C"])
  }
}
