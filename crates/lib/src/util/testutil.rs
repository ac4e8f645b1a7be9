//! Test utilities for portc-lib.
//!
//! Helpers for tests that need controlled modification times or a shell that
//! records commands instead of running a compiler.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::shell::{RunOptions, Shell, ShellFailure};

/// A fixed point in time, `secs` seconds after an arbitrary epoch.
pub fn at(secs: u64) -> SystemTime {
  SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
}

/// Create `path` (and its parents) if needed and set its modification time.
pub fn touch(path: &Path, mtime: SystemTime) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  if !path.exists() {
    fs::write(path, "").unwrap();
  }
  File::options().write(true).open(path).unwrap().set_modified(mtime).unwrap();
}

/// A [`Shell`] that records every command and creates the file named after
/// the last `-o` argument, stamped with a fresh modification time.
///
/// Commands containing `fail_on` fail with `failure_output`.
#[derive(Debug, Default)]
pub struct RecordingShell {
  commands: Mutex<Vec<String>>,
  clock: Mutex<u64>,
  fail_on: Option<String>,
  failure_output: String,
}

impl RecordingShell {
  /// Outputs are stamped starting at `at(start)`, one second apart.
  pub fn starting_at(start: u64) -> Self {
    Self {
      clock: Mutex::new(start),
      ..Default::default()
    }
  }

  pub fn failing_on(mut self, needle: &str, output: &str) -> Self {
    self.fail_on = Some(needle.to_string());
    self.failure_output = output.to_string();
    self
  }

  pub fn commands(&self) -> Vec<String> {
    self.commands.lock().unwrap().clone()
  }

  /// Forget recorded commands; the clock keeps running.
  pub fn clear(&self) {
    self.commands.lock().unwrap().clear();
  }
}

impl Shell for RecordingShell {
  async fn run(&self, command: &str, _options: &RunOptions<'_>) -> Result<String, ShellFailure> {
    self.commands.lock().unwrap().push(command.to_string());

    if let Some(needle) = &self.fail_on
      && command.contains(needle.as_str())
    {
      return Err(ShellFailure {
        code: Some(1),
        output: self.failure_output.clone(),
      });
    }

    let words: Vec<&str> = command.split_whitespace().collect();
    if let Some(pos) = words.iter().rposition(|w| *w == "-o")
      && let Some(out) = words.get(pos + 1)
    {
      let mut clock = self.clock.lock().unwrap();
      *clock += 1;
      touch(Path::new(out), at(*clock));
    }

    Ok(String::new())
  }
}
