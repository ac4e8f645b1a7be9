//! Shared helpers for library integration tests.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use portc_lib::shell::{RunOptions, Shell, ShellFailure};
use tempfile::TempDir;

/// A project directory with a fake runtime installation next to it.
pub struct TestProject {
  pub temp: TempDir,
}

impl TestProject {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    for dir in ["otp/lib/erl_interface-5.5/include", "otp/lib/erl_interface-5.5/lib", "otp/erts-14.2/include"] {
      fs::create_dir_all(temp.path().join(dir)).unwrap();
    }
    Self { temp }
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  pub fn runtime_root(&self) -> PathBuf {
    self.path("otp")
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative: &str, content: &str) {
    let path = self.path(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  pub fn set_mtime(&self, relative: &str, secs: u64) {
    set_mtime(&self.path(relative), secs);
  }
}

pub fn set_mtime(path: &Path, secs: u64) {
  let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs);
  File::options().write(true).open(path).unwrap().set_modified(mtime).unwrap();
}

/// Records commands and creates whatever file follows the last `-o`.
#[derive(Default)]
pub struct FakeCompiler {
  commands: Mutex<Vec<String>>,
  clock: Mutex<u64>,
}

impl FakeCompiler {
  pub fn starting_at(secs: u64) -> Self {
    Self {
      clock: Mutex::new(secs),
      ..Default::default()
    }
  }

  pub fn take_commands(&self) -> Vec<String> {
    std::mem::take(&mut *self.commands.lock().unwrap())
  }
}

impl Shell for FakeCompiler {
  async fn run(&self, command: &str, _options: &RunOptions<'_>) -> Result<String, ShellFailure> {
    self.commands.lock().unwrap().push(command.to_string());

    let words: Vec<&str> = command.split_whitespace().collect();
    if let Some(pos) = words.iter().rposition(|w| *w == "-o")
      && let Some(out) = words.get(pos + 1)
    {
      let path = Path::new(out);
      if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
      }
      fs::write(path, "").unwrap();
      let mut clock = self.clock.lock().unwrap();
      *clock += 1;
      set_mtime(path, *clock);
    }

    Ok(format!("ok {}\n", words.first().copied().unwrap_or_default()))
  }
}
