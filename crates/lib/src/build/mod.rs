//! Build planner.
//!
//! Builds run in two sequential phases:
//!
//! 1. **Compile**: every source whose object is missing or older than the
//!    source or one of its recorded dependencies is recompiled.
//! 2. **Link**: every target that is missing, or that has an object rebuilt in
//!    phase 1, is relinked from all of its objects.
//!
//! The first failing command aborts the build. Products written before the
//! failure are left in place.

mod clean;
mod command;
mod compile;
mod link;

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::shell::Shell;
use crate::spec::Spec;

pub use clean::clean;
pub use command::expand_command;

/// Settings that affect how a build reports its work.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  /// Directory relative source paths are resolved against in error reports.
  pub base_dir: PathBuf,
  /// Report compile errors with source paths exactly as configured.
  pub keep_relative_paths: bool,
}

impl BuildOptions {
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
      keep_relative_paths: false,
    }
  }

  pub fn with_relative_paths(mut self, keep: bool) -> Self {
    self.keep_relative_paths = keep;
    self
  }

  /// How `source` is shown when its compilation fails.
  pub fn display_path(&self, source: &Path) -> PathBuf {
    if self.keep_relative_paths || source.is_absolute() {
      source.to_path_buf()
    } else {
      self.base_dir.join(source)
    }
  }
}

/// What a build did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  /// Objects compiled in this run.
  pub compiled: Vec<PathBuf>,
  /// Targets linked in this run.
  pub linked: Vec<PathBuf>,
  /// Sources whose objects were up to date.
  pub skipped_sources: Vec<PathBuf>,
  /// Targets that were up to date.
  pub skipped_links: Vec<PathBuf>,
}

impl BuildReport {
  /// True if no command was run.
  pub fn is_noop(&self) -> bool {
    self.compiled.is_empty() && self.linked.is_empty()
  }
}

/// Compile and link `specs`.
///
/// Compiler output, and the "Compiling" line for each compiled source, is
/// written to `console`.
pub async fn compile_and_link<S, W>(specs: &[Spec], shell: &S, options: &BuildOptions, console: &mut W) -> Result<BuildReport>
where
  S: Shell,
  W: Write,
{
  let mut report = BuildReport::default();

  compile::compile_sources(specs, shell, options, console, &mut report).await?;
  link::link_targets(specs, shell, console, &mut report).await?;

  info!(
    compiled = report.compiled.len(),
    linked = report.linked.len(),
    "build finished"
  );
  Ok(report)
}
