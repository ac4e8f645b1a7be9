//! Implementation of the `portc compile` command.

use std::io::{self, Write};

use anyhow::{Context, Result, anyhow};

use portc_lib::build::{BuildOptions, BuildReport, compile_and_link};
use portc_lib::error::PortError;
use portc_lib::shell::SystemShell;

use super::{Project, ProjectArgs};
use crate::output::{format_count, print_info, print_json, print_success};

/// Execute the compile command.
///
/// Compiler output streams to stdout as each source is compiled. With `json`
/// it goes to stderr instead and stdout carries only the build report.
pub fn cmd_compile(args: &ProjectArgs, json: bool) -> Result<()> {
  let project = Project::load(args)?;

  if project.specs.is_empty() {
    if json {
      return print_json(&BuildReport::default());
    }
    print_info("No port specs to build");
    return Ok(());
  }

  let base_dir = std::env::current_dir().context("Failed to read current directory")?;
  let options = BuildOptions::new(base_dir).with_relative_paths(project.config.keep_relative_paths);
  let shell = SystemShell::new();
  let mut console: Box<dyn Write> = if json {
    Box::new(io::stderr())
  } else {
    Box::new(io::stdout())
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(compile_and_link(&project.specs, &shell, &options, &mut console));
  console.flush()?;

  let report = match result {
    Ok(report) => report,
    // The compiler output has already been shown.
    Err(PortError::CompileFailed { source_path, .. }) => return Err(anyhow!("Failed to compile {source_path}")),
    Err(e) => return Err(e).context("Build failed"),
  };

  if json {
    return print_json(&report);
  }

  if report.is_noop() {
    print_info("Everything is up to date");
  } else {
    print_success(&format!(
      "Compiled {}, linked {}",
      format_count(report.compiled.len(), "object"),
      format_count(report.linked.len(), "target")
    ));
  }

  Ok(())
}
