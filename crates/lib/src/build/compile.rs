//! Compile phase: bring every object up to date with its source and headers.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::build::command::expand_command;
use crate::build::{BuildOptions, BuildReport};
use crate::deps::read_deps;
use crate::error::{PortError, Result};
use crate::shell::{RunOptions, Shell};
use crate::spec::{SourceLang, Spec, object_path};
use crate::stale::needs_rebuild;

/// Compile every stale source of every spec, in order.
///
/// Objects built here are appended to `report.compiled`; a source shared by
/// several specs is compiled at most once per run. Stops at the first
/// compiler failure.
pub async fn compile_sources<S, W>(
  specs: &[Spec],
  shell: &S,
  options: &BuildOptions,
  console: &mut W,
  report: &mut BuildReport,
) -> Result<()>
where
  S: Shell,
  W: Write,
{
  for spec in specs {
    for source in &spec.sources {
      let object = object_path(source);
      if report.compiled.contains(&object) || report.skipped_sources.contains(source) {
        continue;
      }

      if !needs_compile(source, &object)? {
        info!(source = %source.display(), "Skipping");
        report.skipped_sources.push(source.clone());
        continue;
      }

      let template = spec.target_type.compile_template(SourceLang::of(source));
      let command = expand_command(
        template,
        &spec.env,
        &source.to_string_lossy(),
        &object.to_string_lossy(),
      )?;

      match shell.run(&command, &RunOptions::captured(&spec.env)).await {
        Ok(output) => {
          writeln!(console, "Compiling {}", source.display())?;
          write!(console, "{output}")?;
          report.compiled.push(object);
        }
        Err(failure) => {
          let shown = options.display_path(source);
          let output = rewrite_source_path(&failure.output, source, &shown);
          writeln!(console, "Compiling {}", shown.display())?;
          write!(console, "{output}")?;
          return Err(PortError::CompileFailed {
            source_path: shown.display().to_string(),
            output,
          });
        }
      }
    }
  }

  Ok(())
}

/// An object is stale if it is missing or older than its source or any
/// dependency recorded in its `.d` file.
fn needs_compile(source: &Path, object: &Path) -> Result<bool> {
  let mut prerequisites: Vec<PathBuf> = vec![source.to_path_buf()];
  prerequisites.extend(read_deps(object)?.into_iter().map(PathBuf::from));
  debug!(object = %object.display(), prerequisites = prerequisites.len(), "checking object");
  Ok(needs_rebuild(object, &prerequisites))
}

/// Replace mentions of `source` in compiler output with `shown`.
///
/// Only whole path mentions are replaced: a match preceded by a path
/// character is part of a longer path, such as one already absolute.
fn rewrite_source_path(output: &str, source: &Path, shown: &Path) -> String {
  if source == shown {
    return output.to_string();
  }
  let source = source.to_string_lossy();
  let shown = shown.to_string_lossy();

  let mut rewritten = String::with_capacity(output.len());
  let mut copied = 0;
  for (start, _) in output.match_indices(&*source) {
    if output[..start].chars().next_back().is_some_and(is_path_char) {
      continue;
    }
    rewritten.push_str(&output[copied..start]);
    rewritten.push_str(&shown);
    copied = start + source.len();
  }
  rewritten.push_str(&output[copied..]);
  rewritten
}

fn is_path_char(c: char) -> bool {
  c.is_alphanumeric() || matches!(c, '/' | '\\' | '.' | '_' | '-' | '+')
}
