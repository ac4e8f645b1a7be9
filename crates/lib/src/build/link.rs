//! Link phase: relink targets whose objects changed or that are missing.

use std::io::Write;
use std::path::PathBuf;

use tokio::fs;
use tracing::info;

use crate::build::BuildReport;
use crate::build::command::expand_command;
use crate::error::{PortError, Result};
use crate::shell::{RunOptions, Shell};
use crate::spec::Spec;
use crate::stale::needs_rebuild;

/// Link every spec whose target is stale.
///
/// Only objects rebuilt in this run (`report.compiled`) count as link
/// prerequisites, so a target is relinked when it is missing or when one of
/// its objects was just recompiled.
pub async fn link_targets<S, W>(specs: &[Spec], shell: &S, console: &mut W, report: &mut BuildReport) -> Result<()>
where
  S: Shell,
  W: Write,
{
  for spec in specs {
    if let Some(parent) = spec.target.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).await?;
    }
  }

  for spec in specs {
    let rebuilt: Vec<&PathBuf> = spec.objects.iter().filter(|o| report.compiled.contains(o)).collect();

    if !needs_rebuild(&spec.target, &rebuilt) {
      info!(output = %spec.target.display(), "Skipping relink");
      report.skipped_links.push(spec.target.clone());
      continue;
    }

    let objects = spec
      .objects
      .iter()
      .map(|o| o.to_string_lossy().into_owned())
      .collect::<Vec<_>>()
      .join(" ");
    let command = expand_command(spec.link_template(), &spec.env, &objects, &spec.target.to_string_lossy())?;

    info!(output = %spec.target.display(), objects = spec.objects.len(), "linking");
    let output = shell
      .run(&command, &RunOptions::captured(&spec.env))
      .await
      .map_err(|failure| PortError::LinkFailed {
        target: spec.target.display().to_string(),
        code: failure.code,
        output: failure.output,
      })?;

    write!(console, "{output}")?;
    report.linked.push(spec.target.clone());
  }

  Ok(())
}
