use anyhow::{Context, Result};

use portc_lib::build::clean;

use super::{Project, ProjectArgs};
use crate::output::{format_count, print_json, print_success, symbols};

pub fn cmd_clean(args: &ProjectArgs, json: bool) -> Result<()> {
  let project = Project::load(args)?;
  let removed = clean(&project.specs).context("Clean failed")?;

  if json {
    return print_json(&removed);
  }

  for path in &removed {
    println!("  {} {}", symbols::REMOVE, path.display());
  }
  print_success(&format!("Removed {}", format_count(removed.len(), "file")));
  Ok(())
}
