//! Implementation of the `portc env` command.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};

use portc_lib::vars::{self, Vars};

use super::{Project, ProjectArgs};

/// Print the resolved build environment, one `NAME=value` per line.
///
/// Without `spec` this is the environment shared by specs that have no
/// overrides of their own. Unless `all` is set, variables whose value is
/// exactly what the process environment already holds are left out.
pub fn cmd_env(args: &ProjectArgs, spec: Option<&str>, all: bool, json: bool) -> Result<()> {
  let project = Project::load(args)?;
  let process_env = vars::os_env();

  let resolved = match spec {
    Some(target) => match project.specs.iter().find(|s| s.target == Path::new(target)) {
      Some(spec) => spec.env.clone(),
      None => bail!("No port spec builds {target}"),
    },
    None => project
      .resolver
      .resolve(&process_env, &project.config.port_env, &[])
      .context("Failed to resolve environment")?,
  };

  let shown = if all {
    resolved
  } else {
    without_inherited(resolved, &process_env.into_iter().collect())
  };

  if json {
    return crate::output::print_json(&shown);
  }

  for (name, value) in &shown {
    println!("{name}={value}");
  }
  Ok(())
}

fn without_inherited(resolved: Vars, process: &BTreeMap<String, String>) -> Vars {
  resolved
    .into_iter()
    .filter(|(name, value)| process.get(name) != Some(value))
    .collect()
}
