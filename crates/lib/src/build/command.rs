//! Command line construction from templates.

use crate::env::defaults::{PORT_IN_FILES, PORT_OUT_FILE};
use crate::error::{PortError, Result};
use crate::placeholder;
use crate::vars::Vars;

/// Look up `template` in `env` and fill in its input and output placeholders.
///
/// Other references are left for the shell to expand.
pub fn expand_command(template: &str, env: &Vars, in_files: &str, out_file: &str) -> Result<String> {
  let command = env
    .get(template)
    .ok_or_else(|| PortError::MissingTemplate(template.to_string()))?;

  let command = placeholder::substitute(command, PORT_IN_FILES, in_files);
  Ok(placeholder::substitute(&command, PORT_OUT_FILE, out_file))
}
