//! Environment template resolution.
//!
//! Builds the final variable set for a port build from four layers, lowest
//! priority first:
//!
//! 1. the process environment (minus excluded variables)
//! 2. the built-in defaults in [`defaults`], filtered by platform
//! 3. the `defines` override, then user `port_env` entries, filtered by platform
//! 4. per-spec extra overrides, filtered by platform
//!
//! and then expands `$NAME` / `${NAME}` cross references until the values
//! settle.

pub mod defaults;

use tracing::debug;

use crate::config::PortConfig;
use crate::error::{PortError, Result};
use crate::placeholder;
use crate::platform::PlatformId;
use crate::platform::runtime::RuntimeDirs;
use crate::vars::{self, VarEntry, VarPair, Vars};

/// Number of expansion passes after which resolution gives up.
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Resolves environments against a fixed default table and platform.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
  defaults: Vec<VarEntry>,
  defines: Vec<String>,
  platform: PlatformId,
}

impl TemplateResolver {
  pub fn new(defaults: Vec<VarEntry>, platform: PlatformId) -> Self {
    Self {
      defaults,
      defines: Vec::new(),
      platform,
    }
  }

  /// Resolver for a project: the runtime located from the config (or
  /// `PORTC_RUNTIME_ROOT`), the configured or detected platform, and the
  /// configured defines.
  pub fn for_config(config: &PortConfig) -> Result<Self> {
    let runtime = RuntimeDirs::discover(config.runtime_root.as_deref())?;
    let platform = config.platform_id();
    let defaults = defaults::default_env(&runtime, &platform);
    Ok(Self::new(defaults, platform).with_defines(config.defines.clone()))
  }

  /// Preprocessor defines appended to `ERL_CFLAGS` as `-D<define>`.
  pub fn with_defines(mut self, defines: Vec<String>) -> Self {
    self.defines = defines;
    self
  }

  pub fn platform(&self) -> &PlatformId {
    &self.platform
  }

  /// Resolve the final variables.
  ///
  /// # Errors
  ///
  /// Fails if a platform pattern is invalid or if expansion does not settle
  /// within the pass limit.
  pub fn resolve(
    &self,
    process_env: &[VarPair],
    user_overrides: &[VarEntry],
    extra_overrides: &[VarEntry],
  ) -> Result<Vars> {
    let defaults = vars::filter_by_platform(&self.defaults, &self.platform)?;

    let mut overrides = define_overrides(&self.defines);
    overrides.extend(vars::filter_by_platform(user_overrides, &self.platform)?);
    overrides.extend(vars::filter_by_platform(extra_overrides, &self.platform)?);

    let base = vars::apply_defaults(process_env, &defaults);
    let merged = vars::merge_sequential(base.into_iter().chain(overrides));

    let resolved = expand_vars(merged, DEFAULT_MAX_PASSES)?;
    debug!(platform = %self.platform, count = resolved.len(), "resolved environment");
    Ok(resolved)
  }
}

/// The `ERL_CFLAGS` override carrying preprocessor defines.
///
/// Always present, so an empty define list still yields `"$ERL_CFLAGS "`.
pub fn define_overrides(defines: &[String]) -> Vec<VarPair> {
  let flags = defines.iter().map(|d| format!("-D{d}")).collect::<Vec<_>>().join(" ");
  vec![("ERL_CFLAGS".to_string(), format!("$ERL_CFLAGS {flags}"))]
}

/// Expand cross references between variables until no value changes.
///
/// Each pass walks the pending names in order. All distinct defined names a
/// value references are substituted in one step and the new value is stored
/// right away. A value that changed, or that still refers to another defined
/// variable, is revisited in the next pass. References to undefined names are
/// left as they are.
///
/// # Errors
///
/// Returns [`PortError::ExpansionLimit`] when values are still pending after
/// `max_passes` passes; this is how reference cycles surface.
pub fn expand_vars(mut vars: Vars, max_passes: usize) -> Result<Vars> {
  let mut pending: Vec<String> = vars.keys().cloned().collect();
  let mut passes = 0;

  while !pending.is_empty() {
    if passes == max_passes {
      return Err(PortError::ExpansionLimit {
        passes,
        pending: pending.join(", "),
      });
    }
    passes += 1;

    let mut revisit = Vec::new();
    for name in pending {
      let value = vars[&name].clone();
      let names = placeholder::unique_references(&value);
      if names.is_empty() {
        continue;
      }

      let mut expanded = value.clone();
      for referenced in &names {
        if let Some(replacement) = vars.get(referenced) {
          expanded = placeholder::substitute(&expanded, referenced, replacement);
        }
      }

      if expanded != value {
        vars.insert(name.clone(), expanded);
        revisit.push(name);
      } else if refers_to_other_defined(&vars, &name, &expanded) {
        revisit.push(name);
      }
    }

    pending = revisit;
  }

  debug!(passes, "expansion settled");
  Ok(vars)
}

fn refers_to_other_defined(vars: &Vars, name: &str, value: &str) -> bool {
  placeholder::references(value).any(|r| r != name && vars.contains_key(&r))
}
