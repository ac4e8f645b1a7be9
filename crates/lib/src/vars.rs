//! Variable store and merge semantics.
//!
//! Environment values arrive from several layers (process environment,
//! built-in defaults, user overrides). This module holds the three merge
//! primitives the resolver is built from:
//!
//! - [`filter_by_platform`]: drop entries whose platform pattern does not match
//! - [`apply_defaults`]: combine the process environment with the defaults
//! - [`merge_sequential`]: fold an ordered list of pairs into one value per name

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Result;
use crate::placeholder;
use crate::platform::PlatformId;

/// Resolved variables, one value per name, ordered by name.
pub type Vars = BTreeMap<String, String>;

/// A single `(name, value)` pair as it flows through the merge steps.
pub type VarPair = (String, String);

/// An environment override, optionally restricted to matching platforms.
///
/// In configuration files this is a two-element `[name, value]` or
/// three-element `[pattern, name, value]` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub enum VarEntry {
  /// Applies on every platform.
  Unconditional { name: String, value: String },

  /// Applies only where `pattern` matches the platform identifier.
  Conditional {
    pattern: String,
    name: String,
    value: String,
  },
}

impl VarEntry {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self::Unconditional {
      name: name.into(),
      value: value.into(),
    }
  }

  pub fn on(pattern: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
    Self::Conditional {
      pattern: pattern.into(),
      name: name.into(),
      value: value.into(),
    }
  }
}

impl TryFrom<Vec<String>> for VarEntry {
  type Error = String;

  fn try_from(parts: Vec<String>) -> std::result::Result<Self, Self::Error> {
    let mut parts = parts.into_iter();
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
      (Some(name), Some(value), None, None) => Ok(Self::Unconditional { name, value }),
      (Some(pattern), Some(name), Some(value), None) => Ok(Self::Conditional { pattern, name, value }),
      _ => Err("env entries must be [name, value] or [pattern, name, value]".to_string()),
    }
  }
}

/// Keep unconditional entries and the conditional entries whose pattern
/// matches `platform`, preserving order.
///
/// # Errors
///
/// Returns an error if a pattern is not a valid regular expression.
pub fn filter_by_platform(entries: &[VarEntry], platform: &PlatformId) -> Result<Vec<VarPair>> {
  let mut kept = Vec::with_capacity(entries.len());

  for entry in entries {
    match entry {
      VarEntry::Unconditional { name, value } => kept.push((name.clone(), value.clone())),
      VarEntry::Conditional { pattern, name, value } => {
        if platform.matches(pattern)? {
          kept.push((name.clone(), value.clone()));
        }
      }
    }
  }

  Ok(kept)
}

/// Combine externally supplied values with compiled-in defaults.
///
/// Defaults are folded first so a later default for a name (typically a
/// platform-specific one) replaces an earlier one. Then, for each default:
///
/// - expandable default and the name is in `base`: the default's reference to
///   its own name is replaced by the base value
/// - expandable default and the name is not in `base`: the default is kept
///   as-is, its references are left for later passes
/// - plain default: the base value wins when present, otherwise the default
///
/// Names only present in `base` pass through unchanged.
pub fn apply_defaults(base: &[VarPair], defaults: &[VarPair]) -> Vec<VarPair> {
  let mut merged: Vars = base.iter().cloned().collect();
  let defaults: Vars = defaults.iter().cloned().collect();

  for (name, default) in defaults {
    let value = match merged.get(&name) {
      Some(external) if placeholder::is_expandable(&default) => placeholder::substitute(&default, &name, external),
      Some(external) => external.clone(),
      None => default,
    };
    merged.insert(name, value);
  }

  merged.into_iter().collect()
}

/// Fold an ordered sequence of pairs into one value per name.
///
/// A name's first occurrence expands its self-references to the empty
/// string; every later occurrence expands them to the value stored so far,
/// so `CFLAGS = "$CFLAGS -O2"` appends to an earlier `CFLAGS`.
pub fn merge_sequential(pairs: impl IntoIterator<Item = VarPair>) -> Vars {
  let mut vars = Vars::new();

  for (name, value) in pairs {
    let expanded = match vars.get(&name) {
      None => placeholder::substitute(&value, &name, ""),
      Some(previous) => placeholder::substitute(&value, &name, previous),
    };
    vars.insert(name, expanded);
  }

  vars
}

/// Process environment variables that must not leak into port builds.
pub const EXCLUDED_OS_VARS: &[&str] = &["ERL_LIBS", "REBAR_DEPS_DIR"];

/// Whether a process environment variable is inherited by the build environment.
pub fn is_inherited(name: &str) -> bool {
  !name.is_empty() && !EXCLUDED_OS_VARS.contains(&name)
}

/// Ingest process environment pairs, dropping excluded and nameless entries.
pub fn ingest_os_env(vars: impl IntoIterator<Item = VarPair>) -> Vec<VarPair> {
  vars.into_iter().filter(|(name, _)| is_inherited(name)).collect()
}

/// The current process environment, filtered by [`ingest_os_env`].
///
/// Variables whose name or value is not valid Unicode are skipped.
pub fn os_env() -> Vec<VarPair> {
  ingest_os_env(
    std::env::vars_os().filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?))),
  )
}
