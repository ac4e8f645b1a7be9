//! Location of the runtime's native interface headers and libraries.
//!
//! Port code compiles against two directories shipped with the runtime
//! installation: the interface library (`lib/erl_interface-<vsn>`) and the
//! emulator headers (`erts-<vsn>/include`). Both are required; a missing
//! directory is a configuration error.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PortError, Result};

/// Environment variable consulted when no runtime root is configured.
pub const RUNTIME_ROOT_ENV: &str = "PORTC_RUNTIME_ROOT";

/// Resolved runtime directories feeding `ERL_CFLAGS`, `ERL_EI_LIBDIR` and `ERL_LDFLAGS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDirs {
  /// `erl_interface-<vsn>/include`
  pub ei_include: PathBuf,
  /// `erl_interface-<vsn>/lib`
  pub ei_lib: PathBuf,
  /// `erts-<vsn>/include`
  pub erts_include: PathBuf,
}

impl RuntimeDirs {
  /// Locate the runtime directories under `root`.
  ///
  /// When several versions are installed the highest one wins.
  pub fn locate(root: &Path) -> Result<Self> {
    let ei_dir = newest_versioned_dir(&root.join("lib"), "erl_interface-").ok_or_else(|| {
      PortError::RuntimeNotFound {
        what: "erl_interface".to_string(),
        root: root.to_path_buf(),
      }
    })?;
    let erts_dir = newest_versioned_dir(root, "erts-").ok_or_else(|| PortError::RuntimeNotFound {
      what: "erts".to_string(),
      root: root.to_path_buf(),
    })?;

    let dirs = Self {
      ei_include: required_dir(ei_dir.join("include"), root)?,
      ei_lib: required_dir(ei_dir.join("lib"), root)?,
      erts_include: required_dir(erts_dir.join("include"), root)?,
    };
    debug!(?dirs, "located runtime directories");
    Ok(dirs)
  }

  /// Locate the runtime from an explicit root, falling back to `PORTC_RUNTIME_ROOT`.
  pub fn discover(root: Option<&Path>) -> Result<Self> {
    match root {
      Some(root) => Self::locate(root),
      None => {
        let root = std::env::var_os(RUNTIME_ROOT_ENV).map(PathBuf::from).ok_or_else(|| {
          PortError::Config(format!(
            "no runtime root configured; set runtime_root in the config or {RUNTIME_ROOT_ENV}"
          ))
        })?;
        Self::locate(&root)
      }
    }
  }
}

fn required_dir(path: PathBuf, root: &Path) -> Result<PathBuf> {
  if path.is_dir() {
    Ok(path)
  } else {
    Err(PortError::RuntimeNotFound {
      what: path.display().to_string(),
      root: root.to_path_buf(),
    })
  }
}

/// Find the subdirectory of `parent` named `<prefix><version>` with the highest version.
fn newest_versioned_dir(parent: &Path, prefix: &str) -> Option<PathBuf> {
  let entries = fs::read_dir(parent).ok()?;

  entries
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.path().is_dir())
    .filter_map(|entry| {
      let name = entry.file_name().to_string_lossy().into_owned();
      let version = name.strip_prefix(prefix)?.to_string();
      Some((version, entry.path()))
    })
    .max_by(|(a, _), (b, _)| compare_versions(a, b))
    .map(|(_, path)| path)
}

/// Compare dotted versions numerically where possible ("3.10" > "3.9").
fn compare_versions(a: &str, b: &str) -> Ordering {
  let mut left = a.split('.');
  let mut right = b.split('.');

  loop {
    match (left.next(), right.next()) {
      (None, None) => return Ordering::Equal,
      (Some(_), None) => return Ordering::Greater,
      (None, Some(_)) => return Ordering::Less,
      (Some(l), Some(r)) => {
        let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
          (Ok(l), Ok(r)) => l.cmp(&r),
          _ => l.cmp(r),
        };
        if ord != Ordering::Equal {
          return ord;
        }
      }
    }
  }
}
