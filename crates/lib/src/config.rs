//! Project configuration (`portc.toml`).
//!
//! ```toml
//! app_name = "mylib"
//! defines = ["NDEBUG"]
//! port_env = [
//!   ["CFLAGS", "$CFLAGS -O2"],
//!   ["darwin", "LDFLAGS", "$LDFLAGS -flat_namespace"],
//! ]
//!
//! [[port_specs]]
//! target = "priv/mylib_drv.so"
//! sources = ["c_src/*.c"]
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::platform::PlatformId;
use crate::spec::TargetType;
use crate::vars::VarEntry;

/// Default config file name, looked up in the project directory.
pub const CONFIG_FILE: &str = "portc.toml";

/// Port compilation settings for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortConfig {
  /// Application name, used to name the default driver target.
  pub app_name: Option<String>,

  /// Runtime installation providing the native interface headers and libraries.
  pub runtime_root: Option<PathBuf>,

  /// Platform identifier to match patterns against instead of the detected one.
  pub platform: Option<String>,

  /// Preprocessor defines added to `ERL_CFLAGS`.
  pub defines: Vec<String>,

  /// Report compile errors with paths as given instead of absolute paths.
  pub keep_relative_paths: bool,

  /// Environment overrides applied to every spec.
  pub port_env: Vec<VarEntry>,

  pub port_specs: Vec<PortSpecConfig>,
}

/// One `[[port_specs]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortSpecConfig {
  pub target: PathBuf,

  /// Source paths or wildcards, relative to the working directory.
  pub sources: Vec<String>,

  /// Only build this spec where the pattern matches the platform identifier.
  #[serde(default)]
  pub arch: Option<String>,

  /// Extra environment overrides for this spec only.
  #[serde(default)]
  pub env: Vec<VarEntry>,

  /// Artifact kind; inferred from the target extension when omitted.
  #[serde(default, rename = "type")]
  pub target_type: Option<TargetType>,
}

impl PortConfig {
  /// Parse a config from TOML text.
  pub fn parse(content: &str) -> Result<Self> {
    Ok(toml::from_str(content)?)
  }

  /// Load the config at `path`.
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)?;
    let config = Self::parse(&content)?;
    debug!(path = %path.display(), specs = config.port_specs.len(), "loaded config");
    Ok(config)
  }

  /// Load the config at `path`, or the empty config if the file does not exist.
  pub fn load_or_default(path: &Path) -> Result<Self> {
    match fs::read_to_string(path) {
      Ok(content) => Self::parse(&content),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file, using defaults");
        Ok(Self::default())
      }
      Err(e) => Err(e.into()),
    }
  }

  /// The configured platform identifier, or the running system's.
  pub fn platform_id(&self) -> PlatformId {
    match &self.platform {
      Some(id) => PlatformId::new(id.clone()),
      None => PlatformId::current(),
    }
  }
}
