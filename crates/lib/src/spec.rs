//! Port specs: what to compile and what to link it into.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{PortConfig, PortSpecConfig};
use crate::env::TemplateResolver;
use crate::env::defaults::{
  DRV_CC_TEMPLATE, DRV_CXX_TEMPLATE, DRV_LINK_TEMPLATE, EXE_CC_TEMPLATE, EXE_CXX_TEMPLATE, EXE_LINK_TEMPLATE,
};
use crate::error::{PortError, Result};
use crate::vars::{VarPair, Vars};

/// Source extensions compiled with `$CXX`; everything else uses `$CC`.
pub const CXX_EXTENSIONS: &[&str] = &["cc", "cp", "cxx", "cpp", "CPP", "c++", "C"];

/// Sources used by the default spec when none are configured.
pub const DEFAULT_SOURCES: &[&str] = &["c_src/*.c", "c_src/*.cc", "c_src/*.cpp"];

/// The two artifact kinds a spec can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
  /// Dynamically loaded shared object
  Drv,
  /// Standalone executable
  Exe,
}

impl TargetType {
  /// Infer the artifact kind from a target path's extension.
  ///
  /// `.so` and `.dll` are drivers, no extension or `.exe` is an executable.
  pub fn from_target(target: &Path) -> Option<Self> {
    match target.extension().and_then(|ext| ext.to_str()) {
      Some("so") | Some("dll") => Some(Self::Drv),
      Some("exe") | None => Some(Self::Exe),
      Some(_) => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Drv => "drv",
      Self::Exe => "exe",
    }
  }

  /// Name of the template that links this kind of artifact.
  pub fn link_template(&self) -> &'static str {
    match self {
      Self::Drv => DRV_LINK_TEMPLATE,
      Self::Exe => EXE_LINK_TEMPLATE,
    }
  }

  /// Name of the template that compiles a source in `lang` for this kind of artifact.
  pub fn compile_template(&self, lang: SourceLang) -> &'static str {
    match (self, lang) {
      (Self::Drv, SourceLang::C) => DRV_CC_TEMPLATE,
      (Self::Drv, SourceLang::Cxx) => DRV_CXX_TEMPLATE,
      (Self::Exe, SourceLang::C) => EXE_CC_TEMPLATE,
      (Self::Exe, SourceLang::Cxx) => EXE_CXX_TEMPLATE,
    }
  }
}

impl fmt::Display for TargetType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Source language, which selects the compiler variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLang {
  C,
  Cxx,
}

impl SourceLang {
  pub fn of(source: &Path) -> Self {
    match source.extension().and_then(|ext| ext.to_str()) {
      Some(ext) if CXX_EXTENSIONS.contains(&ext) => Self::Cxx,
      _ => Self::C,
    }
  }
}

/// Object file produced from a source (`c_src/foo.c` -> `c_src/foo.o`).
pub fn object_path(source: &Path) -> PathBuf {
  source.with_extension("o")
}

/// One compilation unit: sources, the artifact they link into, and the
/// environment their commands run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
  pub sources: Vec<PathBuf>,
  pub target: PathBuf,
  pub target_type: TargetType,
  /// Objects linked into the target, in source order.
  pub objects: Vec<PathBuf>,
  pub env: Vars,
}

impl Spec {
  /// Create a spec whose objects sit next to their sources.
  pub fn new(sources: Vec<PathBuf>, target: impl Into<PathBuf>, target_type: TargetType, env: Vars) -> Self {
    let objects = sources.iter().map(|s| object_path(s)).collect();
    Self {
      sources,
      target: target.into(),
      target_type,
      objects,
      env,
    }
  }

  /// Template used to link this spec's target.
  ///
  /// The kind inferred from the target path wins; targets with other
  /// extensions fall back to the declared type.
  pub fn link_template(&self) -> &'static str {
    TargetType::from_target(&self.target)
      .unwrap_or(self.target_type)
      .link_template()
  }
}

/// Build the specs described by `config`.
///
/// Entries whose `arch` pattern does not match the resolver's platform are
/// dropped. Specs with their own `env` get a dedicated resolution with those
/// entries as extra overrides; the others share one resolution. When no specs
/// are configured and `app_name` is set, the default driver spec is used.
pub fn build_specs(config: &PortConfig, resolver: &TemplateResolver, process_env: &[VarPair]) -> Result<Vec<Spec>> {
  let entries: Vec<PortSpecConfig> = if config.port_specs.is_empty() {
    default_spec_config(config, resolver).into_iter().collect()
  } else {
    config.port_specs.clone()
  };

  let mut shared_env: Option<Vars> = None;
  let mut specs = Vec::new();

  for entry in &entries {
    if let Some(pattern) = &entry.arch
      && !resolver.platform().matches(pattern)?
    {
      info!(output = %entry.target.display(), pattern = %pattern, "skipping spec for other platform");
      continue;
    }

    let sources = expand_sources(&entry.sources)?;
    if sources.is_empty() {
      info!(output = %entry.target.display(), "no sources matched, skipping spec");
      continue;
    }

    let target_type = match entry.target_type {
      Some(declared) => declared,
      None => TargetType::from_target(&entry.target).ok_or_else(|| {
        PortError::Config(format!(
          "cannot infer target type of {}; set type = \"drv\" or \"exe\"",
          entry.target.display()
        ))
      })?,
    };

    let env = if entry.env.is_empty() {
      match &shared_env {
        Some(env) => env.clone(),
        None => {
          let env = resolver.resolve(process_env, &config.port_env, &[])?;
          shared_env = Some(env.clone());
          env
        }
      }
    } else {
      resolver.resolve(process_env, &config.port_env, &entry.env)?
    };

    debug!(output = %entry.target.display(), sources = sources.len(), "built spec");
    specs.push(Spec::new(sources, &entry.target, target_type, env));
  }

  Ok(specs)
}

/// The spec used when a project configures none: every C/C++ file in
/// `c_src/` linked into `priv/<app_name>_drv.so` (`.dll` on Windows).
fn default_spec_config(config: &PortConfig, resolver: &TemplateResolver) -> Option<PortSpecConfig> {
  let app_name = config.app_name.as_ref()?;
  let ext = if resolver.platform().is_windows() { "dll" } else { "so" };

  Some(PortSpecConfig {
    target: PathBuf::from("priv").join(format!("{app_name}_drv.{ext}")),
    sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
    arch: None,
    env: Vec::new(),
    target_type: Some(TargetType::Drv),
  })
}

/// Expand source wildcards, keeping the first occurrence of each path.
fn expand_sources(patterns: &[String]) -> Result<Vec<PathBuf>> {
  let mut sources: Vec<PathBuf> = Vec::new();

  for pattern in patterns {
    for path in glob::glob(pattern)?.filter_map(|entry| entry.ok()) {
      if !sources.contains(&path) {
        sources.push(path);
      }
    }
  }

  Ok(sources)
}
