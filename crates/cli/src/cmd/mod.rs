mod clean;
mod compile;
mod env;
mod info;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use portc_lib::config::{CONFIG_FILE, PortConfig};
use portc_lib::env::TemplateResolver;
use portc_lib::spec::{Spec, build_specs};
use portc_lib::vars;

pub use clean::cmd_clean;
pub use compile::cmd_compile;
pub use env::cmd_env;
pub use info::cmd_info;

/// Where the project config lives and the settings the command line overrides.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
  /// Path to the project config; paths inside it are relative to the working directory
  #[arg(short, long, global = true, default_value = CONFIG_FILE)]
  pub config: PathBuf,

  /// Platform identifier to match patterns against (default: detected)
  #[arg(long, global = true)]
  pub platform: Option<String>,

  /// Runtime installation with erl_interface and erts headers
  #[arg(long, global = true, value_name = "DIR")]
  pub runtime_root: Option<PathBuf>,

  /// Report compile errors with source paths as configured
  #[arg(long, global = true)]
  pub relative: bool,
}

impl ProjectArgs {
  /// Load the config file, if any, with command line overrides applied.
  pub fn load_config(&self) -> Result<PortConfig> {
    let mut config = PortConfig::load_or_default(&self.config)
      .with_context(|| format!("Failed to load {}", self.config.display()))?;

    if let Some(platform) = &self.platform {
      config.platform = Some(platform.clone());
    }
    if let Some(root) = &self.runtime_root {
      config.runtime_root = Some(root.clone());
    }
    if self.relative {
      config.keep_relative_paths = true;
    }

    Ok(config)
  }
}

/// A loaded project: its config, environment resolver and port specs.
pub struct Project {
  pub config: PortConfig,
  pub resolver: TemplateResolver,
  pub specs: Vec<Spec>,
}

impl Project {
  pub fn load(args: &ProjectArgs) -> Result<Self> {
    let config = args.load_config()?;
    let resolver = TemplateResolver::for_config(&config).context("Failed to set up the build environment")?;
    let specs = build_specs(&config, &resolver, &vars::os_env()).context("Failed to resolve port specs")?;
    debug!(platform = %resolver.platform(), specs = specs.len(), "loaded project");
    Ok(Self {
      config,
      resolver,
      specs,
    })
  }
}
