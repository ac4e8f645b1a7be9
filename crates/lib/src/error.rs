//! Error types for port compilation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving the environment or building ports.
///
/// Every variant is fatal: the build stops at the first error and nothing
/// that was already produced is cleaned up.
#[derive(Debug, Error)]
pub enum PortError {
  /// The project configuration is unusable.
  #[error("invalid configuration: {0}")]
  Config(String),

  /// A platform pattern in a `port_env` or `port_specs` entry is not a valid regex.
  #[error("invalid platform pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: regex::Error,
  },

  /// A required runtime library directory could not be located.
  #[error("unable to find {what} under {root}")]
  RuntimeNotFound { what: String, root: PathBuf },

  /// Variable expansion did not settle within the pass limit.
  #[error("max expansion reached for env vars after {passes} passes (pending: {pending})")]
  ExpansionLimit { passes: usize, pending: String },

  /// A dependency file does not start with `<object>: `.
  #[error("malformed dependency file {path}: expected it to start with '{expected}'")]
  MalformedDepFile { path: PathBuf, expected: String },

  /// A command template is not defined in the environment.
  #[error("template {0} is not defined in the environment")]
  MissingTemplate(String),

  /// The compiler exited with a failure.
  #[error("failed to compile {source_path}:\n{output}")]
  CompileFailed { source_path: String, output: String },

  /// The linker exited with a failure.
  #[error("failed to link {target} (exit code {code:?}):\n{output}")]
  LinkFailed {
    target: String,
    code: Option<i32>,
    output: String,
  },

  /// I/O error.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The configuration file is not valid TOML or has the wrong shape.
  #[error("failed to parse config: {0}")]
  Toml(#[from] toml::de::Error),

  /// A source wildcard is malformed.
  #[error("invalid source pattern: {0}")]
  Glob(#[from] glob::PatternError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PortError>;
