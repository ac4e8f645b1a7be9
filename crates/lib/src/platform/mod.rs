pub mod arch;
pub mod os;
pub mod runtime;

use arch::Arch;
use os::Os;
use regex::Regex;
use std::fmt;

use crate::error::{PortError, Result};

/// Platform combining architecture and OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  /// Create a new platform
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Returns the identifier platform patterns are matched against
  /// (e.g., "x86_64-unknown-linux-gnu-64", or "win32" on Windows)
  pub fn id(&self) -> PlatformId {
    if self.os.is_windows() {
      return PlatformId::new("win32");
    }
    PlatformId(format!("{}-{}-{}", self.arch, self.os, arch::wordsize()))
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.id())
  }
}

/// Architecture/OS identifier string used for platform pattern filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformId(String);

impl PlatformId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  /// Identifier of the running system.
  ///
  /// Unsupported systems fall back to `<arch>-<os>-<wordsize>` built from the
  /// compile-time constants so that patterns can still match on them.
  pub fn current() -> Self {
    match Platform::current() {
      Some(platform) => platform.id(),
      None => Self(format!(
        "{}-{}-{}",
        std::env::consts::ARCH,
        std::env::consts::OS,
        arch::wordsize()
      )),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Whether `pattern` (a regular expression) matches anywhere in this identifier.
  pub fn matches(&self, pattern: &str) -> Result<bool> {
    let re = Regex::new(pattern).map_err(|source| PortError::InvalidPattern {
      pattern: pattern.to_string(),
      source,
    })?;
    Ok(re.is_match(&self.0))
  }

  /// Whether templates for this platform use the MSVC flag syntax.
  pub fn is_windows(&self) -> bool {
    self.0.starts_with("win32")
  }
}

impl fmt::Display for PlatformId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
