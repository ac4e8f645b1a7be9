use std::fmt;

/// Operating system variants recognized in platform identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
  FreeBsd,
  Solaris,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      "freebsd" => Some(Self::FreeBsd),
      "solaris" | "illumos" => Some(Self::Solaris),
      _ => None,
    }
  }

  /// Returns the vendor-os part of the system architecture string
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "unknown-linux-gnu",
      Self::MacOs => "apple-darwin",
      Self::Windows => "win32",
      Self::FreeBsd => "unknown-freebsd",
      Self::Solaris => "pc-solaris2",
    }
  }

  /// Whether command templates use the MSVC flag syntax
  pub fn is_windows(&self) -> bool {
    matches!(self, Self::Windows)
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
