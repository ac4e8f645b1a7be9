//! Compiler-generated dependency files.
//!
//! With `-MMD` the compiler writes `foo.d` next to `foo.o` containing a make
//! rule such as:
//!
//! ```text
//! c_src/foo.o: c_src/foo.c c_src/foo.h \
//!  /usr/include/stdio.h
//! ```
//!
//! The paths after the colon are the extra prerequisites of the object.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PortError, Result};

/// Path of the dependency file for an object (`foo.o` -> `foo.d`).
pub fn dep_file_path(object: &Path) -> PathBuf {
  object.with_extension("d")
}

/// Read the dependency set recorded for `object`.
///
/// A missing dependency file yields an empty set; compilers without
/// dependency output simply get no header tracking.
///
/// # Errors
///
/// Returns [`PortError::MalformedDepFile`] if the file does not start with
/// `<object>: `, and an I/O error if it exists but cannot be read.
pub fn read_deps(object: &Path) -> Result<BTreeSet<String>> {
  let path = dep_file_path(object);

  let content = match fs::read_to_string(&path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
    Err(e) => return Err(e.into()),
  };

  parse_deps(&object.to_string_lossy(), &content).ok_or_else(|| PortError::MalformedDepFile {
    path,
    expected: format!("{}: ", object.display()),
  })
}

/// Parse dependency file content for `object`.
///
/// Returns `None` if the content does not start with `<object>: `.
pub fn parse_deps(object: &str, content: &str) -> Option<BTreeSet<String>> {
  let rest = content.strip_prefix(object)?.strip_prefix(": ")?;

  // Escaped newlines are continuations; treat the backslash as whitespace.
  let deps = rest
    .replace("\\\r\n", " ")
    .replace("\\\n", " ")
    .split_whitespace()
    .map(str::to_string)
    .collect();

  Some(deps)
}
