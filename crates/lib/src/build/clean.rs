//! Removal of build products.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::deps::dep_file_path;
use crate::error::Result;
use crate::spec::Spec;

/// Delete every target, object and dependency file of `specs`.
///
/// Returns the paths that were actually removed. Files that are already gone
/// are skipped.
pub fn clean(specs: &[Spec]) -> Result<Vec<PathBuf>> {
  let mut removed = Vec::new();

  for spec in specs {
    let products = std::iter::once(spec.target.clone())
      .chain(spec.objects.iter().cloned())
      .chain(spec.objects.iter().map(|o| dep_file_path(o)));

    for path in products {
      match fs::remove_file(&path) {
        Ok(()) => {
          debug!(path = %path.display(), "removed");
          removed.push(path);
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
      }
    }
  }

  Ok(removed)
}
