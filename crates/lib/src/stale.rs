//! Modification-time based staleness decisions.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

/// Modification time of `path`, or `None` if it does not exist or cannot be read.
pub fn last_modified(path: &Path) -> Option<SystemTime> {
  fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Decide whether `output` must be rebuilt from `prerequisites`.
///
/// With no prerequisites the output is rebuilt only if it is missing.
/// Otherwise it is rebuilt if it is missing or if the newest prerequisite is
/// at least as new as the output. Equal timestamps rebuild, since filesystems
/// with coarse mtimes cannot tell which write came last. Missing
/// prerequisites count as infinitely old.
pub fn needs_rebuild<P: AsRef<Path>>(output: &Path, prerequisites: &[P]) -> bool {
  let Some(output_mtime) = last_modified(output) else {
    debug!(output = %output.display(), "output missing");
    return true;
  };

  let newest = prerequisites.iter().filter_map(|p| last_modified(p.as_ref())).max();

  match newest {
    Some(newest) => newest >= output_mtime,
    None => false,
  }
}
