use std::path::Path;

use tracing::{debug, info};

/// Remove a previous build directory.
///
/// Never fails: an absent directory or a removal error is logged and
/// ignored. Returns whether anything was removed.
pub fn clean(dir: &Path) -> bool {
  match std::fs::remove_dir_all(dir) {
    Ok(()) => {
      info!(path = %dir.display(), "removed previous build directory");
      true
    }
    Err(e) => {
      debug!(path = %dir.display(), error = %e, "could not remove build directory, continuing");
      false
    }
  }
}
