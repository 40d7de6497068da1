//! Modification-time helpers.
//!
//! Staleness in stagebuild is decided purely from file timestamps: a file that
//! does not exist contributes nothing, and a target that does not exist is
//! treated as older than anything on disk.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;
use walkdir::WalkDir;

/// Return the modification time of `path`, or `None` if it does not exist.
pub fn last_modified(path: &Path) -> io::Result<Option<SystemTime>> {
  match fs::metadata(path) {
    Ok(meta) => meta.modified().map(Some),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}

/// Return the newest modification time of any file under `root`.
///
/// `root` may be a plain file, in which case its own mtime is returned.
/// Symlinks are followed and count with their target's mtime; dangling links
/// are skipped.
pub fn newest_in_tree(root: &Path) -> io::Result<Option<SystemTime>> {
  if !root.exists() {
    return Ok(None);
  }

  let mut newest = None;
  for entry in WalkDir::new(root).follow_links(true) {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) if e.io_error().is_some_and(|io| io.kind() == io::ErrorKind::NotFound) => continue,
      Err(e) => return Err(io::Error::other(e)),
    };
    if entry.file_type().is_file() {
      let modified = entry.metadata().map_err(io::Error::other)?.modified()?;
      newest = newest.max(Some(modified));
    }
  }
  Ok(newest)
}

/// Set the modification time of `path` to now, creating it if absent.
///
/// Parent directories are created as needed. Existing content is preserved.
pub fn touch(path: &Path) -> io::Result<()> {
  touch_at(path, SystemTime::now())
}

/// Like [`touch`], but stamps `path` with `time` instead of now.
pub fn touch_at(path: &Path, time: SystemTime) -> io::Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent)?;
  }

  let file = File::options().create(true).append(true).open(path)?;
  file.set_modified(time)?;
  debug!(path = %path.display(), "touched");
  Ok(())
}
