//! Lock manifest staleness.
//!
//! The lock manifest (`<build_path>/.stagebuild.lock`) is a timestamp-only
//! file recording when the dependency state was last known good. Its content
//! is irrelevant; only its existence and modification time matter.
//!
//! Before any stage runs, every local (`path:`) dependency is checked: if the
//! newest of its configuration files, together with the watched stage
//! manifests, is strictly newer than the lock manifest, the lock manifest is
//! touched. Fetchable dependencies are never checked, their lock state is
//! owned by the fetch subsystem.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info};

use crate::deps::DependencyRecord;
use crate::manifest::ManifestSet;
use crate::util::mtime;

/// Errors that can occur while checking or touching the lock manifest.
#[derive(Debug, Error)]
pub enum LockError {
  /// Failed to read a modification time.
  #[error("failed to read modification time of {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to update the lock manifest.
  #[error("failed to touch lock manifest {}: {source}", .path.display())]
  Touch {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// The timestamp file representing the last verified dependency state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockManifest {
  path: PathBuf,
}

impl LockManifest {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Modification time of the lock manifest, `None` if it does not exist.
  pub fn last_modified(&self) -> Result<Option<SystemTime>, LockError> {
    mtime::last_modified(&self.path).map_err(|e| LockError::Read {
      path: self.path.clone(),
      source: e,
    })
  }

  /// Whether any local dependency's watched files are newer than the lock.
  ///
  /// For each non-fetchable dependency, the newest mtime among its
  /// configuration files and `watched` is compared against the lock manifest.
  /// Missing files are ignored; a missing lock manifest is older than any
  /// existing file. Stops at the first stale dependency.
  pub fn is_stale(&self, deps: &[DependencyRecord], watched: &ManifestSet) -> Result<bool, LockError> {
    let mut local = deps.iter().filter(|dep| !dep.is_fetchable()).peekable();
    if local.peek().is_none() {
      debug!("no local dependencies, lock is fresh");
      return Ok(false);
    }

    let lock_mtime = self.last_modified()?;
    let watched_mtime = newest(watched.iter())?;

    for dep in local {
      let dep_mtime = newest(dep.config_files.iter().map(PathBuf::as_path))?.max(watched_mtime);
      if dep_mtime > lock_mtime {
        info!(dep = %dep.name, lock = %self.path.display(), "dependency changed since last lock");
        return Ok(true);
      }
    }

    Ok(false)
  }

  /// Set the lock manifest's modification time to now.
  ///
  /// Creates the file (and its parent directories) if needed.
  pub fn touch(&self) -> Result<(), LockError> {
    mtime::touch(&self.path).map_err(|e| LockError::Touch {
      path: self.path.clone(),
      source: e,
    })
  }

  /// Touch the lock manifest if it is stale. Returns whether it was touched.
  pub fn refresh_if_stale(&self, deps: &[DependencyRecord], watched: &ManifestSet) -> Result<bool, LockError> {
    if !self.is_stale(deps, watched)? {
      return Ok(false);
    }

    info!(path = %self.path.display(), "refreshing lock manifest");
    self.touch()?;
    Ok(true)
  }
}

fn newest<'a>(paths: impl Iterator<Item = &'a Path>) -> Result<Option<SystemTime>, LockError> {
  let mut newest = None;
  for path in paths {
    let modified = mtime::last_modified(path).map_err(|e| LockError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    newest = newest.max(modified);
  }
  Ok(newest)
}
