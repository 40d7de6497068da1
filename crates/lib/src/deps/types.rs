//! Dependency record types.

use std::path::{Path, PathBuf};

use super::source::DepSource;

/// One declared dependency, as seen by the lock staleness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
  /// Name the dependency is declared under.
  pub name: String,

  /// Where the dependency comes from.
  pub source: DepSource,

  /// Project configuration files of a local dependency.
  ///
  /// Always empty for fetchable dependencies.
  pub config_files: Vec<PathBuf>,
}

impl DependencyRecord {
  /// A local, non-fetchable dependency rooted at `root`.
  pub fn local(name: &str, root: &Path, config_files: Vec<PathBuf>) -> Self {
    Self {
      name: name.to_string(),
      source: DepSource::Path {
        path: root.to_path_buf(),
      },
      config_files,
    }
  }

  /// A fetchable git dependency.
  pub fn git(name: &str, url: &str, rev: Option<&str>) -> Self {
    Self {
      name: name.to_string(),
      source: DepSource::Git {
        url: url.to_string(),
        rev: rev.map(str::to_string),
      },
      config_files: Vec::new(),
    }
  }

  pub fn is_fetchable(&self) -> bool {
    self.source.is_fetchable()
  }

  /// Root directory of a local dependency.
  pub fn root(&self) -> Option<&Path> {
    match &self.source {
      DepSource::Path { path } => Some(path),
      DepSource::Git { .. } => None,
    }
  }
}
