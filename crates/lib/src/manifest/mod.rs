//! Stage manifest sets.
//!
//! A manifest is a file a stage uses for its own incremental bookkeeping. The
//! orchestrator never reads or writes manifest contents; it only gathers the
//! paths so their modification times can take part in the lock staleness
//! check.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Deduplicated, sorted set of manifest paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSet {
  paths: BTreeSet<PathBuf>,
}

impl ManifestSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, path: &Path) -> bool {
    self.paths.contains(path)
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Path> {
    self.paths.iter().map(PathBuf::as_path)
  }
}

impl FromIterator<PathBuf> for ManifestSet {
  fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
    Self {
      paths: iter.into_iter().collect(),
    }
  }
}

impl<'a> IntoIterator for &'a ManifestSet {
  type Item = &'a PathBuf;
  type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

  fn into_iter(self) -> Self::IntoIter {
    self.paths.iter()
  }
}
