//! Dependency resolution.
//!
//! For each entry in `[deps]`:
//! - `path:` sources are expanded against the project root, canonicalized,
//!   and their configuration files collected (`stagebuild.toml` plus the
//!   dependency's own `project.watch` entries)
//! - `git:` sources are recorded as fetchable and left alone

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::DependencyRecord;
use super::source::{DepSource, SourceError, parse};
use crate::config::{ConfigError, ProjectConfig};
use crate::consts::CONFIG_FILENAME;
use crate::platform::paths::expand_path;

/// Errors that can occur during dependency resolution.
#[derive(Debug, Error)]
pub enum DepsError {
  /// Failed to parse a dependency URL.
  #[error("failed to parse dependency '{name}': {source}")]
  Parse {
    name: String,
    #[source]
    source: SourceError,
  },

  /// A local dependency's directory does not exist.
  #[error("dependency '{name}' path not found: {}", .path.display())]
  PathNotFound { name: String, path: PathBuf },

  /// A local dependency's directory could not be canonicalized.
  #[error("failed to resolve dependency '{name}' path {}: {source}", .path.display())]
  Canonicalize {
    name: String,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A local dependency has an unreadable configuration.
  #[error("failed to load config of dependency '{name}': {source}")]
  Config {
    name: String,
    #[source]
    source: ConfigError,
  },
}

/// Resolve every declared dependency of the project rooted at `project_root`.
///
/// Records are returned in name order.
pub fn resolve_deps(decls: &BTreeMap<String, String>, project_root: &Path) -> Result<Vec<DependencyRecord>, DepsError> {
  info!(count = decls.len(), "resolving dependencies");

  decls
    .iter()
    .map(|(name, url)| {
      debug!(name, url, "resolving dependency");

      let source = parse(url).map_err(|e| DepsError::Parse {
        name: name.clone(),
        source: e,
      })?;

      match source {
        DepSource::Path { path } => resolve_local(name, &path, project_root),
        DepSource::Git { url, rev } => Ok(DependencyRecord::git(name, &url, rev.as_deref())),
      }
    })
    .collect()
}

fn resolve_local(name: &str, path: &Path, project_root: &Path) -> Result<DependencyRecord, DepsError> {
  let expanded = expand_path(path, project_root);

  let root = dunce::canonicalize(&expanded).map_err(|e| {
    if e.kind() == std::io::ErrorKind::NotFound {
      DepsError::PathNotFound {
        name: name.to_string(),
        path: expanded.clone(),
      }
    } else {
      DepsError::Canonicalize {
        name: name.to_string(),
        path: expanded.clone(),
        source: e,
      }
    }
  })?;

  let config_path = root.join(CONFIG_FILENAME);
  let config_files = if config_path.is_file() {
    let config = ProjectConfig::load(&config_path).map_err(|e| DepsError::Config {
      name: name.to_string(),
      source: e,
    })?;
    config.config_files(&root)
  } else {
    vec![config_path]
  };

  debug!(name, root = %root.display(), files = config_files.len(), "resolved local dependency");
  Ok(DependencyRecord::local(name, &root, config_files))
}
