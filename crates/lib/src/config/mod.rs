//! Project configuration.
//!
//! A project is described by a `stagebuild.toml` file at its root:
//!
//! ```toml
//! [project]
//! name = "demo"
//! stages = ["gen", "compile"]
//! consolidate = true
//!
//! [deps]
//! shared = "path:../shared"
//!
//! [stages.gen]
//! description = "Generate sources from the schema"
//! cmd = "./scripts/gen.sh"
//! sources = ["schema"]
//!
//! [consolidation]
//! cmd = "./scripts/index.sh"
//! ```
//!
//! The configuration is read once and threaded through explicitly; nothing in
//! the library consults process-wide state for it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::CONFIG_FILENAME;

/// Parsed `stagebuild.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
  pub project: ProjectSection,

  /// Declared dependencies: name -> source URL (`path:` or `git:`).
  #[serde(default)]
  pub deps: BTreeMap<String, String>,

  /// Command stage definitions, keyed by stage name.
  #[serde(default)]
  pub stages: BTreeMap<String, StageDef>,

  /// The consolidation stage, run after the pipeline when enabled.
  #[serde(default)]
  pub consolidation: Option<StageDef>,
}

/// The `[project]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
  #[serde(default)]
  pub name: Option<String>,

  /// Stage names, in the order they run.
  #[serde(default)]
  pub stages: Vec<String>,

  #[serde(default)]
  pub consolidate: bool,

  /// Self-contained build output. Implies consolidation.
  #[serde(default)]
  pub build_embedded: bool,

  /// Build directory, relative to the project root.
  #[serde(default)]
  pub build_path: Option<PathBuf>,

  /// Extra project configuration files, relative to the project root.
  #[serde(default)]
  pub watch: Vec<PathBuf>,
}

/// A command stage declared in `[stages.<name>]` or `[consolidation]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageDef {
  #[serde(default)]
  pub description: Option<String>,

  /// Shell command to run.
  pub cmd: String,

  /// Files or directories whose changes make the stage rerun.
  /// An empty list means the stage always runs.
  #[serde(default)]
  pub sources: Vec<PathBuf>,

  /// Manifest path, relative to the build path.
  #[serde(default)]
  pub manifest: Option<PathBuf>,

  /// Working directory, relative to the project root.
  #[serde(default)]
  pub cwd: Option<PathBuf>,

  #[serde(default)]
  pub env: BTreeMap<String, String>,

  /// Shell override (defaults to `/bin/sh` on Unix, PowerShell on Windows).
  #[serde(default)]
  pub shell: Option<String>,
}

/// Errors that can occur when loading a project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {}", .path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read config file {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config file {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

impl ProjectConfig {
  /// Load and parse a configuration file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ConfigError::NotFound {
          path: path.to_path_buf(),
        });
      }
      Err(e) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), stages = config.project.stages.len(), "loaded config");
    Ok(config)
  }

  pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }

  /// Whether the consolidation stage should run after a pipeline that did work.
  pub fn consolidation_enabled(&self) -> bool {
    self.project.consolidate || self.project.build_embedded
  }

  /// Configuration files of this project: the config file itself plus the
  /// `watch` entries, resolved against `root`.
  pub fn config_files(&self, root: &Path) -> Vec<PathBuf> {
    let mut files = vec![root.join(CONFIG_FILENAME)];
    files.extend(self.project.watch.iter().map(|p| root.join(p)));
    files
  }
}

/// Find the config file path.
///
/// Priority order:
/// 1. Explicit path if provided (a directory is searched for `stagebuild.toml`)
/// 2. `./stagebuild.toml` in the current directory
pub fn find_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
  let candidate = match explicit {
    Some(path) if path.is_dir() => path.join(CONFIG_FILENAME),
    Some(path) => path.to_path_buf(),
    None => PathBuf::from(".").join(CONFIG_FILENAME),
  };

  if candidate.is_file() {
    Ok(candidate)
  } else {
    Err(ConfigError::NotFound { path: candidate })
  }
}
