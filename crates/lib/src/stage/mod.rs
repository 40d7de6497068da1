//! Build stages.
//!
//! A stage is one named unit of build work (a compiler pass, a code
//! generator, an asset bundler). The orchestrator knows nothing about what a
//! stage does; it only calls [`Stage::run`] and reads the manifest paths the
//! stage declares.
//!
//! # Modules
//!
//! - [`registry`] - Name to stage resolution, in registration order
//! - [`command`] - Stages that run a shell command when their sources change

pub mod command;
pub mod registry;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub use registry::{RegistryError, StageRegistry};

/// What a stage reports after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
  /// The stage did work.
  Ok,
  /// The stage had nothing to do.
  Noop,
}

impl StageStatus {
  pub fn did_work(self) -> bool {
    matches!(self, StageStatus::Ok)
  }
}

impl std::fmt::Display for StageStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      StageStatus::Ok => write!(f, "ok"),
      StageStatus::Noop => write!(f, "noop"),
    }
  }
}

/// Errors reported by a stage's own run.
#[derive(Debug, Error)]
pub enum StageError {
  /// The stage's command exited unsuccessfully.
  #[error("command failed ({}): {cmd}{}", exit_status(.code), stderr_suffix(.stderr))]
  CommandFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  /// I/O error while running the stage or updating its manifest.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Any other failure, described by the stage.
  #[error("{message}")]
  Failed { message: String },
}

fn exit_status(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "terminated by signal".to_string(),
  }
}

fn stderr_suffix(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!("\n{}", stderr)
  }
}

/// Options passed unchanged to every stage of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
  /// Ignore incremental bookkeeping and redo all work.
  pub force: bool,
  /// Root directory for build artifacts, manifests and the lock manifest.
  pub build_path: PathBuf,
  /// Artifacts must be self-contained inside the build path.
  pub build_embedded: bool,
  /// Extra arguments forwarded from the caller.
  pub args: Vec<String>,
}

/// Name and one-line description of a registered stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageInfo {
  pub name: String,
  pub description: String,
}

/// A unit of build work invoked by the pipeline.
pub trait Stage {
  /// Short identifier used in stage lists.
  fn name(&self) -> &str;

  /// One-line description shown by stage listings.
  fn description(&self) -> &str {
    ""
  }

  /// Files where this stage keeps its incremental bookkeeping.
  ///
  /// The orchestrator only reads their modification times.
  fn manifest_paths(&self) -> Vec<PathBuf> {
    Vec::new()
  }

  /// Run the stage.
  fn run(&self, options: &RunOptions) -> Result<StageStatus, StageError>;

  fn info(&self) -> StageInfo {
    StageInfo {
      name: self.name().to_string(),
      description: self.description().to_string(),
    }
  }
}
