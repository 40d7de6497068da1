//! Stage registry.
//!
//! Owns every stage registered for a build configuration and resolves stage
//! names to stage handles. Resolution never reorders or deduplicates: the
//! caller's list is followed verbatim.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::manifest::ManifestSet;
use crate::pipeline::PipelineError;
use crate::stage::{Stage, StageInfo};

/// Errors that can occur while registering stages.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// A stage with this name is already registered.
  #[error("stage '{0}' is already registered")]
  DuplicateStage(String),
}

/// Registered stages, in registration order.
#[derive(Default)]
pub struct StageRegistry {
  stages: Vec<Box<dyn Stage>>,
  index: HashMap<String, usize>,
}

impl std::fmt::Debug for StageRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StageRegistry").field("stages", &self.names()).finish()
  }
}

impl StageRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a stage under its own name.
  pub fn register(&mut self, stage: Box<dyn Stage>) -> Result<(), RegistryError> {
    let name = stage.name().to_string();
    if self.index.contains_key(&name) {
      return Err(RegistryError::DuplicateStage(name));
    }

    debug!(stage = %name, rank = self.stages.len(), "registering stage");
    self.index.insert(name, self.stages.len());
    self.stages.push(stage);
    Ok(())
  }

  /// Registered names, in registration order.
  pub fn names(&self) -> Vec<&str> {
    self.stages.iter().map(|s| s.name()).collect()
  }

  /// Look up a stage without failing on unknown names.
  pub fn try_resolve(&self, name: &str) -> Option<&dyn Stage> {
    self.index.get(name).map(|&i| self.stages[i].as_ref())
  }

  /// Look up a stage by name.
  pub fn resolve(&self, name: &str) -> Result<&dyn Stage, PipelineError> {
    self
      .try_resolve(name)
      .ok_or_else(|| PipelineError::UnknownStage(name.to_string()))
  }

  /// Resolve `names` in the given order.
  ///
  /// Duplicate names yield duplicate handles. Fails on the first unknown name.
  pub fn ordered_stages<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&dyn Stage>, PipelineError> {
    names.iter().map(|name| self.resolve(name.as_ref())).collect()
  }

  /// Collect the manifest paths of the stages named in `names`.
  ///
  /// Unknown names and stages without manifests contribute nothing.
  pub fn manifest_paths<S: AsRef<str>>(&self, names: &[S]) -> ManifestSet {
    names
      .iter()
      .filter_map(|name| self.try_resolve(name.as_ref()))
      .flat_map(|stage| stage.manifest_paths())
      .collect()
  }

  /// Name and description of every registered stage, without running any.
  pub fn list(&self) -> Vec<StageInfo> {
    self.stages.iter().map(|s| s.info()).collect()
  }
}
