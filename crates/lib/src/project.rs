//! Project loading.
//!
//! Turns a `stagebuild.toml` into a ready-to-run [`Pipeline`]: command stages
//! are registered, dependencies resolved, the build path chosen and the
//! consolidation gate configured.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, ProjectConfig};
use crate::deps::{DepsError, resolve::resolve_deps};
use crate::lock::LockManifest;
use crate::pipeline::{ConsolidationGate, Pipeline, PipelineError, RunReport};
use crate::platform::paths::{build_path, lock_manifest_path};
use crate::stage::command::CommandStage;
use crate::stage::{RegistryError, RunOptions, Stage, StageRegistry};

/// Name under which the `[consolidation]` stage is built.
pub const CONSOLIDATION_STAGE: &str = "consolidate";

/// Errors that can occur while loading a project.
#[derive(Debug, Error)]
pub enum ProjectError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Deps(#[from] DepsError),

  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error("failed to resolve project root {}: {source}", .path.display())]
  Root {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A loaded project.
#[derive(Debug)]
pub struct Project {
  root: PathBuf,
  build_path: PathBuf,
  config: ProjectConfig,
  pipeline: Pipeline,
}

impl Project {
  /// Load the project whose configuration lives at `config_path`.
  ///
  /// The project root is the directory containing the configuration file.
  pub fn load(config_path: &Path, build_path_override: Option<&Path>) -> Result<Self, ProjectError> {
    let config = ProjectConfig::load(config_path)?;

    let parent = match config_path.parent() {
      Some(p) if !p.as_os_str().is_empty() => p,
      _ => Path::new("."),
    };
    let root = dunce::canonicalize(parent).map_err(|e| ProjectError::Root {
      path: parent.to_path_buf(),
      source: e,
    })?;

    let build_path = build_path(&root, config.project.build_path.as_deref(), build_path_override);
    debug!(root = %root.display(), build_path = %build_path.display(), "project paths");

    let registry = register_stages(&config, &root, &build_path)?;
    let deps = resolve_deps(&config.deps, &root)?;

    let consolidation = config
      .consolidation
      .as_ref()
      .map(|def| -> Box<dyn Stage> { Box::new(CommandStage::from_def(CONSOLIDATION_STAGE, def, &root, &build_path)) });
    let gate = ConsolidationGate::new(config.consolidation_enabled(), consolidation);

    let lock = LockManifest::new(lock_manifest_path(&build_path));
    let pipeline = Pipeline::new(registry, lock, deps).with_consolidation(gate);

    info!(
      project = %display_name(&config, &root),
      stages = config.project.stages.len(),
      deps = pipeline.deps().len(),
      "loaded project"
    );

    Ok(Self {
      root,
      build_path,
      config,
      pipeline,
    })
  }

  /// Project name from the config, or the root directory name.
  pub fn name(&self) -> String {
    display_name(&self.config, &self.root)
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn build_path(&self) -> &Path {
    &self.build_path
  }

  pub fn pipeline(&self) -> &Pipeline {
    &self.pipeline
  }

  pub fn pipeline_mut(&mut self) -> &mut Pipeline {
    &mut self.pipeline
  }

  /// The configured stage order.
  pub fn stage_names(&self) -> &[String] {
    &self.config.project.stages
  }

  pub fn run_options(&self, force: bool, args: Vec<String>) -> RunOptions {
    RunOptions {
      force,
      build_path: self.build_path.clone(),
      build_embedded: self.config.project.build_embedded,
      args,
    }
  }

  /// Run the configured stages.
  pub fn compile(&self, options: &RunOptions) -> Result<RunReport, PipelineError> {
    self.pipeline.run(self.stage_names(), options)
  }
}

/// Register a command stage for every `[stages]` entry.
///
/// Stages named in `project.stages` are registered first, in that order; the
/// rest follow in name order.
fn register_stages(config: &ProjectConfig, root: &Path, build_path: &Path) -> Result<StageRegistry, RegistryError> {
  let mut registry = StageRegistry::new();

  let ordered = config.project.stages.iter().map(String::as_str);
  let remaining = config.stages.keys().map(String::as_str);

  for name in ordered.chain(remaining) {
    if registry.try_resolve(name).is_some() {
      continue;
    }
    let Some(def) = config.stages.get(name) else {
      continue;
    };
    registry.register(Box::new(CommandStage::from_def(name, def, root, build_path)))?;
  }

  Ok(registry)
}

fn display_name(config: &ProjectConfig, root: &Path) -> String {
  config
    .project
    .name
    .clone()
    .or_else(|| root.file_name().map(|n| n.to_string_lossy().into_owned()))
    .unwrap_or_else(|| "project".to_string())
}
