//! Stage pipeline.
//!
//! A [`Pipeline`] owns the stage registry, the lock manifest, the resolved
//! dependencies and the consolidation gate. [`Pipeline::run`] is the single
//! entry point:
//!
//! 1. every requested name is resolved, so an unknown stage aborts before
//!    anything is touched or run
//! 2. the lock manifest is refreshed if a local dependency changed
//! 3. stages run in the requested order; the first failure aborts the run
//! 4. stage statuses are reduced to a [`PipelineOutcome`]
//! 5. the consolidation gate decides whether post-processing runs

mod consolidate;
mod types;

pub use consolidate::ConsolidationGate;
pub use types::*;

use std::time::Instant;

use tracing::{debug, info};

use crate::deps::DependencyRecord;
use crate::lock::{LockError, LockManifest};
use crate::manifest::ManifestSet;
use crate::stage::{RunOptions, StageInfo, StageRegistry};

/// Ordered, staleness-aware stage runner.
#[derive(Debug)]
pub struct Pipeline {
  registry: StageRegistry,
  lock: LockManifest,
  deps: Vec<DependencyRecord>,
  gate: ConsolidationGate,
}

impl Pipeline {
  pub fn new(registry: StageRegistry, lock: LockManifest, deps: Vec<DependencyRecord>) -> Self {
    Self {
      registry,
      lock,
      deps,
      gate: ConsolidationGate::disabled(),
    }
  }

  pub fn with_consolidation(mut self, gate: ConsolidationGate) -> Self {
    self.gate = gate;
    self
  }

  pub fn registry(&self) -> &StageRegistry {
    &self.registry
  }

  pub fn lock(&self) -> &LockManifest {
    &self.lock
  }

  pub fn deps(&self) -> &[DependencyRecord] {
    &self.deps
  }

  pub fn gate(&self) -> &ConsolidationGate {
    &self.gate
  }

  /// Turn consolidation off for this pipeline, whatever the configuration says.
  pub fn disable_consolidation(&mut self) {
    self.gate.set_enabled(false);
  }

  /// Name and description of every registered stage.
  ///
  /// Never checks staleness and never runs a stage.
  pub fn list_stages(&self) -> Vec<StageInfo> {
    self.registry.list()
  }

  /// Manifests watched when running `names`.
  pub fn watched_manifests<S: AsRef<str>>(&self, names: &[S]) -> ManifestSet {
    self.registry.manifest_paths(names)
  }

  /// Whether running `names` would touch the lock manifest.
  pub fn is_stale<S: AsRef<str>>(&self, names: &[S]) -> Result<bool, LockError> {
    self.lock.is_stale(&self.deps, &self.watched_manifests(names))
  }

  /// Run the stages named in `names`, in that order.
  pub fn run<S: AsRef<str>>(&self, names: &[S], options: &RunOptions) -> Result<RunReport, PipelineError> {
    let stages = self.registry.ordered_stages(names)?;

    let watched = self.watched_manifests(names);
    let lock_touched = self.lock.refresh_if_stale(&self.deps, &watched)?;

    let mut reports = Vec::with_capacity(stages.len());
    for stage in stages {
      let started = Instant::now();
      debug!(stage = %stage.name(), "running stage");

      let status = stage.run(options).map_err(|source| PipelineError::StageFailure {
        name: stage.name().to_string(),
        source,
      })?;

      let duration = started.elapsed();
      info!(stage = %stage.name(), %status, ?duration, "stage finished");
      reports.push(StageReport {
        name: stage.name().to_string(),
        status,
        duration,
      });
    }

    let outcome = PipelineOutcome::from_statuses(reports.iter().map(|r| r.status));
    let consolidated = self.gate.will_run(outcome);
    let outcome = self.gate.maybe_run(outcome, options)?;

    info!(%outcome, stages = reports.len(), lock_touched, consolidated, "pipeline finished");
    Ok(RunReport {
      outcome,
      stages: reports,
      lock_touched,
      consolidated,
    })
  }
}
