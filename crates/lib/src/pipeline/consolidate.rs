//! Consolidation gate.
//!
//! Consolidation is post-processing over freshly built artifacts, so it only
//! runs when it is enabled and the stages actually did work.

use tracing::{info, warn};

use super::types::{PipelineError, PipelineOutcome};
use crate::stage::{RunOptions, Stage};

/// Decides whether the consolidation stage runs after the pipeline.
#[derive(Default)]
pub struct ConsolidationGate {
  enabled: bool,
  stage: Option<Box<dyn Stage>>,
}

impl std::fmt::Debug for ConsolidationGate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ConsolidationGate")
      .field("enabled", &self.enabled)
      .field("stage", &self.stage.as_ref().map(|s| s.name()))
      .finish()
  }
}

impl ConsolidationGate {
  pub fn new(enabled: bool, stage: Option<Box<dyn Stage>>) -> Self {
    Self { enabled, stage }
  }

  /// A gate that never consolidates.
  pub fn disabled() -> Self {
    Self::default()
  }

  pub fn set_enabled(&mut self, enabled: bool) {
    self.enabled = enabled;
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  /// Whether [`maybe_run`](Self::maybe_run) would invoke the stage for `outcome`.
  pub fn will_run(&self, outcome: PipelineOutcome) -> bool {
    self.enabled && outcome.is_done() && self.stage.is_some()
  }

  /// Run the consolidation stage if enabled and `outcome` is `Done`.
  ///
  /// Returns `outcome` untouched when the gate is closed. A successful
  /// consolidation yields `Done`.
  pub fn maybe_run(&self, outcome: PipelineOutcome, options: &RunOptions) -> Result<PipelineOutcome, PipelineError> {
    if !self.enabled || !outcome.is_done() {
      return Ok(outcome);
    }

    let Some(stage) = self.stage.as_deref() else {
      warn!("consolidation enabled but no consolidation stage configured");
      return Ok(outcome);
    };

    info!(stage = %stage.name(), "consolidating");
    stage.run(options).map_err(PipelineError::ConsolidationFailure)?;
    Ok(PipelineOutcome::Done)
  }
}
