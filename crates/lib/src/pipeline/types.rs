//! Types for pipeline execution.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::lock::LockError;
use crate::stage::{StageError, StageStatus};

/// Aggregate result of a successful pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineOutcome {
  /// At least one stage did work.
  Done,
  /// Every stage reported nothing to do.
  Unchanged,
}

impl PipelineOutcome {
  /// OR-reduce stage statuses: `Done` if any stage did work.
  pub fn from_statuses<I: IntoIterator<Item = StageStatus>>(statuses: I) -> Self {
    if statuses.into_iter().any(StageStatus::did_work) {
      PipelineOutcome::Done
    } else {
      PipelineOutcome::Unchanged
    }
  }

  pub fn is_done(self) -> bool {
    matches!(self, PipelineOutcome::Done)
  }
}

impl std::fmt::Display for PipelineOutcome {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PipelineOutcome::Done => write!(f, "done"),
      PipelineOutcome::Unchanged => write!(f, "unchanged"),
    }
  }
}

/// Errors that end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// A requested stage has no registered implementation.
  #[error("unknown stage '{0}'")]
  UnknownStage(String),

  /// A stage failed; later stages and consolidation did not run.
  #[error("stage '{name}' failed: {source}")]
  StageFailure {
    name: String,
    #[source]
    source: StageError,
  },

  /// The consolidation stage failed.
  #[error("consolidation failed: {0}")]
  ConsolidationFailure(#[source] StageError),

  /// The lock manifest could not be checked or refreshed.
  #[error(transparent)]
  Lock(#[from] LockError),
}

/// Result of a single stage invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
  pub name: String,
  pub status: StageStatus,
  #[serde(serialize_with = "serialize_millis", rename = "duration_ms")]
  pub duration: Duration,
}

/// Everything a caller may want to know about a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
  pub outcome: PipelineOutcome,
  /// Stage reports, in invocation order.
  pub stages: Vec<StageReport>,
  /// Whether the lock manifest was touched before the stages ran.
  pub lock_touched: bool,
  /// Whether the consolidation stage ran.
  pub consolidated: bool,
}

impl RunReport {
  /// Number of stage invocations that did work.
  pub fn worked(&self) -> usize {
    self.stages.iter().filter(|s| s.status.did_work()).count()
  }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
