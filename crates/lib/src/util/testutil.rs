//! Test utilities for stagebuild-lib.
//!
//! Provides scripted stages that record their invocations, plus filesystem
//! helpers for arranging modification times.

use std::cell::RefCell;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use crate::stage::{RunOptions, Stage, StageError, StageStatus};

/// Set the modification time of an existing file.
pub fn set_mtime(path: &Path, time: SystemTime) {
  let file = File::options().append(true).open(path).unwrap();
  file.set_modified(time).unwrap();
}

/// A point in time comfortably in the past.
pub fn hours_ago(hours: u64) -> SystemTime {
  SystemTime::now() - Duration::from_secs(hours * 3600)
}

/// Shared invocation log, in call order.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn call_log() -> CallLog {
  Rc::new(RefCell::new(Vec::new()))
}

type Hook = Box<dyn Fn(&RunOptions)>;

/// What a [`ScriptedStage`] reports when run.
#[derive(Debug, Clone)]
pub enum Script {
  Ok,
  Noop,
  Fail(String),
}

/// A stage with a fixed result that appends its name to a shared log.
pub struct ScriptedStage {
  name: String,
  script: Script,
  log: CallLog,
  manifests: Vec<PathBuf>,
  seen: Rc<RefCell<Vec<RunOptions>>>,
  hook: Option<Hook>,
}

impl ScriptedStage {
  pub fn new(name: &str, script: Script, log: &CallLog) -> Self {
    Self {
      name: name.to_string(),
      script,
      log: Rc::clone(log),
      manifests: Vec::new(),
      seen: Rc::new(RefCell::new(Vec::new())),
      hook: None,
    }
  }

  pub fn with_manifest(mut self, path: PathBuf) -> Self {
    self.manifests.push(path);
    self
  }

  /// Run `hook` at the start of every invocation.
  pub fn with_hook(mut self, hook: impl Fn(&RunOptions) + 'static) -> Self {
    self.hook = Some(Box::new(hook));
    self
  }

  /// Options received by each invocation, in order.
  pub fn seen_options(&self) -> Rc<RefCell<Vec<RunOptions>>> {
    Rc::clone(&self.seen)
  }
}

impl Stage for ScriptedStage {
  fn name(&self) -> &str {
    &self.name
  }

  fn description(&self) -> &str {
    "scripted test stage"
  }

  fn manifest_paths(&self) -> Vec<PathBuf> {
    self.manifests.clone()
  }

  fn run(&self, options: &RunOptions) -> Result<StageStatus, StageError> {
    if let Some(hook) = &self.hook {
      hook(options);
    }
    self.log.borrow_mut().push(self.name.clone());
    self.seen.borrow_mut().push(options.clone());

    match &self.script {
      Script::Ok => Ok(StageStatus::Ok),
      Script::Noop => Ok(StageStatus::Noop),
      Script::Fail(message) => Err(StageError::Failed {
        message: message.clone(),
      }),
    }
  }
}

/// Returns the command that writes `content` into `file`.
#[cfg(unix)]
pub fn write_file_cmd(file: &str, content: &str) -> String {
  format!("printf '{}' > {}", content, file)
}

#[cfg(windows)]
pub fn write_file_cmd(file: &str, content: &str) -> String {
  format!("Set-Content -Path '{}' -Value '{}' -NoNewline", file, content)
}

/// Returns a command that exits with a non-zero status.
#[cfg(unix)]
pub fn failing_cmd() -> String {
  "echo boom >&2; exit 3".to_string()
}

#[cfg(windows)]
pub fn failing_cmd() -> String {
  "Write-Error 'boom'; exit 3".to_string()
}
