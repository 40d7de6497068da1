//! Command stages.
//!
//! A command stage runs a shell command declared in `[stages.<name>]`. It
//! keeps its own incremental bookkeeping in a manifest file under the build
//! path:
//!
//! - if `sources` is empty, the command always runs
//! - otherwise the command is skipped (`Noop`) when the manifest exists and no
//!   source file is newer than it, unless the run is forced
//! - after a successful run, the manifest is stamped with the time the command
//!   started, so a source edited while the command runs is picked up next time
//!
//! With a POSIX shell the forwarded arguments are also passed as positional
//! parameters (`"$@"`), with the stage name as `$0`.
//!
//! The command sees the caller's environment plus:
//!
//! | Variable                 | Value                              |
//! |--------------------------|------------------------------------|
//! | `STAGEBUILD_STAGE`       | the stage name                     |
//! | `STAGEBUILD_BUILD_PATH`  | the build path                     |
//! | `STAGEBUILD_FORCE`       | `1` when forced, else `0`          |
//! | `STAGEBUILD_EMBEDDED`    | `1` for embedded builds, else `0`  |
//! | `STAGEBUILD_ARGS`        | forwarded arguments, space-joined  |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use tracing::{debug, info};

use crate::config::StageDef;
use crate::stage::{RunOptions, Stage, StageError, StageStatus};
use crate::util::mtime;

/// Directory under the build path holding default stage manifests.
pub const MANIFESTS_DIR: &str = "manifests";

/// A stage backed by a shell command.
#[derive(Debug, Clone)]
pub struct CommandStage {
  name: String,
  description: String,
  cmd: String,
  sources: Vec<PathBuf>,
  manifest: PathBuf,
  cwd: PathBuf,
  env: BTreeMap<String, String>,
  shell: Option<String>,
}

impl CommandStage {
  /// Build a stage from its config definition.
  ///
  /// `sources` and `cwd` are resolved against `project_root`; `manifest`
  /// against `build_path`.
  pub fn from_def(name: &str, def: &StageDef, project_root: &Path, build_path: &Path) -> Self {
    let manifest = def
      .manifest
      .as_ref()
      .map(|m| build_path.join(m))
      .unwrap_or_else(|| default_manifest_path(build_path, name));

    Self {
      name: name.to_string(),
      description: def.description.clone().unwrap_or_default(),
      cmd: def.cmd.clone(),
      sources: def.sources.iter().map(|s| project_root.join(s)).collect(),
      manifest,
      cwd: def
        .cwd
        .as_ref()
        .map(|c| project_root.join(c))
        .unwrap_or_else(|| project_root.to_path_buf()),
      env: def.env.clone(),
      shell: def.shell.clone(),
    }
  }

  pub fn manifest(&self) -> &Path {
    &self.manifest
  }

  /// Whether the stage's recorded work still covers its sources.
  fn is_up_to_date(&self) -> Result<bool, StageError> {
    if self.sources.is_empty() {
      return Ok(false);
    }

    let Some(recorded) = mtime::last_modified(&self.manifest)? else {
      return Ok(false);
    };

    let mut newest: Option<SystemTime> = None;
    for source in &self.sources {
      newest = newest.max(mtime::newest_in_tree(source)?);
    }

    Ok(newest.is_none_or(|n| n <= recorded))
  }

  fn execute(&self, options: &RunOptions) -> Result<(), StageError> {
    let (shell_cmd, shell_args) = get_shell(self.shell.as_deref());

    let mut command = Command::new(&shell_cmd);
    command.args(&shell_args).arg(&self.cmd);
    if takes_positional_args(&shell_args) {
      command.arg(&self.name).args(&options.args);
    }
    command
      .current_dir(&self.cwd)
      .env("STAGEBUILD_STAGE", &self.name)
      .env("STAGEBUILD_BUILD_PATH", &options.build_path)
      .env("STAGEBUILD_FORCE", flag(options.force))
      .env("STAGEBUILD_EMBEDDED", flag(options.build_embedded))
      .env("STAGEBUILD_ARGS", options.args.join(" "))
      .envs(&self.env);

    debug!(stage = %self.name, shell = %shell_cmd, cwd = ?self.cwd, "spawning process");

    let output = command.output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
      debug!(stage = %self.name, stdout = %stdout.trim(), "command output");
    }

    if !output.status.success() {
      return Err(StageError::CommandFailed {
        cmd: self.cmd.clone(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    Ok(())
  }
}

impl Stage for CommandStage {
  fn name(&self) -> &str {
    &self.name
  }

  fn description(&self) -> &str {
    &self.description
  }

  fn manifest_paths(&self) -> Vec<PathBuf> {
    vec![self.manifest.clone()]
  }

  fn run(&self, options: &RunOptions) -> Result<StageStatus, StageError> {
    if !options.force && self.is_up_to_date()? {
      debug!(stage = %self.name, "sources unchanged, skipping");
      return Ok(StageStatus::Noop);
    }

    info!(stage = %self.name, cmd = %self.cmd, "running stage");
    let started = SystemTime::now();
    self.execute(options)?;
    mtime::touch_at(&self.manifest, started)?;
    Ok(StageStatus::Ok)
  }
}

/// Default manifest location for a stage without an explicit `manifest`.
pub fn default_manifest_path(build_path: &Path, name: &str) -> PathBuf {
  build_path.join(MANIFESTS_DIR).join(format!("{}.manifest", name))
}

fn flag(value: bool) -> &'static str {
  if value { "1" } else { "0" }
}

/// Whether the shell invocation ends in `-c`, which takes `$0` and positional
/// parameters after the command string.
fn takes_positional_args(shell_args: &[String]) -> bool {
  shell_args.last().is_some_and(|a| a == "-c")
}

/// Get the shell command and argument for the current platform.
///
/// An explicit shell gets the argument style it expects; otherwise `/bin/sh`
/// on Unix and PowerShell on Windows.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    (
      "powershell.exe".to_string(),
      vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-Command".to_string(),
      ],
    )
  }
}
