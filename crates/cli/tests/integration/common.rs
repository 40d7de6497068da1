//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test project.
///
/// Each test gets its own temporary project directory holding a
/// `stagebuild.toml` copied from a fixture.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file.
  ///
  /// Copies the fixture content to a temporary `stagebuild.toml` and creates
  /// a `schema/` source directory with backdated files.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("stagebuild.toml");
    std::fs::write(&config_path, fixture_content(name)).unwrap();

    let env = Self { temp, config_path };
    env.write_file("schema/types.txt", "v1");
    env.backdate("schema/types.txt");
    env
  }

  /// Project root, canonicalized.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Read a file relative to the project root, `None` if it does not exist.
  pub fn read_file(&self, relative_path: &str) -> Option<String> {
    std::fs::read_to_string(self.temp.path().join(relative_path)).ok()
  }

  /// Move a file's modification time an hour into the past.
  pub fn backdate(&self, relative_path: &str) {
    let file = std::fs::File::options()
      .append(true)
      .open(self.temp.path().join(relative_path))
      .unwrap();
    file
      .set_modified(SystemTime::now() - Duration::from_secs(3600))
      .unwrap();
  }

  /// Get a pre-configured Command for the stagebuild binary.
  ///
  /// Clears `STAGEBUILD_BUILD_PATH` so the project's own build path is used,
  /// and points `--config` at this project.
  pub fn stagebuild(&self, subcommand: &str) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("stagebuild");
    cmd.env_remove("STAGEBUILD_BUILD_PATH");
    cmd.env_remove("RUST_LOG");
    cmd.arg(subcommand).arg("--config").arg(&self.config_path);
    cmd
  }
}
