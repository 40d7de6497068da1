use crate::consts::{BUILD_PATH_ENV, DEFAULT_BUILD_DIR, LOCK_MANIFEST_FILENAME};
use std::path::{Path, PathBuf};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand a leading `~` and resolve relative paths against `base`.
pub fn expand_path(path: &Path, base: &Path) -> PathBuf {
  if let Ok(rest) = path.strip_prefix("~")
    && let Some(home) = home_dir()
  {
    return home.join(rest);
  }
  base.join(path)
}

/// Resolve the build directory for a project rooted at `root`.
///
/// Priority order:
/// 1. `cli_override` (e.g. `--build-path`)
/// 2. `STAGEBUILD_BUILD_PATH` environment variable
/// 3. `configured` (`project.build_path` in the config)
/// 4. `<root>/_build`
///
/// Relative paths are resolved against `root`.
pub fn build_path(root: &Path, configured: Option<&Path>, cli_override: Option<&Path>) -> PathBuf {
  let from_env = std::env::var_os(BUILD_PATH_ENV)
    .filter(|v| !v.is_empty())
    .map(PathBuf::from);

  let chosen = cli_override
    .map(Path::to_path_buf)
    .or(from_env)
    .or_else(|| configured.map(Path::to_path_buf))
    .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR));

  expand_path(&chosen, root)
}

/// Path of the lock manifest inside `build_path`.
pub fn lock_manifest_path(build_path: &Path) -> PathBuf {
  build_path.join(LOCK_MANIFEST_FILENAME)
}
