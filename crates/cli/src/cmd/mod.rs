mod compile;
mod stages;
mod status;

use std::path::Path;

use anyhow::{Context, Result};

use stagebuild_lib::config::find_config_path;
use stagebuild_lib::project::Project;

pub use compile::{CompileArgs, cmd_compile};
pub use stages::cmd_stages;
pub use status::cmd_status;

/// Locate and load the project for a command.
fn load_project(config: Option<&Path>, build_path: Option<&Path>) -> Result<Project> {
  let config_path = find_config_path(config).context("Failed to locate stagebuild.toml")?;
  Project::load(&config_path, build_path)
    .with_context(|| format!("Failed to load project from {}", config_path.display()))
}
