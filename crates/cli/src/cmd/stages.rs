use std::path::Path;

use anyhow::Result;

use crate::output::{OutputFormat, print_info, print_json, symbols};

pub fn cmd_stages(config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let project = super::load_project(config, None)?;
  let stages = project.pipeline().list_stages();

  if output.is_json() {
    return print_json(&stages);
  }

  if stages.is_empty() {
    print_info("No stages registered");
    return Ok(());
  }

  let width = stages.iter().map(|s| s.name.len()).max().unwrap_or(0);
  for stage in &stages {
    if stage.description.is_empty() {
      println!("  {} {}", symbols::INFO, stage.name);
    } else {
      println!("  {} {:<width$}  {}", symbols::INFO, stage.name, stage.description);
    }
  }

  Ok(())
}
