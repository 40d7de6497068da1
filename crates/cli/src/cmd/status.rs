//! Status command implementation.
//!
//! Reports the build path, the lock manifest and whether the next compile
//! would refresh it. Nothing is touched and no stage runs.

use std::path::Path;

use anyhow::{Context, Result};

use stagebuild_lib::deps::DependencyRecord;

use crate::output::{OutputFormat, print_json, print_stat, print_success, print_warning, symbols};

pub fn cmd_status(config: Option<&Path>, build_path: Option<&Path>, output: OutputFormat) -> Result<()> {
  let project = super::load_project(config, build_path)?;
  let pipeline = project.pipeline();
  let stages = project.stage_names();

  let watched = pipeline.watched_manifests(stages);
  let stale = pipeline.is_stale(stages).context("Failed to check lock manifest")?;
  let lock_exists = pipeline.lock().path().exists();

  if output.is_json() {
    let deps: Vec<_> = pipeline
      .deps()
      .iter()
      .map(|dep| {
        serde_json::json!({
          "name": dep.name,
          "kind": dep.source.kind(),
          "root": dep.root(),
          "config_files": dep.config_files,
        })
      })
      .collect();
    let json_output = serde_json::json!({
      "project": project.name(),
      "build_path": project.build_path(),
      "lock_manifest": pipeline.lock().path(),
      "lock_exists": lock_exists,
      "stale": stale,
      "stages": stages,
      "watched_manifests": watched.iter().collect::<Vec<_>>(),
      "deps": deps,
    });
    return print_json(&json_output);
  }

  print_success(&format!("Project: {}", project.name()));
  print_stat("Build path", &project.build_path().display().to_string());
  print_stat("Lock manifest", &pipeline.lock().path().display().to_string());
  print_stat("Stages", &stages.join(", "));
  print_stat("Watched manifests", &watched.len().to_string());

  if !pipeline.deps().is_empty() {
    println!();
    println!("Dependencies:");
    for dep in pipeline.deps() {
      println!("  {} {}", symbols::INFO, describe(dep));
    }
  }

  println!();
  if stale {
    print_warning("Lock manifest is stale; the next compile will refresh it");
  } else if lock_exists {
    print_success("Lock manifest is up to date");
  } else {
    print_success("Lock manifest not needed (no changed local dependencies)");
  }

  Ok(())
}

fn describe(dep: &DependencyRecord) -> String {
  match dep.root() {
    Some(root) => format!("{} ({}: {})", dep.name, dep.source.kind(), root.display()),
    None => format!("{} ({})", dep.name, dep.source.kind()),
  }
}
