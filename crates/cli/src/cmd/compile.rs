//! Implementation of the `stagebuild compile` command.
//!
//! Loads the project, runs its configured stages and prints one line per
//! stage followed by a summary.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use tracing::debug;

use stagebuild_lib::pipeline::{PipelineOutcome, StageReport};
use stagebuild_lib::stage::StageStatus;

use crate::output::{format_duration, print_info, print_stat, print_success, symbols};

/// Options for the compile command.
#[derive(Debug, Default)]
pub struct CompileArgs {
  pub config: Option<PathBuf>,
  pub force: bool,
  pub no_consolidate: bool,
  pub build_path: Option<PathBuf>,
  pub args: Vec<String>,
}

/// Execute the compile command.
pub fn cmd_compile(args: CompileArgs) -> Result<()> {
  let start = Instant::now();

  let mut project = super::load_project(args.config.as_deref(), args.build_path.as_deref())?;
  if args.no_consolidate {
    debug!("consolidation disabled from the command line");
    project.pipeline_mut().disable_consolidation();
  }

  let options = project.run_options(args.force, args.args);
  let report = project.compile(&options).context("Compile failed")?;

  for stage in &report.stages {
    print_stage(stage);
  }

  match report.outcome {
    PipelineOutcome::Unchanged => print_info("Nothing to compile"),
    PipelineOutcome::Done => {
      println!();
      print_success(&format!("Compiled {}", project.name()));
      print_stat("Stages run", &report.worked().to_string());
      if report.consolidated {
        print_stat("Consolidated", "yes");
      }
      if report.lock_touched {
        print_stat("Lock manifest", "refreshed");
      }
      print_stat("Duration", &format_duration(start.elapsed()));
    }
  }

  Ok(())
}

fn print_stage(stage: &StageReport) {
  match stage.status {
    StageStatus::Ok => println!(
      "  {} {} ({})",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      stage.name,
      format_duration(stage.duration)
    ),
    StageStatus::Noop => println!(
      "  {} {} {}",
      symbols::INFO.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      stage.name,
      "up to date".if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
  }
}
