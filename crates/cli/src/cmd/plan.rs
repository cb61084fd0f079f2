//! Implementation of the `assetsync plan` command.
//!
//! Resolves the files a download would touch and prints them without
//! fetching anything.

use std::path::Path;

use anyhow::{Context, Result};

use assetsync_lib::download::{DownloadTarget, Downloader};

use super::Session;
use crate::output::{OutputFormat, PlanMark, Status, format_files, print_json, print_plan_row, print_status};

pub fn cmd_plan(config: Option<&Path>, root: Option<&Path>, target: &str, output: OutputFormat) -> Result<()> {
  let target: DownloadTarget = target.parse()?;
  let session = Session::open(config, root)?;

  let downloader = Downloader::new(&session.config, &session.host, session.storage.as_ref());
  let plan = downloader
    .plan(target)
    .with_context(|| format!("Failed to plan {}", target))?;

  if output.is_json() {
    return print_json(&plan);
  }

  if plan.is_empty() {
    print_status(Status::Note, &format!("Nothing to download for {}", target));
    return Ok(());
  }

  let mut fetch_count = 0;
  for file in &plan {
    let mark = match (file.will_fetch(), file.exists) {
      (false, _) => PlanMark::Keep,
      (true, true) => PlanMark::Refresh,
      (true, false) => PlanMark::Fetch,
    };
    if mark != PlanMark::Keep {
      fetch_count += 1;
    }
    print_plan_row(mark, &file.path);
  }

  println!();
  print_status(Status::Note, &format!(
    "{} would fetch {} of {}",
    target,
    fetch_count,
    format_files(plan.len())
  ));

  Ok(())
}
