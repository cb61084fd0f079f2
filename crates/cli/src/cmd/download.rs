//! Implementation of the `assetsync download` command.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use assetsync_lib::download::{DownloadTarget, Downloader};

use super::Session;
use crate::output::{OutputFormat, Status, format_bytes, format_duration, format_files, print_json, print_status, print_summary};

/// Download `target` from the configured bucket into the public path.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the target is unknown, a
/// required manifest is missing from the bucket, or any transfer fails.
pub fn cmd_download(config: Option<&Path>, root: Option<&Path>, target: &str, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let target: DownloadTarget = target.parse()?;
  let session = Session::open(config, root)?;

  let downloader = Downloader::new(&session.config, &session.host, session.storage.as_ref());
  let report = downloader
    .download(target)
    .with_context(|| format!("Failed to download {}", target))?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    println!();
    print_status(Status::Done, &format!("Downloaded {}", report.target));
    print_summary(&[
      ("Fetched", format_files(report.downloaded.len())),
      ("Skipped", format_files(report.skipped.len())),
      ("Size", format_bytes(report.total_bytes())),
      ("Into", session.config.public_path.display().to_string()),
      ("Duration", format_duration(start.elapsed())),
    ]);
  }

  Ok(())
}
