//! Terminal output helpers.
//!
//! Status lines go to stdout, errors to stderr. Log lines from the library are
//! written to stderr by the tracing subscriber, so `--output json` keeps
//! stdout machine readable.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Leading marker of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Done,
  Failed,
  Note,
}

impl Status {
  pub fn symbol(self) -> &'static str {
    match self {
      Status::Done => "✓",
      Status::Failed => "✗",
      Status::Note => "•",
    }
  }
}

/// What `download` would do with a planned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMark {
  /// Not present locally.
  Fetch,
  /// Present locally, fetched again anyway.
  Refresh,
  /// Present locally and left alone.
  Keep,
}

impl PlanMark {
  pub fn symbol(self) -> &'static str {
    match self {
      PlanMark::Fetch => "+",
      PlanMark::Refresh => "~",
      PlanMark::Keep => "•",
    }
  }
}

/// Byte counts in the same unit the download log uses, scaled past 1 KiB.
pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];

  if bytes < 1024 {
    return format!("{} Bytes", bytes);
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit + 1 < UNITS.len() {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

pub fn format_files(count: usize) -> String {
  match count {
    1 => "1 file".to_string(),
    n => format!("{} files", n),
  }
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  match secs {
    0 => format!("{}ms", duration.as_millis()),
    1..60 => format!("{:.2}s", duration.as_secs_f64()),
    _ => format!("{}m {}s", secs / 60, secs % 60),
  }
}

pub fn print_status(status: Status, message: &str) {
  match status {
    Status::Failed => eprintln!(
      "{} {}",
      status.symbol().if_supports_color(Stream::Stderr, |s| s.red()),
      message.if_supports_color(Stream::Stderr, |s| s.red())
    ),
    Status::Done => println!(
      "{} {}",
      status.symbol().if_supports_color(Stream::Stdout, |s| s.green()),
      message
    ),
    Status::Note => println!(
      "{} {}",
      status.symbol().if_supports_color(Stream::Stdout, |s| s.blue()),
      message
    ),
  }
}

/// Print `label: value` rows with the values lined up.
pub fn print_summary(rows: &[(&str, String)]) {
  let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
  for (label, value) in rows {
    let padded = format!("{:width$}", format!("{}:", label), width = width + 1);
    println!("  {} {}", padded.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
  }
}

pub fn print_plan_row(mark: PlanMark, path: &str) {
  let symbol = mark.symbol();
  match mark {
    PlanMark::Fetch => println!(
      "  {} {}",
      symbol.if_supports_color(Stream::Stdout, |s| s.green()),
      path.if_supports_color(Stream::Stdout, |s| s.cyan())
    ),
    PlanMark::Refresh => println!(
      "  {} {}",
      symbol.if_supports_color(Stream::Stdout, |s| s.yellow()),
      path.if_supports_color(Stream::Stdout, |s| s.cyan())
    ),
    PlanMark::Keep => println!(
      "  {} {} {}",
      symbol.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      path.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      "(exists)".if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bytes_match_download_log_unit() {
    assert_eq!(format_bytes(0), "0 Bytes");
    assert_eq!(format_bytes(1023), "1023 Bytes");
    assert_eq!(format_bytes(1536), "1.5 KiB");
    assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    assert_eq!(format_bytes(5 * 1024 * 1024 * 1024 * 1024), "5120.0 GiB");
  }

  #[test]
  fn file_counts_are_pluralized() {
    assert_eq!(format_files(0), "0 files");
    assert_eq!(format_files(1), "1 file");
    assert_eq!(format_files(12), "12 files");
  }

  #[test]
  fn durations_scale_with_length() {
    assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
    assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
  }

  #[test]
  fn plan_marks_are_distinct() {
    assert_eq!(PlanMark::Fetch.symbol(), "+");
    assert_eq!(PlanMark::Refresh.symbol(), "~");
    assert_eq!(PlanMark::Keep.symbol(), "•");
    assert_ne!(Status::Done.symbol(), Status::Failed.symbol());
  }

  #[test]
  fn output_format_json() {
    assert!(OutputFormat::Json.is_json());
    assert!(!OutputFormat::Text.is_json());
  }
}
