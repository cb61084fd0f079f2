//! Download target, report and error types.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manifest::ManifestError;
use crate::storage::StorageError;

/// What a download invocation should fetch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadTarget {
  /// The framework manifest file, always refreshed.
  Manifest,
  /// Compiled assets listed by the manifest, or everything in the bucket.
  #[default]
  AssetFiles,
  /// The bundler's public manifest, always refreshed.
  WebpackerManifest,
  /// Bundled assets listed by the bundler manifest.
  WebpackerAssetFiles,
}

impl DownloadTarget {
  pub const ALL: [DownloadTarget; 4] = [
    DownloadTarget::Manifest,
    DownloadTarget::AssetFiles,
    DownloadTarget::WebpackerManifest,
    DownloadTarget::WebpackerAssetFiles,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      DownloadTarget::Manifest => "manifest",
      DownloadTarget::AssetFiles => "asset_files",
      DownloadTarget::WebpackerManifest => "webpacker_manifest",
      DownloadTarget::WebpackerAssetFiles => "webpacker_asset_files",
    }
  }

  /// Manifest targets must always be refreshed.
  pub fn skip_if_exists(self) -> bool {
    matches!(self, DownloadTarget::AssetFiles | DownloadTarget::WebpackerAssetFiles)
  }
}

impl fmt::Display for DownloadTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DownloadTarget {
  type Err = DownloadError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let name = s.trim().trim_start_matches(':');
    DownloadTarget::ALL
      .into_iter()
      .find(|t| t.as_str() == name)
      .ok_or_else(|| DownloadError::UnknownTarget { target: s.to_string() })
  }
}

/// Result of a single file download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
  /// A local copy already existed.
  Skipped,
  /// The object was fetched and written.
  Downloaded { bytes: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedFile {
  pub path: String,
  pub bytes: u64,
}

/// Summary of a download invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadReport {
  pub target: DownloadTarget,
  pub downloaded: Vec<DownloadedFile>,
  pub skipped: Vec<String>,
}

impl DownloadReport {
  pub fn new(target: DownloadTarget) -> Self {
    Self {
      target,
      downloaded: Vec::new(),
      skipped: Vec::new(),
    }
  }

  pub fn record(&mut self, path: &str, outcome: DownloadOutcome) {
    match outcome {
      DownloadOutcome::Skipped => self.skipped.push(path.to_string()),
      DownloadOutcome::Downloaded { bytes } => self.downloaded.push(DownloadedFile {
        path: path.to_string(),
        bytes,
      }),
    }
  }

  pub fn total_bytes(&self) -> u64 {
    self.downloaded.iter().map(|f| f.bytes).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.downloaded.is_empty() && self.skipped.is_empty()
  }
}

/// A file a download would touch, as shown by `plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
  pub path: String,
  pub local_path: PathBuf,
  pub skip_if_exists: bool,
  pub exists: bool,
}

impl PlannedFile {
  /// Whether `download` would actually fetch this file.
  pub fn will_fetch(&self) -> bool {
    !(self.skip_if_exists && self.exists)
  }
}

/// Errors that can occur during a download.
#[derive(Debug, Error)]
pub enum DownloadError {
  /// The target name is not one of the known targets.
  #[error(
    "unknown target specified: {target}. It must be one of manifest, asset_files, webpacker_manifest, webpacker_asset_files"
  )]
  UnknownTarget { target: String },

  /// No manifest object in the bucket.
  #[error("could not find any manifests for {target}. aborted.")]
  ManifestNotFound { target: DownloadTarget },

  /// The key would resolve outside the local root.
  #[error("refusing to download '{0}' outside of the public path")]
  UnsafeKey(String),

  /// Failed to create a local directory.
  #[error("failed to create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Failed to write a local file.
  #[error("failed to write '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("storage error: {0}")]
  Storage(#[from] StorageError),

  #[error("manifest error: {0}")]
  Manifest(#[from] ManifestError),
}
