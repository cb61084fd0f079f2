//! Host environment capabilities.
//!
//! What the surrounding application offers (a framework-native manifest, a
//! bundler, an explicitly named manifest file) is decided once, up front, and
//! handed to the downloader as a [`HostCapabilities`] value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::manifest::{ManifestError, is_legacy_manifest_name, is_sprockets_manifest_name};

/// A manifest the host framework can read natively.
pub trait NativeManifest {
  /// Compiled asset paths, relative to the asset prefix.
  fn compiled_assets(&self) -> Result<Vec<String>, ManifestError>;

  fn describe(&self) -> String;
}

/// The bundler integration, present when the host bundles with webpacker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlerIntegration {
  public_manifest_path: PathBuf,
}

impl BundlerIntegration {
  pub fn new(public_manifest_path: impl Into<PathBuf>) -> Self {
    Self {
      public_manifest_path: public_manifest_path.into(),
    }
  }

  pub fn public_manifest_path(&self) -> &Path {
    &self.public_manifest_path
  }
}

/// Everything the host environment makes available.
#[derive(Default)]
pub struct HostCapabilities {
  pub native_manifest: Option<Box<dyn NativeManifest>>,
  pub bundler: Option<BundlerIntegration>,
  /// Manifest file name configured by the application, if any.
  pub manifest_filename: Option<String>,
}

impl HostCapabilities {
  pub fn bundler_enabled(&self) -> bool {
    self.bundler.is_some()
  }
}

impl std::fmt::Debug for HostCapabilities {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HostCapabilities")
      .field("native_manifest", &self.native_manifest.as_ref().map(|m| m.describe()))
      .field("bundler", &self.bundler)
      .field("manifest_filename", &self.manifest_filename)
      .finish()
  }
}

#[derive(Debug, Deserialize)]
struct SprocketsDocument {
  #[serde(default)]
  assets: serde_json::Map<String, serde_json::Value>,
}

/// The JSON manifest written by the asset pipeline next to compiled assets.
///
/// ```json
/// {
///   "files": { "application-1f2e.js": { "logical_path": "application.js" } },
///   "assets": { "application.js": "application-1f2e.js" }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SprocketsManifest {
  dir: PathBuf,
}

impl SprocketsManifest {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  /// Locate the manifest file in the directory, preferring the modern name.
  pub fn locate(&self) -> Result<PathBuf, ManifestError> {
    let entries = fs::read_dir(&self.dir).map_err(|e| ManifestError::Read {
      path: self.dir.clone(),
      source: e,
    })?;

    let mut names: Vec<String> = entries
      .flatten()
      .filter_map(|e| e.file_name().to_str().map(str::to_string))
      .collect();
    names.sort();

    names
      .iter()
      .find(|n| is_sprockets_manifest_name(n))
      .or_else(|| names.iter().find(|n| is_legacy_manifest_name(n)))
      .map(|n| self.dir.join(n))
      .ok_or_else(|| ManifestError::NativeNotFound(self.dir.clone()))
  }
}

impl NativeManifest for SprocketsManifest {
  fn compiled_assets(&self) -> Result<Vec<String>, ManifestError> {
    let path = self.locate()?;
    debug!(path = %path.display(), "reading native manifest");

    let content = fs::read_to_string(&path).map_err(|e| ManifestError::Read {
      path: path.clone(),
      source: e,
    })?;
    let doc: SprocketsDocument = serde_json::from_str(&content).map_err(|e| ManifestError::Json { path, source: e })?;

    Ok(
      doc
        .assets
        .values()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect(),
    )
  }

  fn describe(&self) -> String {
    self.dir.display().to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  const DIGEST: &str = "0123456789abcdef0123456789abcdef";

  #[test]
  fn reads_assets_from_modern_manifest() {
    let temp = TempDir::new().unwrap();
    fs::write(
      temp.path().join(format!(".sprockets-manifest-{}.json", DIGEST)),
      r#"{"files": {}, "assets": {"application.js": "application-1f2e.js", "logo.png": "logo-99.png"}}"#,
    )
    .unwrap();
    fs::write(temp.path().join("manifest.json"), r#"{"assets": {"old.js": "old-1.js"}}"#).unwrap();

    let assets = SprocketsManifest::new(temp.path()).compiled_assets().unwrap();

    assert_eq!(assets, vec!["application-1f2e.js", "logo-99.png"]);
  }

  #[test]
  fn falls_back_to_legacy_name() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("manifest-abc.json"), r#"{"assets": {"a.js": "a-1.js"}}"#).unwrap();

    let assets = SprocketsManifest::new(temp.path()).compiled_assets().unwrap();

    assert_eq!(assets, vec!["a-1.js"]);
  }

  #[test]
  fn empty_directory_has_no_manifest() {
    let temp = TempDir::new().unwrap();
    let err = SprocketsManifest::new(temp.path()).compiled_assets().unwrap_err();
    assert!(matches!(err, ManifestError::NativeNotFound(_)));
  }

  #[test]
  fn bundler_presence_is_explicit() {
    let mut host = HostCapabilities::default();
    assert!(!host.bundler_enabled());
    host.bundler = Some(BundlerIntegration::new("public/packs/manifest.json"));
    assert!(host.bundler_enabled());
  }
}
