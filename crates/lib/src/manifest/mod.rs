//! Manifest resolution.
//!
//! Works out which asset paths should exist locally without enumerating the
//! whole bucket. Three manifest dialects are understood:
//!
//! - the legacy YAML manifest, a flat `original: compiled` mapping
//! - the framework-native JSON manifest (see [`crate::host::SprocketsManifest`])
//! - the bundler's nested JSON manifest, flattened down to its leaf paths
//!
//! When none of these yields a result the caller falls back to the full
//! remote listing.

mod key;
mod legacy;
mod nested;

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

pub use key::{find_manifest_key, find_webpacker_manifest_key, is_legacy_manifest_name, is_sprockets_manifest_name};
pub use legacy::{is_font_asset, parse_legacy_manifest, resolve_legacy_manifest};
pub use nested::{flatten_manifest, parse_nested_manifest, resolve_nested_manifest};

use crate::storage::StorageError;

/// Errors that can occur while reading manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// Failed to read a manifest file.
  #[error("failed to read manifest '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Failed to parse a YAML manifest.
  #[error("failed to parse manifest '{path}': {source}")]
  Yaml {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  /// Failed to parse a JSON manifest.
  #[error("failed to parse manifest '{path}': {source}")]
  Json {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// The document parsed but is not a mapping.
  #[error("manifest '{path}' is not a mapping")]
  NotMapping { path: PathBuf },

  /// No native manifest file in the configured directory.
  #[error("no native manifest found in '{0}'")]
  NativeNotFound(PathBuf),

  /// The storage backend failed to provide its asset list.
  #[error(transparent)]
  Storage(#[from] StorageError),
}

/// Join a compiled asset path onto the asset URL prefix.
pub fn join_prefix(prefix: &str, path: &str) -> String {
  let prefix = prefix.trim_end_matches('/');
  let path = path.trim_start_matches('/');
  if prefix.is_empty() {
    path.to_string()
  } else {
    format!("{}/{}", prefix, path)
  }
}

/// Drop repeated entries, keeping the first occurrence of each.
pub fn dedup_paths(paths: Vec<String>) -> Vec<String> {
  let mut seen = HashSet::with_capacity(paths.len());
  paths.into_iter().filter(|p| seen.insert(p.clone())).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn join_prefix_collapses_slashes() {
    assert_eq!(join_prefix("assets", "app.js"), "assets/app.js");
    assert_eq!(join_prefix("assets/", "/app.js"), "assets/app.js");
    assert_eq!(join_prefix("", "app.js"), "app.js");
  }

  #[test]
  fn dedup_keeps_first_occurrence() {
    let paths = vec!["b".to_string(), "a".to_string(), "b".to_string(), "c".to_string()];
    assert_eq!(dedup_paths(paths), vec!["b", "a", "c"]);
  }
}
