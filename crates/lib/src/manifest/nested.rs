//! Bundler (webpacker) manifest.
//!
//! The bundler writes a JSON document mapping logical names to public paths,
//! with entrypoints nested further down:
//!
//! ```json
//! {
//!   "application.js": "/packs/js/application-8c1d.js",
//!   "entrypoints": { "application": { "js": ["/packs/js/application-8c1d.js"] } }
//! }
//! ```
//!
//! Every leaf string is a path of interest.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::{ManifestError, dedup_paths};
use crate::config::Config;
use crate::host::HostCapabilities;

fn collect_leaves(value: &Value, out: &mut Vec<String>) {
  match value {
    Value::String(s) => out.push(s.clone()),
    Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
    Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
    _ => {}
  }
}

/// Flatten a nested manifest into deduplicated paths with any leading `/`
/// removed.
pub fn flatten_manifest(doc: &Value) -> Vec<String> {
  let mut leaves = Vec::new();
  if let Value::Object(map) = doc {
    map.values().for_each(|v| collect_leaves(v, &mut leaves));
  }
  dedup_paths(leaves)
    .into_iter()
    .map(|p| p.strip_prefix('/').map(str::to_string).unwrap_or(p))
    .collect()
}

/// Parse a nested manifest document.
pub fn parse_nested_manifest(content: &str, source: &Path) -> Result<Vec<String>, ManifestError> {
  let doc: Value = serde_json::from_str(content).map_err(|e| ManifestError::Json {
    path: source.to_path_buf(),
    source: e,
  })?;
  if !doc.is_object() {
    return Err(ManifestError::NotMapping {
      path: source.to_path_buf(),
    });
  }
  Ok(flatten_manifest(&doc))
}

/// Resolve the asset list from the bundler's public manifest.
///
/// Returns `Ok(None)` when manifests are disabled or no bundler is present.
pub fn resolve_nested_manifest(config: &Config, host: &HostCapabilities) -> Result<Option<Vec<String>>, ManifestError> {
  if !config.manifest {
    return Ok(None);
  }
  let Some(bundler) = &host.bundler else {
    return Ok(None);
  };

  let path = bundler.public_manifest_path();
  info!("Using: Webpacker manifest {}", path.display());
  let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
    path: path.to_path_buf(),
    source: e,
  })?;
  parse_nested_manifest(&content, path).map(Some)
}
