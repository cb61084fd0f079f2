//! Legacy flat manifest.
//!
//! ```yaml
//! application.js: application-1f2e3d4c.js
//! fontawesome.woff: fontawesome-9a8b7c.woff
//! ```
//!
//! Fonts are often referenced by their original name from CSS, so for font
//! entries both names are wanted locally.

use std::fs;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;
use tracing::{info, warn};

use super::{ManifestError, dedup_paths, join_prefix};
use crate::config::Config;
use crate::host::HostCapabilities;
use crate::storage::RemoteStorage;

static FONT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^.+(eot|svg|ttf|woff)$").expect("font pattern is valid"));

/// Whether an original asset name looks like a font.
pub fn is_font_asset(original: &str) -> bool {
  FONT_RE.is_match(original)
}

fn compiled_names(value: &Value) -> Vec<String> {
  match value {
    Value::String(s) => vec![s.clone()],
    Value::Sequence(items) => items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
    _ => Vec::new(),
  }
}

/// Parse a legacy manifest document into prefixed, deduplicated asset paths.
pub fn parse_legacy_manifest(content: &str, prefix: &str, source: &std::path::Path) -> Result<Vec<String>, ManifestError> {
  let doc: Value = serde_yaml::from_str(content).map_err(|e| ManifestError::Yaml {
    path: source.to_path_buf(),
    source: e,
  })?;

  let mapping = match doc {
    Value::Mapping(m) => m,
    Value::Null => return Ok(Vec::new()),
    _ => {
      return Err(ManifestError::NotMapping {
        path: source.to_path_buf(),
      });
    }
  };

  let mut paths = Vec::new();
  for (original, compiled) in &mapping {
    let Some(original) = original.as_str() else {
      continue;
    };
    if is_font_asset(original) {
      paths.push(original.to_string());
    }
    paths.extend(compiled_names(compiled));
  }

  Ok(dedup_paths(paths.iter().map(|p| join_prefix(prefix, p)).collect()))
}

/// Resolve the asset list from the legacy or native manifest.
///
/// Returns `Ok(None)` when no manifest is available, in which case the caller
/// should fall back to the full remote listing.
pub fn resolve_legacy_manifest(
  config: &Config,
  host: &HostCapabilities,
  storage: &dyn RemoteStorage,
) -> Result<Option<Vec<String>>, ManifestError> {
  if let Some(paths) = storage.manifest_asset_files()? {
    info!("Using: asset list from {}", storage.describe());
    return Ok(Some(paths));
  }

  if !config.manifest {
    return Ok(None);
  }

  if let Some(native) = &host.native_manifest {
    info!("Using: native manifest {}", native.describe());
    let compiled = native.compiled_assets()?;
    return Ok(Some(
      compiled.iter().map(|f| join_prefix(&config.assets_prefix, f)).collect(),
    ));
  }

  let path = &config.manifest_path;
  if path.exists() {
    info!("Using: Manifest {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
      path: path.clone(),
      source: e,
    })?;
    return parse_legacy_manifest(&content, &config.assets_prefix, path).map(Some);
  }

  warn!("Warning: Manifest could not be found");
  Ok(None)
}
