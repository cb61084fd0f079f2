//! Locating manifest objects in the bucket.
//!
//! Matching looks at the file name only. When several keys in different
//! directories share a file name, the first one in listing order wins.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::storage::RemoteFileSet;

static SPROCKETS_MANIFEST_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\.sprockets-manifest-[0-9a-f]{32}\.json$").expect("sprockets manifest pattern is valid")
});

static LEGACY_MANIFEST_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^manifest(-[0-9a-f]+)?\.json$").expect("legacy manifest pattern is valid"));

fn basename(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}

pub fn is_sprockets_manifest_name(name: &str) -> bool {
  SPROCKETS_MANIFEST_RE.is_match(name)
}

pub fn is_legacy_manifest_name(name: &str) -> bool {
  LEGACY_MANIFEST_RE.is_match(name)
}

/// Find the framework manifest key.
///
/// An explicitly configured file name is authoritative; otherwise the modern
/// `.sprockets-manifest-<digest>.json` name is preferred over the legacy
/// `manifest[-<digest>].json`.
pub fn find_manifest_key<'a>(files: &'a RemoteFileSet, explicit: Option<&str>) -> Option<&'a str> {
  if let Some(explicit) = explicit {
    let wanted = basename(explicit);
    debug!(wanted, "looking for configured manifest");
    return files.iter().find(|f| basename(f) == wanted);
  }

  files
    .iter()
    .find(|f| is_sprockets_manifest_name(basename(f)))
    .or_else(|| files.iter().find(|f| is_legacy_manifest_name(basename(f))))
}

/// Find the key whose file name matches the bundler's public manifest.
pub fn find_webpacker_manifest_key<'a>(files: &'a RemoteFileSet, public_manifest_path: &Path) -> Option<&'a str> {
  let wanted = public_manifest_path.file_name()?.to_str()?;
  files.iter().find(|f| basename(f) == wanted)
}
