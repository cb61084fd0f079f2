//! Directory-backed bucket.
//!
//! Treats a local directory (a mounted bucket, an `rclone` mirror, a test
//! fixture) as the remote side. Keys are `/`-separated paths relative to the
//! directory root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{RemoteObject, RemoteStorage, StorageError};

#[derive(Debug, Clone)]
pub struct DirectoryStorage {
  root: PathBuf,
}

impl DirectoryStorage {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }
}

/// Turns a path below `root` into a bucket key.
fn key_for(root: &Path, path: &Path) -> Option<String> {
  let rel = path.strip_prefix(root).ok()?;
  let parts: Vec<_> = rel.components().map(|c| c.as_os_str().to_string_lossy()).collect();
  if parts.is_empty() {
    return None;
  }
  Some(parts.join("/"))
}

impl RemoteStorage for DirectoryStorage {
  fn list_keys(&self) -> Result<Vec<String>, StorageError> {
    let mut keys = Vec::new();

    for entry in WalkDir::new(&self.root).sort_by_file_name() {
      let entry = entry.map_err(|e| StorageError::List {
        path: self.root.clone(),
        source: e,
      })?;
      if !entry.file_type().is_file() {
        continue;
      }
      if let Some(key) = key_for(&self.root, entry.path()) {
        keys.push(key);
      }
    }

    debug!(root = %self.root.display(), count = keys.len(), "listed directory bucket");
    Ok(keys)
  }

  fn get_object(&self, key: &str) -> Result<RemoteObject, StorageError> {
    let path = self.root.join(key);
    match fs::read(&path) {
      Ok(body) => Ok(RemoteObject::new(body)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
      Err(e) => Err(StorageError::Read { path, source: e }),
    }
  }

  fn describe(&self) -> String {
    format!("directory {}", self.root.display())
  }
}
