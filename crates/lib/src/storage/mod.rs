//! Remote object storage.
//!
//! The downloader never talks to a bucket directly; it goes through the
//! [`RemoteStorage`] trait so that authentication, transport and bucket
//! configuration stay the backend's concern.
//!
//! Two backends ship with the crate:
//! - [`DirectoryStorage`]: a bucket mirrored or mounted on the local filesystem
//! - [`HttpStorage`]: a publicly readable bucket served over HTTP

mod http;
mod local;

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

pub use http::HttpStorage;
pub use local::DirectoryStorage;

use crate::config::StorageConfig;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
  /// The requested key does not exist in the bucket.
  #[error("object not found: {0}")]
  NotFound(String),

  /// Failed to read from a directory-backed bucket.
  #[error("failed to read '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Failed to walk a directory-backed bucket.
  #[error("failed to list bucket directory '{path}': {source}")]
  List {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  /// The HTTP client could not be set up.
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  /// HTTP request failed.
  #[error("request to {url} failed: {source}")]
  Http {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// Server answered with a non-success status.
  #[error("request to {url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  /// The bucket listing document could not be parsed.
  #[error("invalid bucket listing at {url}: {source}")]
  Listing {
    url: String,
    #[source]
    source: serde_json::Error,
  },
}

/// An object fetched from the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
  pub body: Vec<u8>,
  /// Length reported by the backend, which may differ from `body.len()` for
  /// transports that advertise it separately.
  pub content_length: u64,
}

impl RemoteObject {
  pub fn new(body: Vec<u8>) -> Self {
    let content_length = body.len() as u64;
    Self { body, content_length }
  }
}

/// Capabilities the downloader needs from a bucket.
pub trait RemoteStorage {
  /// Lists every key in the bucket, in the backend's natural order.
  fn list_keys(&self) -> Result<Vec<String>, StorageError>;

  /// Fetches a single object.
  fn get_object(&self, key: &str) -> Result<RemoteObject, StorageError>;

  /// Short human readable description used in log lines.
  fn describe(&self) -> String;

  /// Backends that know the asset list on their own may return it here, which
  /// takes precedence over any manifest on disk.
  fn manifest_asset_files(&self) -> Result<Option<Vec<String>>, StorageError> {
    Ok(None)
  }
}

/// Builds the storage backend described by the config.
pub fn open_storage(config: &StorageConfig) -> Result<Box<dyn RemoteStorage>, StorageError> {
  let storage: Box<dyn RemoteStorage> = match config {
    StorageConfig::Local { root } => Box::new(DirectoryStorage::new(root.clone())),
    StorageConfig::Http { url, listing } => Box::new(HttpStorage::new(url.clone(), listing.clone())?),
  };
  Ok(storage)
}

/// Snapshot of the keys present in the bucket.
///
/// Keeps the listing order, since manifest lookup picks the first match, and
/// an index for membership checks.
#[derive(Debug, Clone, Default)]
pub struct RemoteFileSet {
  keys: Vec<String>,
  index: HashSet<String>,
}

impl RemoteFileSet {
  /// Lists the bucket once and captures the result.
  pub fn fetch(storage: &dyn RemoteStorage) -> Result<Self, StorageError> {
    Ok(Self::from_keys(storage.list_keys()?))
  }

  pub fn from_keys<I, S>(keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut set = Self::default();
    for key in keys {
      let key = key.into();
      if set.index.insert(key.clone()) {
        set.keys.push(key);
      }
    }
    set
  }

  pub fn contains(&self, key: &str) -> bool {
    self.index.contains(key)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.keys.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }

  /// Listing order, as an owned path list.
  pub fn to_vec(&self) -> Vec<String> {
    self.keys.clone()
  }
}
