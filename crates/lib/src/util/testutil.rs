//! Test utilities for assetsync-lib.
//!
//! Provides an in-memory bucket that records every fetch so tests can assert
//! on remote traffic as well as on the resulting files.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::storage::{RemoteObject, RemoteStorage, StorageError};

#[derive(Debug, Default)]
pub struct MemoryStorage {
  keys: Vec<String>,
  objects: HashMap<String, Vec<u8>>,
  asset_list: Option<Vec<String>>,
  fetched: RefCell<Vec<String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Bucket holding the given keys, each with its own name as content.
  pub fn with_keys(keys: &[&str]) -> Self {
    let mut storage = Self::new();
    for key in keys {
      storage.insert(key, key.as_bytes());
    }
    storage
  }

  pub fn insert(&mut self, key: &str, body: &[u8]) {
    if !self.objects.contains_key(key) {
      self.keys.push(key.to_string());
    }
    self.objects.insert(key.to_string(), body.to_vec());
  }

  pub fn with_asset_list(mut self, paths: Vec<String>) -> Self {
    self.asset_list = Some(paths);
    self
  }

  /// Keys fetched so far, in order.
  pub fn fetched(&self) -> Vec<String> {
    self.fetched.borrow().clone()
  }

  pub fn fetch_count(&self) -> usize {
    self.fetched.borrow().len()
  }
}

impl RemoteStorage for MemoryStorage {
  fn list_keys(&self) -> Result<Vec<String>, StorageError> {
    Ok(self.keys.clone())
  }

  fn get_object(&self, key: &str) -> Result<RemoteObject, StorageError> {
    self.fetched.borrow_mut().push(key.to_string());
    self
      .objects
      .get(key)
      .map(|body| RemoteObject::new(body.clone()))
      .ok_or_else(|| StorageError::NotFound(key.to_string()))
  }

  fn describe(&self) -> String {
    "memory".to_string()
  }

  fn manifest_asset_files(&self) -> Result<Option<Vec<String>>, StorageError> {
    Ok(self.asset_list.clone())
  }
}
