//! HTTP-backed bucket.
//!
//! Objects are read with `GET {base_url}/{key}`. Public buckets do not offer a
//! portable listing endpoint, so the key listing comes from a JSON index
//! object stored in the bucket itself, either a bare array of keys or an
//! object with a `keys` array:
//!
//! ```json
//! { "keys": ["assets/application-1f2e3d.js", "assets/application-1f2e3d.js.gz"] }
//! ```

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use super::{RemoteObject, RemoteStorage, StorageError};
use crate::consts::{APP_NAME, DEFAULT_HTTP_LISTING_KEY};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing {
  Keys(Vec<String>),
  Wrapped { keys: Vec<String> },
}

impl Listing {
  fn into_keys(self) -> Vec<String> {
    match self {
      Listing::Keys(keys) | Listing::Wrapped { keys } => keys,
    }
  }
}

#[derive(Debug, Clone)]
pub struct HttpStorage {
  client: Client,
  base_url: String,
  listing_key: String,
}

impl HttpStorage {
  pub fn new(base_url: impl Into<String>, listing_key: Option<String>) -> Result<Self, StorageError> {
    let client = Client::builder()
      .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(StorageError::Client)?;
    Ok(Self {
      client,
      base_url: base_url.into(),
      listing_key: listing_key.unwrap_or_else(|| DEFAULT_HTTP_LISTING_KEY.to_string()),
    })
  }

  pub fn object_url(&self, key: &str) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), key.trim_start_matches('/'))
  }

  fn fetch(&self, url: &str) -> Result<reqwest::blocking::Response, StorageError> {
    debug!(url, "GET");
    self.client.get(url).send().map_err(|e| StorageError::Http {
      url: url.to_string(),
      source: e,
    })
  }
}

impl RemoteStorage for HttpStorage {
  fn list_keys(&self) -> Result<Vec<String>, StorageError> {
    let url = self.object_url(&self.listing_key);
    let response = self.fetch(&url)?;

    if !response.status().is_success() {
      return Err(StorageError::Status {
        url,
        status: response.status().as_u16(),
      });
    }

    let text = response.text().map_err(|e| StorageError::Http {
      url: url.clone(),
      source: e,
    })?;
    let listing: Listing = serde_json::from_str(&text).map_err(|e| StorageError::Listing { url, source: e })?;

    // The index describes the bucket, it is not part of it.
    Ok(
      listing
        .into_keys()
        .into_iter()
        .filter(|key| key != &self.listing_key)
        .collect(),
    )
  }

  fn get_object(&self, key: &str) -> Result<RemoteObject, StorageError> {
    let url = self.object_url(key);
    let response = self.fetch(&url)?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
      return Err(StorageError::NotFound(key.to_string()));
    }
    if !status.is_success() {
      return Err(StorageError::Status {
        url,
        status: status.as_u16(),
      });
    }

    let advertised = response.content_length();
    let body = response.bytes().map_err(|e| StorageError::Http { url, source: e })?.to_vec();
    let content_length = advertised.unwrap_or(body.len() as u64);

    Ok(RemoteObject { body, content_length })
  }

  fn describe(&self) -> String {
    format!("http {}", self.base_url)
  }
}
