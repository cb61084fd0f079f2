//! assetsync-lib: Core logic for assetsync
//!
//! This crate decides which compiled web assets must be fetched from a remote
//! bucket into a local public directory, and fetches them:
//! - `config`: YAML configuration with environment overrides
//! - `storage`: the `RemoteStorage` trait and its directory/HTTP backends
//! - `host`: capabilities of the host application (native manifest, bundler)
//! - `manifest`: manifest parsing and manifest key lookup
//! - `download`: gzip expansion and the sequential download pipeline

pub mod config;
pub mod consts;
pub mod download;
pub mod host;
pub mod manifest;
pub mod storage;
pub mod util;
