//! Configuration loading.
//!
//! Configuration lives in a YAML file (by default `config/asset_sync.yml`
//! below the project root):
//!
//! ```yaml
//! public_path: public
//! prefix: assets
//! manifest: true
//! # manifest_path: public/assets/manifest.yml
//! # sprockets_manifest: .sprockets-manifest-0123456789abcdef0123456789abcdef.json
//! # native_manifest_dir: public/assets
//! webpacker:
//!   public_manifest_path: public/packs/manifest.json
//! storage:
//!   provider: local
//!   root: /mnt/assets-bucket
//! ```
//!
//! Relative paths are resolved against the project root. A few settings can
//! be overridden from the environment (`ASSETSYNC_PUBLIC_PATH`,
//! `ASSETSYNC_PREFIX`, `ASSETSYNC_MANIFEST`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  CONFIG_ENV, DEFAULT_ASSETS_PREFIX, DEFAULT_CONFIG_PATH, DEFAULT_PUBLIC_PATH, LEGACY_MANIFEST_FILENAME,
  MANIFEST_ENV, PREFIX_ENV, PUBLIC_PATH_ENV,
};
use crate::host::{BundlerIntegration, HostCapabilities, SprocketsManifest};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// No config file at any of the searched locations.
  #[error("config file not found: {path}")]
  NotFound { path: PathBuf },

  /// Failed to read the config file.
  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to parse the config file YAML.
  #[error("failed to parse config file '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  /// An environment override holds a value that cannot be used.
  #[error("invalid value '{value}' for {name}")]
  InvalidEnv { name: &'static str, value: String },
}

/// Where remote objects come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum StorageConfig {
  /// A bucket available as a local directory.
  Local { root: PathBuf },
  /// A bucket readable over HTTP.
  Http {
    url: String,
    /// Key of the JSON listing object.
    #[serde(default)]
    listing: Option<String>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebpackerSection {
  pub public_manifest_path: PathBuf,
}

/// On-disk shape of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
  #[serde(default)]
  pub public_path: Option<PathBuf>,
  #[serde(default)]
  pub prefix: Option<String>,
  #[serde(default)]
  pub manifest: Option<bool>,
  #[serde(default)]
  pub manifest_path: Option<PathBuf>,
  #[serde(default)]
  pub sprockets_manifest: Option<String>,
  #[serde(default)]
  pub native_manifest_dir: Option<PathBuf>,
  #[serde(default)]
  pub webpacker: Option<WebpackerSection>,
  pub storage: StorageConfig,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Local directory assets are downloaded into.
  pub public_path: PathBuf,
  /// URL prefix of compiled assets, e.g. `assets`.
  pub assets_prefix: String,
  /// Whether manifests are consulted at all.
  pub manifest: bool,
  /// Legacy YAML manifest location.
  pub manifest_path: PathBuf,
  /// Explicitly configured manifest file name.
  pub sprockets_manifest: Option<String>,
  /// Directory holding a framework-native manifest.
  pub native_manifest_dir: Option<PathBuf>,
  /// Bundler public manifest path, when the bundler is in use.
  pub webpacker_manifest_path: Option<PathBuf>,
  pub storage: StorageConfig,
}

impl Config {
  /// Configuration with defaults for everything but the local root and the
  /// storage backend.
  pub fn new(public_path: impl Into<PathBuf>, storage: StorageConfig) -> Self {
    let public_path = public_path.into();
    let manifest_path = public_path.join(DEFAULT_ASSETS_PREFIX).join(LEGACY_MANIFEST_FILENAME);
    Self {
      public_path,
      assets_prefix: DEFAULT_ASSETS_PREFIX.to_string(),
      manifest: false,
      manifest_path,
      sprockets_manifest: None,
      native_manifest_dir: None,
      webpacker_manifest_path: None,
      storage,
    }
  }

  /// Load and resolve a config file, applying environment overrides.
  pub fn load(path: &Path, root: &Path) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
      }
      Err(e) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;

    debug!(path = %path.display(), "loaded config file");
    Self::resolve(file, root)
  }

  /// Resolve a parsed config file against the project root.
  pub fn resolve(mut file: ConfigFile, root: &Path) -> Result<Self, ConfigError> {
    apply_env_overrides(&mut file)?;

    let public_path = root.join(file.public_path.unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_PATH)));
    let assets_prefix = file.prefix.unwrap_or_else(|| DEFAULT_ASSETS_PREFIX.to_string());
    let manifest_path = match file.manifest_path {
      Some(p) => root.join(p),
      None => public_path.join(&assets_prefix).join(LEGACY_MANIFEST_FILENAME),
    };

    let storage = match file.storage {
      StorageConfig::Local { root: bucket } => StorageConfig::Local {
        root: root.join(bucket),
      },
      http => http,
    };

    Ok(Self {
      public_path,
      assets_prefix,
      manifest: file.manifest.unwrap_or(false),
      manifest_path,
      sprockets_manifest: file.sprockets_manifest,
      native_manifest_dir: file.native_manifest_dir.map(|p| root.join(p)),
      webpacker_manifest_path: file.webpacker.map(|w| root.join(w.public_manifest_path)),
      storage,
    })
  }

  /// Describe what the host environment offers, based on this config.
  pub fn host_capabilities(&self) -> HostCapabilities {
    let mut host = HostCapabilities::default();
    if let Some(dir) = &self.native_manifest_dir {
      host.native_manifest = Some(Box::new(SprocketsManifest::new(dir.clone())));
    }
    if let Some(path) = &self.webpacker_manifest_path {
      host.bundler = Some(BundlerIntegration::new(path.clone()));
    }
    host.manifest_filename = self.sprockets_manifest.clone();
    host
  }
}

fn apply_env_overrides(file: &mut ConfigFile) -> Result<(), ConfigError> {
  if let Ok(value) = std::env::var(PUBLIC_PATH_ENV) {
    file.public_path = Some(PathBuf::from(value));
  }
  if let Ok(value) = std::env::var(PREFIX_ENV) {
    file.prefix = Some(value);
  }
  if let Ok(value) = std::env::var(MANIFEST_ENV) {
    file.manifest = Some(parse_bool(MANIFEST_ENV, &value)?);
  }
  Ok(())
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" | "" => Ok(false),
    _ => Err(ConfigError::InvalidEnv {
      name,
      value: value.to_string(),
    }),
  }
}

/// Find the config file path.
///
/// Priority order:
/// 1. Explicit path if provided
/// 2. `ASSETSYNC_CONFIG` environment variable
/// 3. `config/asset_sync.yml` below the project root
pub fn find_config_path(explicit: Option<&Path>, root: &Path) -> Result<PathBuf, ConfigError> {
  let candidate = match explicit {
    Some(path) => root.join(path),
    None => match std::env::var(CONFIG_ENV) {
      Ok(path) => root.join(path),
      Err(_) => root.join(DEFAULT_CONFIG_PATH),
    },
  };

  if candidate.exists() {
    Ok(dunce::canonicalize(&candidate).unwrap_or(candidate))
  } else {
    Err(ConfigError::NotFound { path: candidate })
  }
}
