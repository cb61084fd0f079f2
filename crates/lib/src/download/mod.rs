//! Downloading assets from the bucket into the public path.
//!
//! Every invocation is a single linear pipeline: resolve the paths for the
//! target, add gzip siblings, then fetch each file in order. There is no retry
//! and no rollback; an error aborts the remaining files and leaves whatever
//! was already written in place.

mod types;

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::info;

pub use types::{DownloadError, DownloadOutcome, DownloadReport, DownloadTarget, DownloadedFile, PlannedFile};

use crate::config::Config;
use crate::consts::GZIP_SUFFIX;
use crate::host::HostCapabilities;
use crate::manifest::{
  dedup_paths, find_manifest_key, find_webpacker_manifest_key, resolve_legacy_manifest, resolve_nested_manifest,
};
use crate::storage::{RemoteFileSet, RemoteStorage};

/// Follow each path with its `.gz` sibling when the bucket has one.
pub fn expand_with_compressed_variants(paths: &[String], files: &RemoteFileSet) -> Vec<String> {
  let mut expanded = Vec::with_capacity(paths.len());
  for path in paths {
    expanded.push(path.clone());
    let gzipped = format!("{}{}", path, GZIP_SUFFIX);
    if files.contains(&gzipped) {
      expanded.push(gzipped);
    }
  }
  expanded
}

/// Map a bucket key to a path below `root`, refusing keys that escape it.
pub fn local_path_for(root: &Path, key: &str) -> Result<PathBuf, DownloadError> {
  let rel = Path::new(key.trim_start_matches('/'));
  let safe = rel.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
  let file_name = key.rsplit('/').next().unwrap_or_default();
  if !safe || file_name.is_empty() || file_name == "." {
    return Err(DownloadError::UnsafeKey(key.to_string()));
  }
  Ok(root.join(rel))
}

/// Fetches remote assets into the configured public path.
pub struct Downloader<'a> {
  config: &'a Config,
  host: &'a HostCapabilities,
  storage: &'a dyn RemoteStorage,
}

impl<'a> Downloader<'a> {
  pub fn new(config: &'a Config, host: &'a HostCapabilities, storage: &'a dyn RemoteStorage) -> Self {
    Self { config, host, storage }
  }

  /// Snapshot of the bucket contents.
  pub fn remote_files(&self) -> Result<RemoteFileSet, DownloadError> {
    Ok(RemoteFileSet::fetch(self.storage)?)
  }

  /// Download a single key. With `skip_if_exists` an existing local file is
  /// left alone and nothing is fetched.
  pub fn download_one(&self, key: &str, skip_if_exists: bool) -> Result<DownloadOutcome, DownloadError> {
    let local_path = local_path_for(&self.config.public_path, key)?;
    if skip_if_exists && local_path.exists() {
      info!("Skipped: {}", key);
      return Ok(DownloadOutcome::Skipped);
    }

    let object = self.storage.get_object(key)?;

    if let Some(dir) = local_path.parent() {
      fs::create_dir_all(dir).map_err(|e| DownloadError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
      })?;
    }
    fs::write(&local_path, &object.body).map_err(|e| DownloadError::Write {
      path: local_path.clone(),
      source: e,
    })?;

    info!("Downloaded: {} ({} Bytes)", key, object.content_length);
    Ok(DownloadOutcome::Downloaded {
      bytes: object.content_length,
    })
  }

  /// Compiled assets from the legacy or native manifest, or the whole bucket.
  pub fn download_asset_files(&self) -> Result<DownloadReport, DownloadError> {
    let paths = self.asset_file_paths()?;
    self.download_all(DownloadTarget::AssetFiles, &paths)
  }

  /// Bundled assets from the bundler manifest, or the whole bucket. Does
  /// nothing when no bundler is present.
  pub fn download_webpacker_asset_files(&self) -> Result<DownloadReport, DownloadError> {
    let paths = self.webpacker_asset_file_paths()?;
    self.download_all(DownloadTarget::WebpackerAssetFiles, &paths)
  }

  /// The framework manifest, always refreshed.
  pub fn download_manifest(&self) -> Result<DownloadReport, DownloadError> {
    let paths = self.manifest_paths()?;
    self.download_all(DownloadTarget::Manifest, &paths)
  }

  /// The bundler manifest, always refreshed. Does nothing when no bundler is
  /// present.
  pub fn download_webpacker_manifest(&self) -> Result<DownloadReport, DownloadError> {
    let paths = self.webpacker_manifest_paths()?;
    self.download_all(DownloadTarget::WebpackerManifest, &paths)
  }

  pub fn download(&self, target: DownloadTarget) -> Result<DownloadReport, DownloadError> {
    info!("AssetSync: Downloading {}.", target);
    let report = match target {
      DownloadTarget::Manifest => self.download_manifest()?,
      DownloadTarget::AssetFiles => self.download_asset_files()?,
      DownloadTarget::WebpackerManifest => self.download_webpacker_manifest()?,
      DownloadTarget::WebpackerAssetFiles => self.download_webpacker_asset_files()?,
    };
    info!("AssetSync: Done.");
    Ok(report)
  }

  /// Like [`Downloader::download`], taking the target by name.
  pub fn download_named(&self, target: &str) -> Result<DownloadReport, DownloadError> {
    self.download(target.parse()?)
  }

  /// The files `download` would touch for `target`, without fetching any.
  pub fn plan(&self, target: DownloadTarget) -> Result<Vec<PlannedFile>, DownloadError> {
    let paths = self.paths_for(target)?;
    paths
      .into_iter()
      .map(|path| {
        let local_path = local_path_for(&self.config.public_path, &path)?;
        Ok(PlannedFile {
          exists: local_path.exists(),
          skip_if_exists: target.skip_if_exists(),
          local_path,
          path,
        })
      })
      .collect()
  }

  fn paths_for(&self, target: DownloadTarget) -> Result<Vec<String>, DownloadError> {
    match target {
      DownloadTarget::Manifest => self.manifest_paths(),
      DownloadTarget::AssetFiles => self.asset_file_paths(),
      DownloadTarget::WebpackerManifest => self.webpacker_manifest_paths(),
      DownloadTarget::WebpackerAssetFiles => self.webpacker_asset_file_paths(),
    }
  }

  fn download_all(&self, target: DownloadTarget, paths: &[String]) -> Result<DownloadReport, DownloadError> {
    let mut report = DownloadReport::new(target);
    for path in paths {
      let outcome = self.download_one(path, target.skip_if_exists())?;
      report.record(path, outcome);
    }
    Ok(report)
  }

  fn with_fallback(&self, resolved: Option<Vec<String>>, files: &RemoteFileSet) -> Vec<String> {
    let paths = resolved.unwrap_or_else(|| {
      info!("Using: Remote Directory Search");
      files.to_vec()
    });
    // A full listing already holds the `.gz` siblings.
    dedup_paths(expand_with_compressed_variants(&paths, files))
  }

  fn asset_file_paths(&self) -> Result<Vec<String>, DownloadError> {
    let resolved = resolve_legacy_manifest(self.config, self.host, self.storage)?;
    let files = self.remote_files()?;
    Ok(self.with_fallback(resolved, &files))
  }

  fn webpacker_asset_file_paths(&self) -> Result<Vec<String>, DownloadError> {
    if !self.host.bundler_enabled() {
      return Ok(Vec::new());
    }
    let resolved = resolve_nested_manifest(self.config, self.host)?;
    let files = self.remote_files()?;
    Ok(self.with_fallback(resolved, &files))
  }

  fn manifest_paths(&self) -> Result<Vec<String>, DownloadError> {
    let files = self.remote_files()?;
    let key = find_manifest_key(&files, self.host.manifest_filename.as_deref()).ok_or(
      DownloadError::ManifestNotFound {
        target: DownloadTarget::Manifest,
      },
    )?;
    Ok(vec![key.to_string()])
  }

  fn webpacker_manifest_paths(&self) -> Result<Vec<String>, DownloadError> {
    let Some(bundler) = &self.host.bundler else {
      return Ok(Vec::new());
    };
    let files = self.remote_files()?;
    let key = find_webpacker_manifest_key(&files, bundler.public_manifest_path()).ok_or(
      DownloadError::ManifestNotFound {
        target: DownloadTarget::WebpackerManifest,
      },
    )?;
    Ok(vec![key.to_string()])
  }
}
