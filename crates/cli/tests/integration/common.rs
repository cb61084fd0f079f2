//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project with a directory-backed bucket.
///
/// Layout:
/// - `config/asset_sync.yml`
/// - `bucket/` (the remote side)
/// - `public/` (the local side)
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create a project whose config points at the local bucket directory.
  ///
  /// `extra` is appended to the config verbatim.
  pub fn new(extra: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };
    env.write_file(
      "config/asset_sync.yml",
      &format!("public_path: public\nstorage:\n  provider: local\n  root: bucket\n{}", extra),
    );
    std::fs::create_dir_all(env.bucket_path()).unwrap();
    env
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn bucket_path(&self) -> PathBuf {
    self.temp.path().join("bucket")
  }

  pub fn public_path(&self) -> PathBuf {
    self.temp.path().join("public")
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Put an object in the bucket.
  pub fn put_remote(&self, key: &str, content: &str) {
    self.write_file(&format!("bucket/{}", key), content);
  }

  /// Put a file in the public path.
  pub fn put_local(&self, key: &str, content: &str) {
    self.write_file(&format!("public/{}", key), content);
  }

  pub fn read_local(&self, key: &str) -> String {
    std::fs::read_to_string(self.public_path().join(key)).unwrap()
  }

  /// Get a pre-configured Command for the assetsync binary.
  ///
  /// Runs from the project root with environment overrides cleared.
  pub fn cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("assetsync");
    cmd.current_dir(self.root());
    cmd.env_remove("ASSETSYNC_CONFIG");
    cmd.env_remove("ASSETSYNC_PUBLIC_PATH");
    cmd.env_remove("ASSETSYNC_PREFIX");
    cmd.env_remove("ASSETSYNC_MANIFEST");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
