mod download;
mod plan;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use assetsync_lib::config::{Config, find_config_path};
use assetsync_lib::host::HostCapabilities;
use assetsync_lib::storage::{RemoteStorage, open_storage};

pub use download::cmd_download;
pub use plan::cmd_plan;

/// Everything a command needs, built once per invocation.
pub struct Session {
  pub config: Config,
  pub host: HostCapabilities,
  pub storage: Box<dyn RemoteStorage>,
}

impl Session {
  pub fn open(config: Option<&Path>, root: Option<&Path>) -> Result<Self> {
    let root = match root {
      Some(root) => root.to_path_buf(),
      None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let root = dunce::canonicalize(&root).unwrap_or(root);

    let config_path = find_config_path(config, &root).context("Failed to find config file")?;
    let config = Config::load(&config_path, &root)
      .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    let host = config.host_capabilities();
    let storage = open_storage(&config.storage).context("Failed to open storage")?;

    debug!(storage = %storage.describe(), ?host, "session ready");
    Ok(Self { config, host, storage })
  }
}
