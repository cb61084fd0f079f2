//! Shared constants.

pub const APP_NAME: &str = "assetsync";

/// Config file location, relative to the project root.
pub const DEFAULT_CONFIG_PATH: &str = "config/asset_sync.yml";

/// Environment variable pointing at an alternate config file.
pub const CONFIG_ENV: &str = "ASSETSYNC_CONFIG";

pub const PUBLIC_PATH_ENV: &str = "ASSETSYNC_PUBLIC_PATH";
pub const PREFIX_ENV: &str = "ASSETSYNC_PREFIX";
pub const MANIFEST_ENV: &str = "ASSETSYNC_MANIFEST";

pub const DEFAULT_PUBLIC_PATH: &str = "public";
pub const DEFAULT_ASSETS_PREFIX: &str = "assets";

/// Legacy manifest file name inside the assets directory.
pub const LEGACY_MANIFEST_FILENAME: &str = "manifest.yml";

/// Key of the JSON index listing every object in an HTTP bucket.
pub const DEFAULT_HTTP_LISTING_KEY: &str = "index.json";

/// Suffix of the precompressed sibling uploaded next to an asset.
pub const GZIP_SUFFIX: &str = ".gz";
