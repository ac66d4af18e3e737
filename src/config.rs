use crate::error::IconSearchError;
use crate::indexer::{IndexOptions, DEFAULT_MAX_DEPTH};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory tree that holds the image assets
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Where `index` writes the JSON snapshot
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Prefix for served asset paths
    #[serde(default = "default_mount_prefix")]
    pub mount_prefix: String,

    /// Leading folder removed from served paths
    #[serde(default = "default_public_dir")]
    pub public_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root() -> PathBuf {
    PathBuf::from("public")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/icons.json")
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_mount_prefix() -> String {
    "/".to_string()
}

fn default_public_dir() -> Option<String> {
    Some("public".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            snapshot_path: default_snapshot_path(),
            max_depth: default_max_depth(),
            mount_prefix: default_mount_prefix(),
            public_dir: default_public_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Default config file location, `<config dir>/icon-search/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("icon-search").join("config.yaml"))
    }

    /// Load the default config file if there is one, otherwise the defaults.
    pub fn load() -> Result<Self, IconSearchError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, IconSearchError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            max_depth: self.max_depth,
            mount_prefix: self.mount_prefix.clone(),
            public_dir: self.public_dir.clone(),
        }
    }
}
