//! Where the search engine gets its records from: a live walk of the asset
//! root or a JSON snapshot written ahead of time by `index`.

use crate::error::IconSearchError;
use crate::indexer::{self, IndexOptions};
use crate::models::FileRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load(&self) -> Result<Vec<FileRecord>, IconSearchError>;

    fn describe(&self) -> String;
}

/// Re-indexes the directory on every load.
pub struct LiveDirectory {
    root: PathBuf,
    options: IndexOptions,
}

impl LiveDirectory {
    pub fn new(root: impl Into<PathBuf>, options: IndexOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }
}

#[async_trait]
impl SnapshotSource for LiveDirectory {
    async fn load(&self) -> Result<Vec<FileRecord>, IconSearchError> {
        let root = self.root.clone();
        let options = self.options.clone();
        let records =
            tokio::task::spawn_blocking(move || indexer::index_directory(&root, &options)).await?;
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for SnapshotFile {
    async fn load(&self) -> Result<Vec<FileRecord>, IconSearchError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let records: Vec<FileRecord> = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), count = records.len(), "Loaded icon snapshot");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }
}

pub async fn write_snapshot(path: &Path, records: &[FileRecord]) -> Result<(), IconSearchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_vec_pretty(records)?;
    tokio::fs::write(path, json).await?;

    info!(path = %path.display(), count = records.len(), "Wrote icon snapshot");
    Ok(())
}
