//! Image discovery under an asset root.
//!
//! The walk is fail-open: a missing root yields an empty index, unreadable
//! entries are logged and skipped, and branches deeper than the configured
//! cap are pruned with a warning.

use crate::models::{FileRecord, ROOT_DIRECTORY};
use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

const IMAGE_EXTENSIONS: &[&str] = &["svg", "png", "jpg", "jpeg", "gif", "webp", "ico"];

pub const DEFAULT_MAX_DEPTH: usize = 10;

#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Deepest directory level that is still read (the root is level 0).
    pub max_depth: usize,
    /// Prefix prepended to every served path.
    pub mount_prefix: String,
    /// Leading folder stripped from relative paths before they are served.
    pub public_dir: Option<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            mount_prefix: "/".to_string(),
            public_dir: Some("public".to_string()),
        }
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .map_or(false, |ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "node_modules"
}

pub fn index_directory(root: &Path, options: &IndexOptions) -> Vec<FileRecord> {
    if !root.is_dir() {
        warn!(root = %root.display(), "Icon root is missing, serving an empty index");
        return Vec::new();
    }

    let max_depth = options.max_depth;
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            if is_excluded_dir(entry) {
                debug!(path = %entry.path().display(), "Skipping excluded directory");
                return false;
            }
            if entry.depth() > max_depth {
                warn!(
                    path = %entry.path().display(),
                    max_depth = max_depth,
                    "Maximum scan depth reached, not descending"
                );
                return false;
            }
            true
        });

    let mut records = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_image(entry.path()) {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => {
                if let Some(record) = build_record(root, entry.path(), &metadata, options) {
                    records.push(record);
                }
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to stat file");
            }
        }
    }

    records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    info!(root = %root.display(), count = records.len(), "Indexed icons");
    records
}

fn build_record(
    root: &Path,
    path: &Path,
    metadata: &Metadata,
    options: &IndexOptions,
) -> Option<FileRecord> {
    let relative = path.strip_prefix(root).ok()?;
    let relative_path = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let name = path.file_name()?.to_string_lossy().to_string();
    if name.is_empty() {
        return None;
    }

    let directory = match relative_path.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => ROOT_DIRECTORY.to_string(),
    };

    Some(FileRecord {
        path: public_path(&relative_path, options),
        depth: relative_path.matches('/').count(),
        name,
        directory,
        size: Some(metadata.len()),
        last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        relative_path,
    })
}

/// Builds the web-servable path for a root-relative path.
pub fn public_path(relative_path: &str, options: &IndexOptions) -> String {
    let served = options
        .public_dir
        .as_deref()
        .and_then(|dir| relative_path.strip_prefix(dir))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(relative_path);

    format!("{}/{}", options.mount_prefix.trim_end_matches('/'), served)
}
