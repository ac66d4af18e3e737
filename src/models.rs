use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directory value used for files sitting directly under the indexed root.
pub const ROOT_DIRECTORY: &str = "root";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub name: String,
    /// Web-servable path, always starting with the mount prefix.
    pub path: String,
    pub relative_path: String,
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    pub depth: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub icons: Vec<FileRecord>,
    pub total: usize,
    pub query: String,
    pub directories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    pub fn new(icons: Vec<FileRecord>, query: &str, directories: Vec<String>) -> Self {
        Self {
            total: icons.len(),
            icons,
            query: query.to_string(),
            directories,
            error: None,
        }
    }

    /// Empty result returned when the search pipeline fails.
    pub fn failed(query: &str) -> Self {
        Self {
            error: Some("Failed to search icons".to_string()),
            ..Self::new(Vec::new(), query, Vec::new())
        }
    }
}
