use thiserror::Error;

#[derive(Error, Debug)]
pub enum IconSearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config format error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Indexing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
