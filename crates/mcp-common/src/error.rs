/// Error types shared across MCP server crates.
///
/// These errors represent failures reading the bundled data package (missing files,
/// unreadable directories, malformed JSON). Application-specific errors should be defined
/// in each server crate and wrap `CommonError` via `#[from]`.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("data file has no usable name: {}", .0.display())]
    InvalidFileName(PathBuf),
}
