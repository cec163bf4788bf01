/// Read-only access to a bundled data package on disk.
///
/// Every helper maps I/O and JSON failures to `CommonError` carrying the offending path.
/// Callers decide whether a failure aborts startup or degrades to an empty collection.
use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CommonError;

pub async fn read_text(path: &Path) -> Result<String, CommonError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommonError::Io {
            path: path.to_path_buf(),
            source,
        })
}

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CommonError> {
    let text = read_text(path).await?;
    serde_json::from_str(&text).map_err(|source| CommonError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Regular files directly under `dir` whose extension is `extension`, sorted by path.
pub async fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CommonError> {
    let io_err = |source| CommonError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        let is_file = entry.file_type().await.map_err(io_err)?.is_file();
        if is_file && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }

    files.sort();
    debug!(dir = %dir.display(), extension, count = files.len(), "listed bundle files");
    Ok(files)
}

/// Reads every `*.{extension}` file under `dir` concurrently, keyed by file stem.
pub async fn read_text_dir(
    dir: &Path,
    extension: &str,
) -> Result<Vec<(String, String)>, CommonError> {
    let files = list_files(dir, extension).await?;
    try_join_all(files.iter().map(|path| async move {
        let stem = file_stem(path)?;
        let text = read_text(path).await?;
        Ok::<_, CommonError>((stem, text))
    }))
    .await
}

/// Parses every `*.json` file under `dir` concurrently, keyed by file stem.
pub async fn read_json_dir<T: DeserializeOwned>(
    dir: &Path,
) -> Result<Vec<(String, T)>, CommonError> {
    let files = list_files(dir, "json").await?;
    try_join_all(files.iter().map(|path| async move {
        let stem = file_stem(path)?;
        let value = read_json::<T>(path).await?;
        Ok::<_, CommonError>((stem, value))
    }))
    .await
}

fn file_stem(path: &Path) -> Result<String, CommonError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CommonError::InvalidFileName(path.to_path_buf()))
}
