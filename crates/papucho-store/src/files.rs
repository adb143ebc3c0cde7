//! Small async helpers around `tokio::fs` shared by the repositories.
//!
//! Every write goes to `<file>.tmp` first and is renamed over the target, so
//! a crash mid-write leaves the previous file intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};

/// Reads a text file. A missing file is `Ok(None)`.
pub(crate) async fn read_text(path: &Path) -> StoreResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Reads and parses a JSON file. A missing file is `Ok(None)`.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    match read_text(path).await? {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::json(path, e)),
        None => Ok(None),
    }
}

/// Writes `contents` atomically, creating parent directories as needed.
pub(crate) async fn write_text(path: &Path, contents: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

/// Serializes `value` as pretty JSON and writes it atomically.
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| StoreError::json(path, e))?;
    text.push('\n');
    write_text(path, &text).await
}

/// Loads a data file that must always exist.
///
/// A missing file yields `T::default()`. A corrupt one is moved aside to
/// `<file>.bak` and also yields the default. The flag is true when the
/// caller must write the file back.
pub(crate) async fn read_json_or_recreate<T>(path: &Path) -> StoreResult<(T, bool)>
where
    T: DeserializeOwned + Default,
{
    match read_json(path).await {
        Ok(Some(value)) => Ok((value, false)),
        Ok(None) => {
            info!(path = %path.display(), "Data file missing, creating it");
            Ok((T::default(), true))
        }
        Err(StoreError::Json { source, .. }) => {
            let backup = sibling(path, ".bak");
            warn!(
                path = %path.display(),
                backup = %backup.display(),
                error = %source,
                "Data file is not valid JSON, starting from an empty one"
            );
            tokio::fs::rename(path, &backup)
                .await
                .map_err(|e| StoreError::io(path, e))?;
            Ok((T::default(), true))
        }
        Err(e) => Err(e),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        nombre: String,
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let read: Option<Sample> = read_json(&dir.path().join("nope.json")).await.unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn test_write_creates_parents_and_keeps_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data.json");
        let value = Sample {
            nombre: "Medallón".to_string(),
        };

        write_json(&path, &value).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Medallón"));
        assert!(!dir.path().join("nested/data.json.tmp").exists());
        let back: Option<Sample> = read_json(&path).await.unwrap();
        assert_eq!(back, Some(value));
    }

    #[tokio::test]
    async fn test_recreate_moves_corrupt_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("productos.json");
        std::fs::write(&path, "[[[").unwrap();

        let (value, recreate): (Option<Sample>, bool) = read_json_or_recreate(&path).await.unwrap();
        assert!(value.is_none());
        assert!(recreate);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("productos.json.bak")).unwrap(),
            "[[["
        );

        let (_, recreate): (Option<Sample>, bool) = read_json_or_recreate(&path).await.unwrap();
        assert!(recreate);
    }

    #[tokio::test]
    async fn test_corrupt_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_json::<Sample>(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
