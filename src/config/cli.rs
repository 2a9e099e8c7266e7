use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use std::io::ErrorKind;
use std::path::Path;

/// 本機檔案系統儲存，路徑原樣使用
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => EtlError::InputNotFound {
                path: path.to_string(),
            },
            _ => EtlError::IoError(e),
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_input_is_reported_as_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");

        let err = LocalStorage::new()
            .read_file(path.to_str().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/nested/geocoded.csv");
        let storage = LocalStorage::new();

        storage
            .write_file(path.to_str().unwrap(), b"address\n")
            .await
            .unwrap();

        let data = storage.read_file(path.to_str().unwrap()).await.unwrap();
        assert_eq!(data, b"address\n");
    }
}
