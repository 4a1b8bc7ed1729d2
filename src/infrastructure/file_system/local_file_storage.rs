use async_trait::async_trait;
use bytes::Bytes;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::fs;

use crate::application::ports::file_storage::{
    FileStorage, FileStorageError, StagedFile, StoredFile,
};
use crate::domain::value_objects::StoredFileName;

const STAGING_DIR: &str = ".staging";
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Keeps uploaded documents in a directory on local disk.
///
/// Uploads are first written under `<base>/.staging` and moved next to it once
/// they are accepted. Both live on the same filesystem so the move is a rename.
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(self.staging_path()).await?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        self.base_path.join(STAGING_DIR)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn stage(&self, data: Bytes) -> Result<StagedFile, FileStorageError> {
        let staging = self.staging_path();

        tokio::task::spawn_blocking(move || -> Result<StagedFile, FileStorageError> {
            std::fs::create_dir_all(&staging)?;
            // Dropped (and deleted) if any write below fails.
            let mut file = NamedTempFile::new_in(&staging)?;
            file.write_all(&data)?;
            file.as_file().sync_all()?;
            Ok(StagedFile::new(file.into_temp_path(), data.len() as u64))
        })
        .await
        .map_err(|e| FileStorageError::IoError(format!("Staging task failed: {}", e)))?
    }

    async fn promote(
        &self,
        staged: StagedFile,
        name: &StoredFileName,
    ) -> Result<StoredFile, FileStorageError> {
        let base_path = self.base_path.clone();
        let name = name.clone();
        let size = staged.size();

        tokio::task::spawn_blocking(move || -> Result<StoredFile, FileStorageError> {
            let mut temp_path = staged.into_temp_path();

            for attempt in 0..MAX_NAME_ATTEMPTS {
                let candidate = if attempt == 0 {
                    name.clone()
                } else {
                    name.with_counter(attempt)
                };
                let destination = base_path.join(candidate.as_str());

                match temp_path.persist_noclobber(&destination) {
                    Ok(()) => {
                        return Ok(StoredFile {
                            file_name: candidate,
                            path: destination.to_string_lossy().to_string(),
                            size,
                        });
                    }
                    Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                        temp_path = e.path;
                    }
                    // The staged file is removed when `e.path` drops.
                    Err(e) => return Err(FileStorageError::IoError(e.error.to_string())),
                }
            }

            Err(FileStorageError::NameExhausted(name.to_string()))
        })
        .await
        .map_err(|e| FileStorageError::IoError(format!("Promotion task failed: {}", e)))?
    }

    async fn remove(&self, path: &str) -> Result<bool, FileStorageError> {
        let path = PathBuf::from(path);
        if !path.starts_with(&self.base_path) {
            return Err(FileStorageError::InvalidPath(path.display().to_string()));
        }

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn purge_staging(&self) -> Result<u64, FileStorageError> {
        let mut entries = match fs::read_dir(self.staging_path()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0u64;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
