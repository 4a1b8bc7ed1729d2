use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use tempfile::TempPath;

use crate::domain::value_objects::StoredFileName;

#[derive(Debug)]
pub enum FileStorageError {
    IoError(String),
    InvalidPath(String),
    NameExhausted(String),
}

impl std::fmt::Display for FileStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStorageError::IoError(msg) => write!(f, "IO error: {}", msg),
            FileStorageError::InvalidPath(path) => write!(f, "Invalid path: {}", path),
            FileStorageError::NameExhausted(name) => {
                write!(f, "No free storage name derived from {}", name)
            }
        }
    }
}

impl std::error::Error for FileStorageError {}

impl From<std::io::Error> for FileStorageError {
    fn from(error: std::io::Error) -> Self {
        FileStorageError::IoError(error.to_string())
    }
}

/// Bytes written to the staging area. Dropping the handle deletes the file, so
/// a staged upload that never gets promoted leaves nothing behind.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    size: u64,
}

impl StagedFile {
    pub fn new(path: TempPath, size: u64) -> Self {
        Self { path, size }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn into_temp_path(self) -> TempPath {
        self.path
    }
}

/// A file that has been moved to its permanent location.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub file_name: StoredFileName,
    pub path: String,
    pub size: u64,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Writes `data` to the staging area. A failed write leaves no partial file.
    async fn stage(&self, data: Bytes) -> Result<StagedFile, FileStorageError>;

    /// Moves a staged file to its permanent location under `name`, picking a
    /// suffixed variant of the name if it is already taken.
    async fn promote(
        &self,
        staged: StagedFile,
        name: &StoredFileName,
    ) -> Result<StoredFile, FileStorageError>;

    /// Returns `false` when the file was already gone.
    async fn remove(&self, path: &str) -> Result<bool, FileStorageError>;

    /// Deletes staging leftovers from an interrupted process. Returns how many were removed.
    async fn purge_staging(&self) -> Result<u64, FileStorageError>;
}
