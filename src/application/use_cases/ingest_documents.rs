use bytes::Bytes;
use std::sync::Arc;

use crate::application::ports::file_storage::StagedFile;
use crate::application::ports::{DocumentExtractor, FileStorage};
use crate::application::services::strip_nul;
use crate::domain::entities::NewDocument;
use crate::domain::repositories::{
    DocumentRepository, document_repository::DocumentRepositoryError,
};
use crate::domain::value_objects::{AllowedExtensions, OwnerId, StoredFileName};

#[derive(Debug)]
pub enum IngestDocumentsError {
    NoFilesSelected,
    StorageError(String),
}

impl std::fmt::Display for IngestDocumentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestDocumentsError::NoFilesSelected => write!(f, "No file selected"),
            IngestDocumentsError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for IngestDocumentsError {}

impl From<DocumentRepositoryError> for IngestDocumentsError {
    fn from(error: DocumentRepositoryError) -> Self {
        IngestDocumentsError::StorageError(error.to_string())
    }
}

/// One entry of an upload batch as received from the client.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    pub data: Option<Bytes>,
}

impl IncomingFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: Some(data.into()),
        }
    }

    fn is_selected(&self) -> bool {
        !self.file_name.trim().is_empty() && self.data.is_some()
    }
}

/// Why a single file of a batch was not ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    NoFileSelected,
    InvalidFileType,
    ServerError,
    CouldNotProcess,
}

impl FileRejection {
    pub fn message(&self) -> &'static str {
        match self {
            FileRejection::NoFileSelected => "no file selected",
            FileRejection::InvalidFileType => "invalid file type",
            FileRejection::ServerError => "server error processing file",
            FileRejection::CouldNotProcess => "could not process document",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Processed { doc_id: i32 },
    Rejected(FileRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIngestResult {
    /// The client supplied name, echoed back unchanged.
    pub filename: String,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone)]
pub struct IngestDocumentsRequest {
    pub owner: OwnerId,
    pub files: Vec<IncomingFile>,
}

#[derive(Debug, Clone)]
pub struct IngestDocumentsResponse {
    /// Same order as the request's files.
    pub results: Vec<FileIngestResult>,
}

impl IngestDocumentsResponse {
    pub fn processed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Processed { .. }))
            .count()
    }
}

/// A file that passed validation and extraction and waits for the batch commit.
struct PendingDocument {
    result_index: usize,
    staged: StagedFile,
    stored_name: StoredFileName,
    document: NewDocument,
}

pub struct IngestDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
    document_extractor: Arc<dyn DocumentExtractor>,
    allowed_extensions: AllowedExtensions,
}

impl IngestDocumentsUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        file_storage: Arc<dyn FileStorage>,
        document_extractor: Arc<dyn DocumentExtractor>,
        allowed_extensions: AllowedExtensions,
    ) -> Self {
        Self {
            document_repository,
            file_storage,
            document_extractor,
            allowed_extensions,
        }
    }

    pub async fn execute(
        &self,
        request: IngestDocumentsRequest,
    ) -> Result<IngestDocumentsResponse, IngestDocumentsError> {
        if !request.files.iter().any(IncomingFile::is_selected) {
            return Err(IngestDocumentsError::NoFilesSelected);
        }

        let mut outcomes: Vec<(String, Option<FileOutcome>)> =
            Vec::with_capacity(request.files.len());
        let mut pending = Vec::new();

        for (index, file) in request.files.into_iter().enumerate() {
            let filename = file.file_name.clone();
            match self.prepare(request.owner, index, file).await {
                Ok(doc) => {
                    pending.push(doc);
                    outcomes.push((filename, None));
                }
                Err(rejection) => {
                    outcomes.push((filename, Some(FileOutcome::Rejected(rejection))));
                }
            }
        }

        let mut documents = Vec::with_capacity(pending.len());
        let mut document_slots = Vec::with_capacity(pending.len());
        let mut promoted_paths = Vec::with_capacity(pending.len());

        for PendingDocument {
            result_index,
            staged,
            stored_name,
            mut document,
        } in pending
        {
            match self.file_storage.promote(staged, &stored_name).await {
                Ok(stored) => {
                    document.relocate(stored.file_name.into(), stored.path.clone());
                    promoted_paths.push(stored.path);
                    documents.push(document);
                    document_slots.push(result_index);
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to move {} into storage: {}",
                        outcomes[result_index].0,
                        e
                    );
                    outcomes[result_index].1 =
                        Some(FileOutcome::Rejected(FileRejection::ServerError));
                }
            }
        }

        if !documents.is_empty() {
            match self.document_repository.save_batch(&documents).await {
                Ok(saved) => {
                    for (slot, doc) in document_slots.into_iter().zip(saved) {
                        outcomes[slot].1 = Some(FileOutcome::Processed { doc_id: doc.id() });
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to commit {} document(s) for owner {}: {}",
                        documents.len(),
                        request.owner,
                        e
                    );
                    self.remove_promoted(&promoted_paths).await;
                    return Err(e.into());
                }
            }
        }

        let results = outcomes
            .into_iter()
            .map(|(filename, outcome)| FileIngestResult {
                filename,
                // Every slot is filled above; an empty one can only mean a lost commit result.
                outcome: outcome.unwrap_or(FileOutcome::Rejected(FileRejection::ServerError)),
            })
            .collect();

        Ok(IngestDocumentsResponse { results })
    }

    /// Validates, stages and extracts a single file.
    async fn prepare(
        &self,
        owner: OwnerId,
        result_index: usize,
        file: IncomingFile,
    ) -> Result<PendingDocument, FileRejection> {
        let data = match file.data {
            Some(data) if !file.file_name.trim().is_empty() => data,
            _ => return Err(FileRejection::NoFileSelected),
        };

        let extension = self
            .allowed_extensions
            .matching_extension(&file.file_name)
            .ok_or(FileRejection::InvalidFileType)?;

        let stored_name = StoredFileName::sanitize(&file.file_name, &extension);

        let staged = self.file_storage.stage(data.clone()).await.map_err(|e| {
            tracing::error!("Error storing file {}: {}", file.file_name, e);
            FileRejection::ServerError
        })?;

        // `staged` is dropped on every early return below, which deletes the bytes.
        let content = self.document_extractor.extract(data).await.map_err(|e| {
            tracing::warn!("Could not extract text from {}: {}", file.file_name, e);
            FileRejection::CouldNotProcess
        })?;

        let document = NewDocument::new(
            owner,
            stored_name.to_string(),
            strip_nul(file.file_name.clone()),
            staged.path().to_string_lossy().to_string(),
            staged.size() as i64,
            content.page_count,
            strip_nul(content.text),
        )
        .map_err(|e| {
            tracing::error!("Invalid document record for {}: {}", file.file_name, e);
            FileRejection::ServerError
        })?;

        Ok(PendingDocument {
            result_index,
            staged,
            stored_name,
            document,
        })
    }

    async fn remove_promoted(&self, paths: &[String]) {
        for path in paths {
            if let Err(e) = self.file_storage.remove(path).await {
                tracing::error!("Failed to remove orphaned file {}: {}", path, e);
            }
        }
    }
}
