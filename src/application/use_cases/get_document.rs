use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::{
    DocumentRepository, document_repository::DocumentRepositoryError,
};
use crate::domain::value_objects::OwnerId;

#[derive(Debug)]
pub enum GetDocumentError {
    DocumentNotFound(i32),
    RepositoryError(String),
}

impl std::fmt::Display for GetDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetDocumentError::DocumentNotFound(id) => write!(f, "Document not found: {}", id),
            GetDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GetDocumentError {}

impl From<DocumentRepositoryError> for GetDocumentError {
    fn from(error: DocumentRepositoryError) -> Self {
        GetDocumentError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GetDocumentRequest {
    pub owner: OwnerId,
    pub document_id: i32,
}

pub struct GetDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl GetDocumentUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            document_repository,
        }
    }

    pub async fn execute(&self, request: GetDocumentRequest) -> Result<Document, GetDocumentError> {
        self.document_repository
            .find_for_owner(request.document_id, request.owner)
            .await?
            .ok_or(GetDocumentError::DocumentNotFound(request.document_id))
    }
}
