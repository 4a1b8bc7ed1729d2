use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::{
    DocumentRepository, document_repository::DocumentRepositoryError,
};
use crate::domain::value_objects::OwnerId;

#[derive(Debug)]
pub enum ListDocumentsError {
    RepositoryError(String),
    ValidationError(String),
}

impl std::fmt::Display for ListDocumentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListDocumentsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            ListDocumentsError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ListDocumentsError {}

impl From<DocumentRepositoryError> for ListDocumentsError {
    fn from(error: DocumentRepositoryError) -> Self {
        ListDocumentsError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ListDocumentsRequest {
    pub owner: OwnerId,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ListDocumentsResponse {
    pub documents: Vec<Document>,
    pub total_count: i64,
}

pub struct ListDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl ListDocumentsUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            document_repository,
        }
    }

    pub async fn execute(
        &self,
        request: ListDocumentsRequest,
    ) -> Result<ListDocumentsResponse, ListDocumentsError> {
        if let Some(limit) = request.limit {
            if limit <= 0 || limit > 1000 {
                return Err(ListDocumentsError::ValidationError(
                    "Limit must be between 1 and 1000".to_string(),
                ));
            }
        }

        let documents = self
            .document_repository
            .list_for_owner(request.owner, request.limit)
            .await?;
        let total_count = self
            .document_repository
            .count_for_owner(request.owner)
            .await?;

        Ok(ListDocumentsResponse {
            documents,
            total_count,
        })
    }
}
