use async_trait::async_trait;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::value_objects::OwnerId;

#[derive(Debug)]
pub enum DocumentRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for DocumentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            DocumentRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DocumentRepositoryError {}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts every document in one transaction; either all become visible or none.
    /// The returned documents are in the same order as `documents`.
    async fn save_batch(
        &self,
        documents: &[NewDocument],
    ) -> Result<Vec<Document>, DocumentRepositoryError>;

    /// Looks a document up by id and owner in a single query.
    async fn find_for_owner(
        &self,
        id: i32,
        owner: OwnerId,
    ) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Most recent first.
    async fn list_for_owner(
        &self,
        owner: OwnerId,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, DocumentRepositoryError>;

    async fn count_for_owner(&self, owner: OwnerId) -> Result<i64, DocumentRepositoryError>;
}
