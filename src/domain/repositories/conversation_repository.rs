use async_trait::async_trait;

use crate::domain::entities::{ConversationTurn, NewConversationTurn};
use crate::domain::value_objects::OwnerId;

#[derive(Debug)]
pub enum ConversationRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConversationRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationRepositoryError::DatabaseError(msg) => {
                write!(f, "Database error: {}", msg)
            }
            ConversationRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConversationRepositoryError {}

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn save(
        &self,
        turn: &NewConversationTurn,
    ) -> Result<ConversationTurn, ConversationRepositoryError>;

    async fn find_for_owner(
        &self,
        id: i32,
        owner: OwnerId,
    ) -> Result<Option<ConversationTurn>, ConversationRepositoryError>;

    /// Most recent first.
    async fn list_for_owner(
        &self,
        owner: OwnerId,
        limit: Option<i64>,
    ) -> Result<Vec<ConversationTurn>, ConversationRepositoryError>;

    async fn count_for_owner(&self, owner: OwnerId) -> Result<i64, ConversationRepositoryError>;
}
