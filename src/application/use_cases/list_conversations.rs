use std::sync::Arc;

use crate::domain::entities::ConversationTurn;
use crate::domain::repositories::{
    ConversationRepository, conversation_repository::ConversationRepositoryError,
};
use crate::domain::value_objects::OwnerId;

/// The dashboard shows this many recent turns unless told otherwise.
pub const DEFAULT_RECENT_TURNS: i64 = 5;

#[derive(Debug)]
pub enum ListConversationsError {
    RepositoryError(String),
    ValidationError(String),
}

impl std::fmt::Display for ListConversationsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListConversationsError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
            ListConversationsError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ListConversationsError {}

impl From<ConversationRepositoryError> for ListConversationsError {
    fn from(error: ConversationRepositoryError) -> Self {
        ListConversationsError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ListConversationsRequest {
    pub owner: OwnerId,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ListConversationsResponse {
    pub turns: Vec<ConversationTurn>,
    pub total_count: i64,
}

pub struct ListConversationsUseCase {
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl ListConversationsUseCase {
    pub fn new(conversation_repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            conversation_repository,
        }
    }

    pub async fn execute(
        &self,
        request: ListConversationsRequest,
    ) -> Result<ListConversationsResponse, ListConversationsError> {
        let limit = request.limit.unwrap_or(DEFAULT_RECENT_TURNS);
        if limit <= 0 || limit > 1000 {
            return Err(ListConversationsError::ValidationError(
                "Limit must be between 1 and 1000".to_string(),
            ));
        }

        let turns = self
            .conversation_repository
            .list_for_owner(request.owner, Some(limit))
            .await?;
        let total_count = self
            .conversation_repository
            .count_for_owner(request.owner)
            .await?;

        Ok(ListConversationsResponse { turns, total_count })
    }
}
