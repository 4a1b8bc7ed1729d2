use std::sync::Arc;

use crate::domain::entities::ConversationTurn;
use crate::domain::repositories::{
    ConversationRepository, conversation_repository::ConversationRepositoryError,
};
use crate::domain::value_objects::OwnerId;

#[derive(Debug)]
pub enum GetConversationTurnError {
    TurnNotFound(i32),
    RepositoryError(String),
}

impl std::fmt::Display for GetConversationTurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetConversationTurnError::TurnNotFound(id) => {
                write!(f, "Conversation turn not found: {}", id)
            }
            GetConversationTurnError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for GetConversationTurnError {}

impl From<ConversationRepositoryError> for GetConversationTurnError {
    fn from(error: ConversationRepositoryError) -> Self {
        GetConversationTurnError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GetConversationTurnRequest {
    pub owner: OwnerId,
    pub turn_id: i32,
}

pub struct GetConversationTurnUseCase {
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl GetConversationTurnUseCase {
    pub fn new(conversation_repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            conversation_repository,
        }
    }

    pub async fn execute(
        &self,
        request: GetConversationTurnRequest,
    ) -> Result<ConversationTurn, GetConversationTurnError> {
        self.conversation_repository
            .find_for_owner(request.turn_id, request.owner)
            .await?
            .ok_or(GetConversationTurnError::TurnNotFound(request.turn_id))
    }
}
