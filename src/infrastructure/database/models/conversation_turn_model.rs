use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::entities::{ConversationTurn, NewConversationTurn};
use crate::domain::value_objects::OwnerId;
use crate::infrastructure::database::schema::conversation_turns;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = conversation_turns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConversationTurnModel {
    pub id: i32,
    pub owner_id: i32,
    pub document_id: Option<i32>,
    pub user_message: String,
    pub ai_response: String,
    pub is_summary: bool,
    pub tokens_used: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = conversation_turns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewConversationTurnModel<'a> {
    pub owner_id: i32,
    pub document_id: Option<i32>,
    pub user_message: &'a str,
    pub ai_response: &'a str,
    pub is_summary: bool,
    pub tokens_used: Option<i32>,
}

impl<'a> From<&'a NewConversationTurn> for NewConversationTurnModel<'a> {
    fn from(turn: &'a NewConversationTurn) -> Self {
        Self {
            owner_id: turn.owner_id().value(),
            document_id: turn.document_id(),
            user_message: turn.user_message(),
            ai_response: turn.ai_response(),
            is_summary: turn.is_summary(),
            tokens_used: turn.tokens_used(),
        }
    }
}

impl TryFrom<ConversationTurnModel> for ConversationTurn {
    type Error = String;

    fn try_from(model: ConversationTurnModel) -> Result<Self, Self::Error> {
        Ok(ConversationTurn::restore(
            model.id,
            OwnerId::new(model.owner_id)?,
            model.document_id,
            model.user_message,
            model.ai_response,
            model.is_summary,
            model.tokens_used,
            model.created_at,
        ))
    }
}
