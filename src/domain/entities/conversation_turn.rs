use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Document;
use crate::domain::value_objects::OwnerId;

/// A question/answer exchange ready to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConversationTurn {
    owner_id: OwnerId,
    document_id: Option<i32>,
    user_message: String,
    ai_response: String,
    is_summary: bool,
    tokens_used: Option<i32>,
}

impl NewConversationTurn {
    /// Builds a turn, refusing a document that belongs to someone else.
    pub fn new(
        owner_id: OwnerId,
        document: Option<&Document>,
        user_message: String,
        ai_response: String,
        tokens_used: Option<i32>,
    ) -> Result<Self, String> {
        if let Some(doc) = document {
            if !doc.is_owned_by(owner_id) {
                return Err(format!(
                    "Document {} does not belong to owner {}",
                    doc.id(),
                    owner_id
                ));
            }
        }

        if user_message.trim().is_empty() {
            return Err("User message cannot be empty".to_string());
        }

        if user_message.contains('\0') || ai_response.contains('\0') {
            return Err("Conversation text cannot contain NUL characters".to_string());
        }

        if let Some(tokens) = tokens_used {
            if tokens < 0 {
                return Err(format!("Token usage cannot be negative: {}", tokens));
            }
        }

        Ok(Self {
            owner_id,
            document_id: document.map(|d| d.id()),
            user_message,
            ai_response,
            is_summary: false,
            tokens_used,
        })
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn document_id(&self) -> Option<i32> {
        self.document_id
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn ai_response(&self) -> &str {
        &self.ai_response
    }

    pub fn is_summary(&self) -> bool {
        self.is_summary
    }

    pub fn tokens_used(&self) -> Option<i32> {
        self.tokens_used
    }

    pub fn into_persisted(self, id: i32, created_at: DateTime<Utc>) -> ConversationTurn {
        ConversationTurn {
            id,
            owner_id: self.owner_id,
            document_id: self.document_id,
            user_message: self.user_message,
            ai_response: self.ai_response,
            is_summary: self.is_summary,
            tokens_used: self.tokens_used,
            created_at,
        }
    }
}

/// A recorded turn. Turns are never modified after they are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    id: i32,
    owner_id: OwnerId,
    document_id: Option<i32>,
    user_message: String,
    ai_response: String,
    is_summary: bool,
    tokens_used: Option<i32>,
    created_at: DateTime<Utc>,
}

impl ConversationTurn {
    /// Rebuilds a stored row. Ownership of the linked document was checked when
    /// the turn was created.
    pub fn restore(
        id: i32,
        owner_id: OwnerId,
        document_id: Option<i32>,
        user_message: String,
        ai_response: String,
        is_summary: bool,
        tokens_used: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            document_id,
            user_message,
            ai_response,
            is_summary,
            tokens_used,
            created_at,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn document_id(&self) -> Option<i32> {
        self.document_id
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn ai_response(&self) -> &str {
        &self.ai_response
    }

    pub fn is_summary(&self) -> bool {
        self.is_summary
    }

    pub fn tokens_used(&self) -> Option<i32> {
        self.tokens_used
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
