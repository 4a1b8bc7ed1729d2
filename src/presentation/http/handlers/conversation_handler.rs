use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{
    AskQuestionUseCase, GetConversationTurnUseCase, ListConversationsUseCase,
    ask_question::AskQuestionRequest, get_conversation_turn::GetConversationTurnRequest,
    list_conversations::ListConversationsRequest,
};
use crate::presentation::http::dto::{
    AskRequestDto, AskResponseDto, ConversationListResponseDto, ConversationTurnDto,
    DocumentIdField, LimitQueryDto,
};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::extractors::AuthenticatedOwner;

pub struct ConversationHandler {
    ask_use_case: Arc<AskQuestionUseCase>,
    list_conversations_use_case: Arc<ListConversationsUseCase>,
    get_turn_use_case: Arc<GetConversationTurnUseCase>,
}

impl ConversationHandler {
    pub fn new(
        ask_use_case: Arc<AskQuestionUseCase>,
        list_conversations_use_case: Arc<ListConversationsUseCase>,
        get_turn_use_case: Arc<GetConversationTurnUseCase>,
    ) -> Self {
        Self {
            ask_use_case,
            list_conversations_use_case,
            get_turn_use_case,
        }
    }

    pub async fn ask(
        State(handler): State<Arc<ConversationHandler>>,
        AuthenticatedOwner(owner): AuthenticatedOwner,
        payload: Result<Json<AskRequestDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        let Json(payload) = payload.map_err(|rejection| {
            tracing::warn!("Rejected ask payload: {}", rejection.body_text());
            AppError::BadRequest("request must be JSON".to_string())
        })?;

        let question = payload.question.unwrap_or_default();
        let document_id = match payload.document_id {
            DocumentIdField::Absent => None,
            DocumentIdField::Id(id) => Some(id),
            // A blank question is reported before the document lookup.
            DocumentIdField::Invalid(_) if question.trim().is_empty() => None,
            DocumentIdField::Invalid(raw) => {
                tracing::warn!("Unusable document_id {} from owner {}", raw, owner);
                return Err(AppError::NotFound("document not found".to_string()));
            }
        };

        let response = handler
            .ask_use_case
            .execute(AskQuestionRequest {
                owner,
                question,
                document_id,
            })
            .await?;

        Ok((StatusCode::OK, Json(AskResponseDto::from(response))))
    }

    pub async fn list_conversations(
        State(handler): State<Arc<ConversationHandler>>,
        AuthenticatedOwner(owner): AuthenticatedOwner,
        Query(query): Query<LimitQueryDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let response = handler
            .list_conversations_use_case
            .execute(ListConversationsRequest {
                owner,
                limit: query.limit,
            })
            .await?;

        let dto = ConversationListResponseDto {
            turns: response
                .turns
                .into_iter()
                .map(ConversationTurnDto::from)
                .collect(),
            total: response.total_count,
        };

        Ok((StatusCode::OK, Json(dto)))
    }

    pub async fn get_turn(
        State(handler): State<Arc<ConversationHandler>>,
        AuthenticatedOwner(owner): AuthenticatedOwner,
        Path(turn_id): Path<i32>,
    ) -> Result<impl IntoResponse, AppError> {
        let turn = handler
            .get_turn_use_case
            .execute(GetConversationTurnRequest { owner, turn_id })
            .await?;

        Ok((StatusCode::OK, Json(ConversationTurnDto::from(turn))))
    }
}
