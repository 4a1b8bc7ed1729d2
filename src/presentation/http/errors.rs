use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::use_cases::{
    ask_question::AskQuestionError, get_conversation_turn::GetConversationTurnError,
    get_document::GetDocumentError, ingest_documents::IngestDocumentsError,
    list_conversations::ListConversationsError, list_documents::ListDocumentsError,
};

/// Error surfaced to HTTP clients as `{"error": message}`. Messages are fixed
/// strings; details of internal failures only go to the log.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<IngestDocumentsError> for AppError {
    fn from(error: IngestDocumentsError) -> Self {
        match error {
            IngestDocumentsError::NoFilesSelected => {
                AppError::BadRequest("no file selected".to_string())
            }
            IngestDocumentsError::StorageError(msg) => {
                tracing::error!("Upload batch failed: {}", msg);
                AppError::Internal("server error processing request".to_string())
            }
        }
    }
}

impl From<AskQuestionError> for AppError {
    fn from(error: AskQuestionError) -> Self {
        match error {
            AskQuestionError::EmptyQuestion => {
                AppError::BadRequest("no question provided".to_string())
            }
            AskQuestionError::DocumentNotFound(_) => {
                AppError::NotFound("document not found".to_string())
            }
            AskQuestionError::RepositoryError(msg) => {
                tracing::error!("Failed to answer question: {}", msg);
                AppError::Internal("server error processing your question".to_string())
            }
        }
    }
}

impl From<ListDocumentsError> for AppError {
    fn from(error: ListDocumentsError) -> Self {
        match error {
            ListDocumentsError::ValidationError(msg) => AppError::BadRequest(msg),
            ListDocumentsError::RepositoryError(msg) => {
                tracing::error!("Failed to list documents: {}", msg);
                AppError::Internal("server error processing request".to_string())
            }
        }
    }
}

impl From<GetDocumentError> for AppError {
    fn from(error: GetDocumentError) -> Self {
        match error {
            GetDocumentError::DocumentNotFound(_) => {
                AppError::NotFound("document not found".to_string())
            }
            GetDocumentError::RepositoryError(msg) => {
                tracing::error!("Failed to load document: {}", msg);
                AppError::Internal("server error processing request".to_string())
            }
        }
    }
}

impl From<ListConversationsError> for AppError {
    fn from(error: ListConversationsError) -> Self {
        match error {
            ListConversationsError::ValidationError(msg) => AppError::BadRequest(msg),
            ListConversationsError::RepositoryError(msg) => {
                tracing::error!("Failed to list conversations: {}", msg);
                AppError::Internal("server error processing request".to_string())
            }
        }
    }
}

impl From<GetConversationTurnError> for AppError {
    fn from(error: GetConversationTurnError) -> Self {
        match error {
            GetConversationTurnError::TurnNotFound(_) => {
                AppError::NotFound("conversation turn not found".to_string())
            }
            GetConversationTurnError::RepositoryError(msg) => {
                tracing::error!("Failed to load conversation turn: {}", msg);
                AppError::Internal("server error processing request".to_string())
            }
        }
    }
}
