use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{
    GetDocumentUseCase, IngestDocumentsUseCase, ListDocumentsUseCase,
    get_document::GetDocumentRequest,
    ingest_documents::{IncomingFile, IngestDocumentsRequest},
    list_documents::ListDocumentsRequest,
};
use crate::presentation::http::dto::{
    DocumentDetailResponseDto, DocumentListResponseDto, DocumentSummaryDto, LimitQueryDto,
    UploadResultDto,
};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::extractors::AuthenticatedOwner;

const UPLOAD_FIELD: &str = "files";

pub struct DocumentHandler {
    ingest_use_case: Arc<IngestDocumentsUseCase>,
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    get_document_use_case: Arc<GetDocumentUseCase>,
}

fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("upload too large".to_string())
    } else {
        tracing::warn!("Malformed multipart upload: {}", error.body_text());
        AppError::BadRequest("invalid multipart body".to_string())
    }
}

impl DocumentHandler {
    pub fn new(
        ingest_use_case: Arc<IngestDocumentsUseCase>,
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        get_document_use_case: Arc<GetDocumentUseCase>,
    ) -> Self {
        Self {
            ingest_use_case,
            list_documents_use_case,
            get_document_use_case,
        }
    }

    pub async fn upload(
        State(handler): State<Arc<DocumentHandler>>,
        AuthenticatedOwner(owner): AuthenticatedOwner,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        // A request that is not multipart carries no files at all.
        let mut multipart =
            multipart.map_err(|_| AppError::BadRequest("no file selected".to_string()))?;

        let mut files = Vec::new();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }

            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(multipart_error)?;

            files.push(IncomingFile {
                file_name,
                data: Some(data),
            });
        }

        let file_count = files.len();
        let response = handler
            .ingest_use_case
            .execute(IngestDocumentsRequest { owner, files })
            .await?;

        tracing::info!(
            "Owner {} uploaded {} file(s), {} processed",
            owner,
            file_count,
            response.processed_count()
        );

        let results: Vec<UploadResultDto> = response
            .results
            .into_iter()
            .map(UploadResultDto::from)
            .collect();

        Ok((StatusCode::OK, Json(results)))
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
        AuthenticatedOwner(owner): AuthenticatedOwner,
        Query(query): Query<LimitQueryDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let response = handler
            .list_documents_use_case
            .execute(ListDocumentsRequest {
                owner,
                limit: query.limit,
            })
            .await?;

        let dto = DocumentListResponseDto {
            documents: response
                .documents
                .iter()
                .map(DocumentSummaryDto::from)
                .collect(),
            total: response.total_count,
        };

        Ok((StatusCode::OK, Json(dto)))
    }

    pub async fn get_document(
        State(handler): State<Arc<DocumentHandler>>,
        AuthenticatedOwner(owner): AuthenticatedOwner,
        Path(document_id): Path<i32>,
    ) -> Result<impl IntoResponse, AppError> {
        let document = handler
            .get_document_use_case
            .execute(GetDocumentRequest { owner, document_id })
            .await?;

        Ok((StatusCode::OK, Json(DocumentDetailResponseDto::from(document))))
    }
}
