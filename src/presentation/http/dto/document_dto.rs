use serde::Serialize;

use crate::application::use_cases::ingest_documents::{FileIngestResult, FileOutcome};
use crate::domain::entities::Document;

/// One entry of the upload response array.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum UploadResultDto {
    Processed {
        filename: String,
        status: &'static str,
        doc_id: i32,
    },
    Rejected {
        filename: String,
        error: &'static str,
    },
}

impl From<FileIngestResult> for UploadResultDto {
    fn from(result: FileIngestResult) -> Self {
        match result.outcome {
            FileOutcome::Processed { doc_id } => UploadResultDto::Processed {
                filename: result.filename,
                status: "processed",
                doc_id,
            },
            FileOutcome::Rejected(rejection) => UploadResultDto::Rejected {
                filename: result.filename,
                error: rejection.message(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentSummaryDto {
    pub id: i32,
    pub filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub page_count: i32,
    pub created_at: String,
}

impl From<&Document> for DocumentSummaryDto {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            filename: document.filename().to_string(),
            original_filename: document.original_filename().to_string(),
            file_size: document.file_size(),
            page_count: document.page_count(),
            created_at: document.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentSummaryDto>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct DocumentDetailResponseDto {
    #[serde(flatten)]
    pub summary: DocumentSummaryDto,
    pub processed_text: String,
}

impl From<Document> for DocumentDetailResponseDto {
    fn from(document: Document) -> Self {
        Self {
            summary: DocumentSummaryDto::from(&document),
            processed_text: document.processed_text().to_string(),
        }
    }
}
