use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub enum DocumentExtractionError {
    UnsupportedFormat(String),
    CorruptedFile(String),
    Encrypted,
    ExtractionFailed(String),
}

impl std::fmt::Display for DocumentExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentExtractionError::UnsupportedFormat(format) => {
                write!(f, "Unsupported format: {}", format)
            }
            DocumentExtractionError::CorruptedFile(msg) => write!(f, "Corrupted file: {}", msg),
            DocumentExtractionError::Encrypted => write!(f, "Document is encrypted"),
            DocumentExtractionError::ExtractionFailed(msg) => {
                write!(f, "Extraction failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for DocumentExtractionError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    /// Page texts concatenated in page order.
    pub text: String,
    pub page_count: i32,
}

/// Converts a document's bytes into plain text. Implementations are pure: the
/// buffer is the only input and nothing is written anywhere.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, data: Bytes) -> Result<ExtractedContent, DocumentExtractionError>;

    /// Lowercase extensions, without the dot, this extractor understands.
    fn supported_extensions(&self) -> Vec<String>;
}
