use async_trait::async_trait;
use bytes::Bytes;
use lopdf::Document;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent,
};

const PDF_MAGIC: &[u8] = b"%PDF-";

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_from_buffer(data: &[u8]) -> Result<ExtractedContent, DocumentExtractionError> {
        if !data.starts_with(PDF_MAGIC) {
            return Err(DocumentExtractionError::UnsupportedFormat(
                "missing PDF header".to_string(),
            ));
        }

        let doc = Document::load_mem(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(DocumentExtractionError::Encrypted);
        }

        let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();

        // `collect` on an indexed parallel iterator keeps page order.
        let page_texts: Vec<String> = page_numbers
            .clone()
            .into_par_iter()
            .map(|page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to extract text from page {}: {}", page_num, e);
                    String::new()
                }
            })
            .collect();

        Ok(ExtractedContent {
            text: page_texts.concat(),
            page_count: page_numbers.len() as i32,
        })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, data: Bytes) -> Result<ExtractedContent, DocumentExtractionError> {
        tokio::task::spawn_blocking(move || Self::extract_from_buffer(&data))
            .await
            .map_err(|e| {
                DocumentExtractionError::ExtractionFailed(format!("Extraction task failed: {}", e))
            })?
    }

    fn supported_extensions(&self) -> Vec<String> {
        vec!["pdf".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pdf_with_pages;

    #[tokio::test]
    async fn test_extracts_pages_in_order() {
        let pdf = pdf_with_pages(&["First page", "Second page", "Third page"]);

        let content = PdfExtractor::new().extract(Bytes::from(pdf)).await.unwrap();

        assert_eq!(content.page_count, 3);
        let first = content.text.find("First page").unwrap();
        let second = content.text.find("Second page").unwrap();
        let third = content.text.find("Third page").unwrap();
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn test_rejects_non_pdf_bytes() {
        let result = PdfExtractor::new()
            .extract(Bytes::from_static(b"just some text, not a pdf"))
            .await;

        assert!(matches!(
            result,
            Err(DocumentExtractionError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_corrupted_pdf() {
        let result = PdfExtractor::new()
            .extract(Bytes::from_static(b"%PDF-1.5\nthis is not an object table"))
            .await;

        assert!(matches!(result, Err(DocumentExtractionError::CorruptedFile(_))));
    }

    #[test]
    fn test_supported_extensions() {
        assert_eq!(PdfExtractor::new().supported_extensions(), vec!["pdf"]);
    }
}
