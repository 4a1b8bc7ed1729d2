pub mod document_extractors;
pub mod inference_client;

pub use document_extractors::PdfExtractor;
pub use inference_client::{HttpTextGenerator, InferenceClientConfig};
