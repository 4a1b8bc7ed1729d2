pub mod document_extractor;
pub mod file_storage;
pub mod text_generator;

pub use document_extractor::DocumentExtractor;
pub use file_storage::FileStorage;
pub use text_generator::TextGenerator;
