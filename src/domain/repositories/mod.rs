pub mod conversation_repository;
pub mod document_repository;

pub use conversation_repository::ConversationRepository;
pub use document_repository::DocumentRepository;
