pub mod ask_question;
pub mod get_conversation_turn;
pub mod get_document;
pub mod ingest_documents;
pub mod list_conversations;
pub mod list_documents;

pub use ask_question::AskQuestionUseCase;
pub use get_conversation_turn::GetConversationTurnUseCase;
pub use get_document::GetDocumentUseCase;
pub use ingest_documents::IngestDocumentsUseCase;
pub use list_conversations::ListConversationsUseCase;
pub use list_documents::ListDocumentsUseCase;
