pub mod conversation_turn;
pub mod document;

pub use conversation_turn::{ConversationTurn, NewConversationTurn};
pub use document::{Document, NewDocument};
