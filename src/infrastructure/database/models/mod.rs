pub mod conversation_turn_model;
pub mod document_model;

pub use conversation_turn_model::*;
pub use document_model::*;
