use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ConversationHandler;

pub fn conversation_routes(conversation_handler: Arc<ConversationHandler>) -> Router {
    Router::new()
        .route("/ask", post(ConversationHandler::ask))
        .route("/conversations", get(ConversationHandler::list_conversations))
        .route("/conversations/{turn_id}", get(ConversationHandler::get_turn))
        .with_state(conversation_handler)
}
