use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

pub fn document_routes(document_handler: Arc<DocumentHandler>) -> Router {
    Router::new()
        .route("/upload", post(DocumentHandler::upload))
        .route("/documents", get(DocumentHandler::list_documents))
        .route("/documents/{document_id}", get(DocumentHandler::get_document))
        .with_state(document_handler)
}
