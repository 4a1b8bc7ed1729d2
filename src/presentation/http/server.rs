use axum::{Extension, Router, extract::DefaultBodyLimit, http::HeaderName};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::presentation::http::{
    extractors::OwnerHeader,
    handlers::{ConversationHandler, DocumentHandler},
    routes::{conversation_routes, document_routes, health_routes},
};

pub struct HttpServer {
    document_handler: Arc<DocumentHandler>,
    conversation_handler: Arc<ConversationHandler>,
    owner_header: HeaderName,
    max_upload_bytes: usize,
    port: u16,
}

impl HttpServer {
    pub fn new(
        document_handler: Arc<DocumentHandler>,
        conversation_handler: Arc<ConversationHandler>,
        owner_header: HeaderName,
        max_upload_bytes: usize,
        port: Option<u16>,
    ) -> Self {
        Self {
            document_handler,
            conversation_handler,
            owner_header,
            max_upload_bytes,
            port: port.unwrap_or(3000),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(health_routes())
            .merge(document_routes(self.document_handler.clone()))
            .merge(conversation_routes(self.conversation_handler.clone()))
            .layer(Extension(OwnerHeader(self.owner_header.clone())))
            .layer(cors)
            // Multipart reads are capped by axum's own limit, which defaults to 2 MB.
            .layer(DefaultBodyLimit::max(self.max_upload_bytes))
            .layer(RequestBodyLimitLayer::new(self.max_upload_bytes))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            )
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        tracing::info!("Listening on {}", addr);
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
