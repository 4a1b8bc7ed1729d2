use axum::http::HeaderName;
use docchat::config::AppConfig;
use docchat::infrastructure::AppContainer;
use docchat::presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let owner_header = HeaderName::from_bytes(config.owner_header.as_bytes())
        .map_err(|e| format!("Invalid OWNER_HEADER '{}': {}", config.owner_header, e))?;

    tracing::info!(
        "Starting docchat {} (uploads in {})",
        env!("CARGO_PKG_VERSION"),
        config.upload_dir.display()
    );

    let container = AppContainer::new(&config).await?;

    let server = HttpServer::new(
        container.document_handler.clone(),
        container.conversation_handler.clone(),
        owner_header,
        config.max_upload_bytes,
        Some(config.port),
    );

    server.run().await
}
