use std::sync::Arc;

use crate::{
    application::{
        ports::{
            DocumentExtractor, FileStorage, TextGenerator, text_generator::GenerationParameters,
        },
        services::PromptBuilder,
        use_cases::{
            AskQuestionUseCase, GetConversationTurnUseCase, GetDocumentUseCase,
            IngestDocumentsUseCase, ListConversationsUseCase, ListDocumentsUseCase,
        },
    },
    config::AppConfig,
    domain::repositories::{ConversationRepository, DocumentRepository},
    infrastructure::{
        database::{
            create_connection_pool, get_connection_from_pool,
            repositories::{PostgresConversationRepository, PostgresDocumentRepository},
            run_migrations,
        },
        external_services::{HttpTextGenerator, InferenceClientConfig, PdfExtractor},
        file_system::LocalFileStorage,
    },
    presentation::http::handlers::{ConversationHandler, DocumentHandler},
};

pub struct AppContainer {
    // Repositories
    pub document_repository: Arc<dyn DocumentRepository>,
    pub conversation_repository: Arc<dyn ConversationRepository>,

    // External Services
    pub file_storage: Arc<dyn FileStorage>,
    pub document_extractor: Arc<dyn DocumentExtractor>,
    pub text_generator: Arc<dyn TextGenerator>,

    // Use Cases
    pub ingest_documents_use_case: Arc<IngestDocumentsUseCase>,
    pub list_documents_use_case: Arc<ListDocumentsUseCase>,
    pub get_document_use_case: Arc<GetDocumentUseCase>,
    pub ask_question_use_case: Arc<AskQuestionUseCase>,
    pub list_conversations_use_case: Arc<ListConversationsUseCase>,
    pub get_conversation_turn_use_case: Arc<GetConversationTurnUseCase>,

    // HTTP Handlers
    pub document_handler: Arc<DocumentHandler>,
    pub conversation_handler: Arc<ConversationHandler>,
}

impl AppContainer {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        // Database pool and schema
        let db_pool = create_connection_pool(&config.database_url, config.db_pool_size)?;
        let mut conn = get_connection_from_pool(&db_pool)
            .map_err(|e| format!("Failed to create database connection: {}", e))?;
        let applied = run_migrations(&mut conn)
            .map_err(|e| format!("Failed to run database migrations: {}", e))?;
        drop(conn);
        tracing::info!("Database ready ({} migration(s) applied)", applied);

        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
        let conversation_repository: Arc<dyn ConversationRepository> =
            Arc::new(PostgresConversationRepository::new(db_pool));

        // Upload storage
        let local_storage = LocalFileStorage::new(config.upload_dir.clone());
        local_storage.ensure_directory_exists().await?;
        let purged = local_storage.purge_staging().await?;
        if purged > 0 {
            tracing::warn!("Removed {} leftover staged upload(s)", purged);
        }
        let file_storage: Arc<dyn FileStorage> = Arc::new(local_storage);

        // Extraction
        let document_extractor: Arc<dyn DocumentExtractor> = Arc::new(PdfExtractor::new());
        let supported = document_extractor.supported_extensions();
        if let Some(unsupported) = config
            .allowed_extensions
            .iter()
            .find(|ext| !supported.iter().any(|s| s == ext))
        {
            return Err(format!(
                "ALLOWED_EXTENSIONS contains '{}', which no extractor can read",
                unsupported
            )
            .into());
        }

        // Inference
        let http_generator = HttpTextGenerator::new(InferenceClientConfig {
            service_url: config.inference_service_url.clone(),
            timeout_secs: config.inference_timeout.as_secs(),
        })?;
        match http_generator.health_check().await {
            Ok(true) => tracing::info!("Inference service reachable at {}", http_generator.model_info()),
            Ok(false) => tracing::warn!(
                "Inference service at {} is not reachable; answers will fall back until it is",
                http_generator.model_info()
            ),
            Err(e) => tracing::warn!("Inference health check failed: {}", e),
        }
        let text_generator: Arc<dyn TextGenerator> = Arc::new(http_generator);

        let parameters = GenerationParameters {
            eos_token: config.eos_token.clone(),
            seed: config.inference_seed,
            ..GenerationParameters::default()
        };
        let mut prompt_builder = PromptBuilder::new(config.eos_token.clone());
        if config.ground_answers_in_document {
            prompt_builder = prompt_builder.with_document_grounding(config.max_context_chars);
        }

        // Use cases
        let ingest_documents_use_case = Arc::new(IngestDocumentsUseCase::new(
            document_repository.clone(),
            file_storage.clone(),
            document_extractor.clone(),
            config.allowed_extensions.clone(),
        ));
        let list_documents_use_case =
            Arc::new(ListDocumentsUseCase::new(document_repository.clone()));
        let get_document_use_case = Arc::new(GetDocumentUseCase::new(document_repository.clone()));

        let ask_question_use_case = Arc::new(
            AskQuestionUseCase::new(
                document_repository.clone(),
                conversation_repository.clone(),
                text_generator.clone(),
                parameters,
            )
            .with_prompt_builder(prompt_builder)
            .with_concurrency_limit(config.max_concurrent_generations)
            .with_timeout(config.inference_timeout),
        );
        let list_conversations_use_case =
            Arc::new(ListConversationsUseCase::new(conversation_repository.clone()));
        let get_conversation_turn_use_case = Arc::new(GetConversationTurnUseCase::new(
            conversation_repository.clone(),
        ));

        // HTTP handlers
        let document_handler = Arc::new(DocumentHandler::new(
            ingest_documents_use_case.clone(),
            list_documents_use_case.clone(),
            get_document_use_case.clone(),
        ));
        let conversation_handler = Arc::new(ConversationHandler::new(
            ask_question_use_case.clone(),
            list_conversations_use_case.clone(),
            get_conversation_turn_use_case.clone(),
        ));

        Ok(Self {
            document_repository,
            conversation_repository,
            file_storage,
            document_extractor,
            text_generator,
            ingest_documents_use_case,
            list_documents_use_case,
            get_document_use_case,
            ask_question_use_case,
            list_conversations_use_case,
            get_conversation_turn_use_case,
            document_handler,
            conversation_handler,
        })
    }
}
