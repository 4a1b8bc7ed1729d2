use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::application::ports::TextGenerator;
use crate::application::ports::text_generator::{
    GenerationOutput, GenerationParameters, GenerationRequest, InferenceError,
};
use crate::application::services::{PromptBuilder, strip_nul};
use crate::domain::entities::NewConversationTurn;
use crate::domain::repositories::{
    ConversationRepository, DocumentRepository,
    conversation_repository::ConversationRepositoryError,
    document_repository::DocumentRepositoryError,
};
use crate::domain::value_objects::OwnerId;

/// Answer recorded and returned whenever generation does not produce one.
pub const FALLBACK_ANSWER: &str =
    "I encountered an error processing your request. Please try again.";

#[derive(Debug)]
pub enum AskQuestionError {
    EmptyQuestion,
    DocumentNotFound(i32),
    RepositoryError(String),
}

impl std::fmt::Display for AskQuestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskQuestionError::EmptyQuestion => write!(f, "No question provided"),
            AskQuestionError::DocumentNotFound(id) => write!(f, "Document not found: {}", id),
            AskQuestionError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for AskQuestionError {}

impl From<DocumentRepositoryError> for AskQuestionError {
    fn from(error: DocumentRepositoryError) -> Self {
        AskQuestionError::RepositoryError(error.to_string())
    }
}

impl From<ConversationRepositoryError> for AskQuestionError {
    fn from(error: ConversationRepositoryError) -> Self {
        AskQuestionError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct AskQuestionRequest {
    pub owner: OwnerId,
    pub question: String,
    pub document_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AskQuestionResponse {
    pub answer: String,
    /// Original file name of the document the question was asked against.
    pub sources: Vec<String>,
    pub turn_id: i32,
    pub used_fallback: bool,
}

pub struct AskQuestionUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    conversation_repository: Arc<dyn ConversationRepository>,
    text_generator: Arc<dyn TextGenerator>,
    prompt_builder: PromptBuilder,
    parameters: GenerationParameters,
    generation_permits: Arc<Semaphore>,
    generation_timeout: Duration,
}

impl AskQuestionUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        conversation_repository: Arc<dyn ConversationRepository>,
        text_generator: Arc<dyn TextGenerator>,
        parameters: GenerationParameters,
    ) -> Self {
        Self {
            document_repository,
            conversation_repository,
            text_generator,
            prompt_builder: PromptBuilder::new(parameters.eos_token.clone()),
            parameters,
            generation_permits: Arc::new(Semaphore::new(2)),
            generation_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_prompt_builder(mut self, prompt_builder: PromptBuilder) -> Self {
        self.prompt_builder = prompt_builder;
        self
    }

    /// Caps how many generations run at once across all requests.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.generation_permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// Time allowed for waiting on a permit plus the generation itself.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub async fn execute(
        &self,
        request: AskQuestionRequest,
    ) -> Result<AskQuestionResponse, AskQuestionError> {
        let question = strip_nul(request.question);
        let question = question.trim();
        if question.is_empty() {
            return Err(AskQuestionError::EmptyQuestion);
        }

        let document = match request.document_id {
            Some(id) => Some(
                self.document_repository
                    .find_for_owner(id, request.owner)
                    .await?
                    .ok_or(AskQuestionError::DocumentNotFound(id))?,
            ),
            None => None,
        };

        let prompt = self.prompt_builder.build(question, document.as_ref());

        let (answer, tokens_used, used_fallback) = match self.generate(prompt).await {
            Ok(output) => {
                let tokens_used = output.tokens_used.filter(|tokens| {
                    if *tokens < 0 {
                        tracing::warn!("Ignoring negative token count {}", tokens);
                    }
                    *tokens >= 0
                });
                (strip_nul(output.text), tokens_used, false)
            }
            Err(e) => {
                tracing::error!(
                    "Generation failed for owner {} using {}: {}",
                    request.owner,
                    self.text_generator.model_info(),
                    e
                );
                (FALLBACK_ANSWER.to_string(), None, true)
            }
        };

        let turn = NewConversationTurn::new(
            request.owner,
            document.as_ref(),
            question.to_string(),
            answer,
            tokens_used,
        )
        .map_err(AskQuestionError::RepositoryError)?;

        let saved = self.conversation_repository.save(&turn).await?;

        Ok(AskQuestionResponse {
            answer: saved.ai_response().to_string(),
            sources: document
                .map(|d| vec![d.original_filename().to_string()])
                .unwrap_or_default(),
            turn_id: saved.id(),
            used_fallback,
        })
    }

    async fn generate(&self, prompt: String) -> Result<GenerationOutput, InferenceError> {
        let request = GenerationRequest {
            prompt,
            parameters: self.parameters.clone(),
        };

        let gated = async {
            let _permit = self
                .generation_permits
                .acquire()
                .await
                .map_err(|_| InferenceError::ServiceUnavailable)?;
            self.text_generator.generate(request).await
        };

        match tokio::time::timeout(self.generation_timeout, gated).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::Timeout(self.generation_timeout)),
        }
    }
}
