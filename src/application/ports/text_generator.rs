use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug)]
pub enum InferenceError {
    NetworkError(String),
    ApiError(String),
    InvalidResponse(String),
    Timeout(Duration),
    ServiceUnavailable,
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            InferenceError::ApiError(msg) => write!(f, "API error: {}", msg),
            InferenceError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            InferenceError::Timeout(after) => {
                write!(f, "Generation timed out after {} ms", after.as_millis())
            }
            InferenceError::ServiceUnavailable => write!(f, "Service unavailable"),
        }
    }
}

impl std::error::Error for InferenceError {}

/// Sampling settings sent with every generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Upper bound on prompt plus continuation, in tokens.
    pub max_length: u32,
    pub do_sample: bool,
    pub top_k: u32,
    pub top_p: f32,
    pub temperature: f32,
    pub no_repeat_ngram_size: u32,
    /// End-of-turn marker; terminates the prompt and stops decoding.
    pub eos_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_length: 1000,
            do_sample: true,
            top_k: 100,
            top_p: 0.7,
            temperature: 0.8,
            no_repeat_ngram_size: 3,
            eos_token: "<|endoftext|>".to_string(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    /// Decoded continuation only; the prompt is not echoed back.
    pub text: String,
    pub tokens_used: Option<i32>,
}

/// Text generation capability backed by a language model that lives outside
/// this process. Implementations must be shareable across requests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, InferenceError>;

    async fn health_check(&self) -> Result<bool, InferenceError>;

    fn model_info(&self) -> String;
}
