use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::text_generator::{
    GenerationOutput, GenerationParameters, GenerationRequest, InferenceError, TextGenerator,
};

#[derive(Serialize)]
struct GenerateRequestBody<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParameters,
}

#[derive(Deserialize)]
struct GenerateResponseBody {
    generated_text: String,
    #[serde(default)]
    tokens_used: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct InferenceClientConfig {
    pub service_url: String,
    pub timeout_secs: u64,
}

/// Talks to the model server over HTTP: one POST per generation, JSON both ways.
#[derive(Debug, Clone)]
pub struct HttpTextGenerator {
    client: Client,
    config: InferenceClientConfig,
}

impl HttpTextGenerator {
    pub fn new(config: InferenceClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn map_send_error(&self, error: reqwest::Error) -> InferenceError {
        if error.is_timeout() {
            InferenceError::Timeout(Duration::from_secs(self.config.timeout_secs))
        } else {
            InferenceError::NetworkError(error.without_url().to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, InferenceError> {
        let body = GenerateRequestBody {
            inputs: &request.prompt,
            parameters: &request.parameters,
        };

        let response = self
            .client
            .post(&self.config.service_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(InferenceError::ServiceUnavailable);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(InferenceError::ApiError(format!("{}: {}", status, detail)));
        }

        let parsed = response
            .json::<GenerateResponseBody>()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.without_url().to_string()))?;

        Ok(GenerationOutput {
            text: parsed.generated_text,
            tokens_used: parsed.tokens_used,
        })
    }

    async fn health_check(&self) -> Result<bool, InferenceError> {
        match self.client.get(&self.config.service_url).send().await {
            Ok(response) => Ok(!response.status().is_server_error()),
            Err(e) if e.is_connect() || e.is_timeout() => Ok(false),
            Err(e) => Err(self.map_send_error(e)),
        }
    }

    fn model_info(&self) -> String {
        self.config.service_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/generate", addr)
    }

    fn generator(url: String) -> HttpTextGenerator {
        HttpTextGenerator::new(InferenceClientConfig {
            service_url: url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let params = GenerationParameters::default();
        let body = GenerateRequestBody {
            inputs: "Hi<|endoftext|>",
            parameters: &params,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["inputs"], "Hi<|endoftext|>");
        assert_eq!(json["parameters"]["max_length"], 1000);
        assert_eq!(json["parameters"]["no_repeat_ngram_size"], 3);
        assert_eq!(json["parameters"]["eos_token"], "<|endoftext|>");
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_and_parameters() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let router = Router::new().route(
            "/generate",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(json!({"generated_text": "Paris.", "tokens_used": 7}))
                }
            }),
        );
        let url = serve(router).await;

        let output = generator(url)
            .generate(GenerationRequest {
                prompt: "Capital of France?<|endoftext|>".to_string(),
                parameters: GenerationParameters::default(),
            })
            .await
            .unwrap();

        assert_eq!(output.text, "Paris.");
        assert_eq!(output.tokens_used, Some(7));
        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["inputs"], "Capital of France?<|endoftext|>");
        assert_eq!(body["parameters"]["top_k"], 100);
    }

    #[tokio::test]
    async fn test_generate_maps_server_errors() {
        let router = Router::new().route(
            "/generate",
            post(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let url = serve(router).await;

        let result = generator(url)
            .generate(GenerationRequest {
                prompt: "x".to_string(),
                parameters: GenerationParameters::default(),
            })
            .await;

        assert!(matches!(result, Err(InferenceError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_body() {
        let router = Router::new().route(
            "/generate",
            post(|| async { Json(json!({"text": "wrong field"})) }),
        );
        let url = serve(router).await;

        let result = generator(url)
            .generate(GenerationRequest {
                prompt: "x".to_string(),
                parameters: GenerationParameters::default(),
            })
            .await;

        assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_health_check_reports_unreachable_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let healthy = generator(format!("http://{}/generate", addr))
            .health_check()
            .await
            .unwrap();

        assert!(!healthy);
    }
}
