// file: src/relevance/ollama.rs
// description: Ollama generate API client for local model inference
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md

use super::LanguageModel;
use crate::config::LlmConfig;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint)
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        debug!(
            "Calling model {} with a {} character prompt",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Inference(format!("Failed to reach model endpoint: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Inference(format!(
                "Model request failed with status {}: {}",
                status, error_text
            )));
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            PipelineError::Inference(format!("Failed to parse model response: {}", e))
        })?;

        Ok(generated.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_generate_url_trims_trailing_slash() {
        let mut config = Config::default_config();
        config.llm.endpoint = "http://localhost:11434/".to_string();
        let client = OllamaClient::new(&config.llm).unwrap();
        assert_eq!(client.generate_url(), "http://localhost:11434/api/generate");
        assert_eq!(client.model_name(), "gemma2:2b");
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            model: "gemma2:2b",
            prompt: "Is this relevant?",
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gemma2:2b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.0);
    }

    #[test]
    fn test_response_without_text_defaults_empty() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(parsed.response.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_inference_error() {
        let mut config = Config::default_config();
        config.llm.endpoint = "http://127.0.0.1:9".to_string();
        config.llm.timeout_secs = 2;
        let client = OllamaClient::new(&config.llm).unwrap();

        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, PipelineError::Inference(_)));
    }
}
