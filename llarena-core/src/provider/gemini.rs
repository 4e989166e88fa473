//! Google Gemini provider implementation

use super::{GenerationRequest, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata};
use crate::error::{self, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Google Gemini provider.
///
/// A thin client over the `generateContent` REST endpoint. The client is
/// bound on `initialize`; until then every `generate` fails with
/// NotInitialized.
#[derive(Debug)]
pub struct GeminiProvider {
    client: Option<Client>,
    api_key: Option<String>,
    config: ProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: None,
            api_key: None,
            config,
        }
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com/v1beta")
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        self.config.default_model.as_deref().unwrap_or("gemini-pro")
    }

    fn initialize(&mut self, api_key: &str) -> Result<()> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(
                self.config.timeout_secs.unwrap_or(120),
            ))
            .build()
            .map_err(|e| {
                error::network_failed("Failed to create HTTP client")
                    .with_operation("gemini::initialize")
                    .set_source(e)
            })?;

        self.client = Some(client);
        self.api_key = Some(api_key.to_string());
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<LlmResponse> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| error::not_initialized("gemini").with_operation("gemini::generate"))?;
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| error::not_initialized("gemini").with_operation("gemini::generate"))?;

        let model = request.model.as_deref().unwrap_or(self.default_model());

        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        let api_request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config,
        };

        let response = client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url(),
                model
            ))
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                error::network_failed(e.to_string())
                    .with_operation("gemini::generate")
                    .set_source(e)
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(match status {
                429 => error::rate_limited(),
                401 | 403 => error::authentication_failed(),
                _ => error::generation_failed(text),
            }
            .with_operation("gemini::generate")
            .with_context("status", status.to_string())
            .with_context("model", model));
        }

        let raw: serde_json::Value = response.json().await.map_err(|e| {
            error::generation_failed("Failed to decode response body")
                .with_operation("gemini::generate")
                .set_source(e)
        })?;

        let api_response: GeminiResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            error::generation_failed(format!("Unexpected response shape: {}", e))
                .with_operation("gemini::generate")
        })?;

        let text: String = api_response
            .candidates
            .iter()
            .flat_map(|candidate| candidate.content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect();

        Ok(LlmResponse {
            text,
            raw,
            metadata: Some(ResponseMetadata {
                model: model.to_string(),
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            }),
        })
    }
}

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
