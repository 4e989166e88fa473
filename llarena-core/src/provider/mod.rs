//! # Agent Adapter Interface
//!
//! A trait-based abstraction for communicating with text-generating agent
//! backends. The solver only ever sees this interface; adding a backend means
//! implementing [`LlmProvider`] and registering a name in
//! [`Provider::from_name`], without touching the solver loop.
//!
//! ## Design
//! - `LlmProvider` trait defines the core interface
//! - `initialize` binds credentials; `generate` before it fails fast
//! - Backend failures surface as errors wrapping the underlying cause;
//!   the core never retries internally - retry policy belongs to the caller

pub mod gemini;

pub use gemini::GeminiProvider;

use crate::error::{self, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Types
// ============================================================================

/// Request parameters for one generation call
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Sampling parameters the backend actually used, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

/// Standardized response from any agent backend.
///
/// `raw` holds the untouched backend response body; the solver only consumes
/// `text`, but the raw body is worth keeping when a game has to be debugged
/// after the fact.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub raw: serde_json::Value,
    pub metadata: Option<ResponseMetadata>,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// The main agent provider trait
#[allow(async_fn_in_trait)]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;

    /// Get the default model
    fn default_model(&self) -> &str;

    /// Bind a backend client to the given credential. Idempotent per
    /// instance; calling it again rebinds the client.
    fn initialize(&mut self, api_key: &str) -> Result<()>;

    /// Whether `initialize` has been called on this instance
    fn is_initialized(&self) -> bool;

    /// Send the prompt to the backend and return generated text plus
    /// metadata. Fails with NotInitialized before `initialize`; backend
    /// failures (auth, network, quota) surface with their own kinds.
    async fn generate(&self, request: GenerationRequest) -> Result<LlmResponse>;
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for creating providers
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    pub default_model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    pub fn gemini() -> Self {
        Self {
            base_url: Some("https://generativelanguage.googleapis.com/v1beta".into()),
            default_model: Some("gemini-pro".into()),
            timeout_secs: Some(120),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

// ============================================================================
// Name Registry
// ============================================================================

/// A provider selected by backend name.
///
/// The registry lives in [`Provider::from_name`]; new backends get a variant
/// and a match arm there and the solver stays untouched.
#[derive(Debug)]
pub enum Provider {
    Gemini(GeminiProvider),
}

impl Provider {
    /// Construct a provider by backend name.
    /// Fails with Unsupported for names the registry does not know.
    pub fn from_name(name: &str) -> Result<Provider> {
        match name {
            "gemini" => Ok(Provider::Gemini(GeminiProvider::new(
                ProviderConfig::gemini(),
            ))),
            other => Err(error::unsupported(format!("unknown provider '{}'", other))
                .with_operation("provider::from_name")),
        }
    }
}

impl LlmProvider for Provider {
    fn name(&self) -> &str {
        match self {
            Provider::Gemini(p) => p.name(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Provider::Gemini(p) => p.default_model(),
        }
    }

    fn initialize(&mut self, api_key: &str) -> Result<()> {
        match self {
            Provider::Gemini(p) => p.initialize(api_key),
        }
    }

    fn is_initialized(&self) -> bool {
        match self {
            Provider::Gemini(p) => p.is_initialized(),
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<LlmResponse> {
        match self {
            Provider::Gemini(p) => p.generate(request).await,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_generation_request_builder() {
        let request = GenerationRequest::new("your move")
            .with_model("gemini-pro")
            .with_temperature(0.1)
            .with_max_tokens(256);

        assert_eq!(request.prompt, "your move");
        assert_eq!(request.model, Some("gemini-pro".into()));
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, Some(256));
    }

    #[test]
    fn test_provider_config() {
        let config = ProviderConfig::gemini();
        assert_eq!(config.default_model, Some("gemini-pro".into()));
        assert!(config
            .base_url
            .as_deref()
            .unwrap()
            .starts_with("https://generativelanguage"));

        let config = ProviderConfig::gemini().with_model("gemini-1.5-flash");
        assert_eq!(config.default_model, Some("gemini-1.5-flash".into()));
    }

    #[test]
    fn test_registry_known_name() {
        let provider = Provider::from_name("gemini").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(!provider.is_initialized());
    }

    #[test]
    fn test_registry_unknown_name() {
        let err = Provider::from_name("palm").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[tokio::test]
    async fn test_generate_before_initialize() {
        let provider = Provider::from_name("gemini").unwrap();
        let err = provider
            .generate(GenerationRequest::new("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);
    }
}
