//! Lingua generation provider
//!
//! Abstracts the external text-completion capability that produces tutor
//! replies, with support for:
//! - Google Gemini `generateContent` for production
//! - Mock provider for testing and development

use thiserror::Error;

pub mod gemini;
pub mod mock;

pub use gemini::GeminiService;
pub use mock::MockLlmService;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider configuration error: {0}")]
    Configuration(String),

    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider returned unusable response: {0}")]
    Response(String),

    #[error("Provider rate limit exceeded")]
    RateLimit,
}

/// A single completion request.
///
/// The tutoring core flattens the conversation into one prompt string;
/// the provider treats it as opaque text.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model override; empty string means the provider default
    pub model: String,
    /// Full prompt (system instruction + serialized history + turn marker)
    pub prompt: String,
}

/// A completion reply
#[derive(Debug, Clone)]
pub struct GenerationReply {
    /// Reply text, trimmed
    pub text: String,
    /// Model that produced the reply
    pub model: String,
}

/// Generation service configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider name (gemini, mock)
    pub provider: String,
    /// API credential for the real provider
    pub api_key: Option<String>,
    /// Default model identifier
    pub default_model: String,
    /// Base URL override (for proxies and tests)
    pub base_url: Option<String>,
}

impl LlmConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-1.5-flash";

    /// Create provider config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        let default_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());
        let base_url = std::env::var("GEMINI_BASE_URL").ok();

        Ok(Self {
            provider,
            api_key,
            default_model,
            base_url,
        })
    }
}

/// Generation service trait for different implementations
#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Produce a completion for the given prompt
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply, LlmError>;

    /// Default model identifier for this provider
    fn default_model(&self) -> &str;
}

/// Generation service factory
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create a generation service based on configuration
    pub fn create(config: LlmConfig) -> Result<Box<dyn GenerationService>, LlmError> {
        match config.provider.as_str() {
            "gemini" => {
                tracing::info!(model = %config.default_model, "Creating Gemini generation service");
                let service = GeminiService::new(config)?;
                Ok(Box::new(service))
            }
            "mock" => {
                tracing::info!("Creating mock generation service");
                Ok(Box::new(MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown generation provider: {}. Supported providers: gemini, mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let config = LlmConfig {
            provider: "palm".to_string(),
            api_key: None,
            default_model: LlmConfig::DEFAULT_MODEL.to_string(),
            base_url: None,
        };

        let result = LlmServiceFactory::create(config);
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }

    #[test]
    fn test_factory_creates_mock_without_credentials() {
        let config = LlmConfig {
            provider: "mock".to_string(),
            api_key: None,
            default_model: LlmConfig::DEFAULT_MODEL.to_string(),
            base_url: None,
        };

        let service = LlmServiceFactory::create(config).unwrap();
        assert_eq!(service.default_model(), "mock-model");
    }

    #[test]
    fn test_factory_gemini_requires_api_key() {
        let config = LlmConfig {
            provider: "gemini".to_string(),
            api_key: None,
            default_model: LlmConfig::DEFAULT_MODEL.to_string(),
            base_url: None,
        };

        let result = LlmServiceFactory::create(config);
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }
}
