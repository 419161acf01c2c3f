//! Mock Generation Service Implementation
//!
//! Minimal mock used by `LlmServiceFactory` when provider is `"mock"`.
//! Returns deterministic responses for testing.

use crate::{GenerationReply, GenerationRequest, GenerationService, LlmError};

/// Mock generation service for testing
#[derive(Debug, Clone)]
pub struct MockLlmService;

impl MockLlmService {
    /// Create a new mock generation service
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl GenerationService for MockLlmService {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply, LlmError> {
        tracing::info!("Mock generation service processing request");

        let model = if request.model.is_empty() {
            "mock-model".to_string()
        } else {
            request.model
        };

        // Echo the last prompt line so tests can see what was sent
        let last_line = request
            .prompt
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("empty");

        let text = format!("Mock reply to: {}", last_line);

        Ok(GenerationReply { text, model })
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generation_service() {
        let service = MockLlmService::new();

        let request = GenerationRequest {
            model: String::new(),
            prompt: "USER: Hello, world!\nASSISTANT:".to_string(),
        };

        let reply = service.generate(request).await.unwrap();

        assert!(reply.text.contains("ASSISTANT:"));
        assert_eq!(reply.model, "mock-model");
    }

    #[tokio::test]
    async fn test_mock_uses_provided_model() {
        let service = MockLlmService::new();

        let request = GenerationRequest {
            model: "custom-model".to_string(),
            prompt: "Test".to_string(),
        };

        let reply = service.generate(request).await.unwrap();
        assert_eq!(reply.model, "custom-model");
    }

    #[test]
    fn test_mock_default_model() {
        let service = MockLlmService::new();
        assert_eq!(service.default_model(), "mock-model");
    }
}
