//! Google Gemini API Implementation
//!
//! Calls the Gemini generateContent API
//! (https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent)
//! using reqwest HTTP client.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{GenerationReply, GenerationRequest, GenerationService, LlmConfig, LlmError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini generateContent request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Gemini generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Gemini API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    status: Option<String>,
    message: String,
}

/// Gemini generation service implementation
pub struct GeminiService {
    client: Client,
    api_key: String,
    default_model: String,
    base_url: String,
}

impl GeminiService {
    /// Create a new Gemini service
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .ok_or_else(|| LlmError::Configuration("GEMINI_API_KEY is required".to_string()))?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            default_model: config.default_model,
            base_url,
        })
    }
}

/// Extract the reply text from a parsed response: first candidate, text
/// parts joined, trimmed. An empty result is an unusable reply.
fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Response("No candidates in response".to_string()))?;

    let content = candidate.content.ok_or_else(|| {
        LlmError::Response(format!(
            "Candidate has no content (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })?;

    let text = content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(LlmError::Response("Empty reply text".to_string()));
    }

    Ok(text)
}

#[async_trait::async_trait]
impl GenerationService for GeminiService {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply, LlmError> {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt,
                }],
            }],
        };

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        tracing::debug!(model = %model, "Sending Gemini API request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimit);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            // Try to parse as API error
            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(LlmError::Response(format!(
                    "Gemini API error ({}): {}",
                    error_response.error.status.as_deref().unwrap_or("UNKNOWN"),
                    error_response.error.message
                )));
            }

            return Err(LlmError::Response(format!(
                "Gemini API returned {}: {}",
                status, error_body
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Response(format!("Failed to parse response: {}", e)))?;

        let text = extract_text(api_response)?;

        Ok(GenerationReply { text, model })
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
