//! Google Gemini backend.
//!
//! Maps a `GenerationRequest` onto the `generateContent` REST call and
//! classifies failures: anything before a response body arrives is a
//! `TransportError`, an unusable body is a `MalformedResponse`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::agent::{AgentResult, MalformedResponse, TransportError};
use crate::client::{GenerationBackend, GenerationRequest};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Gemini `generateContent` backend
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    config: GeminiConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiBackend {
    /// Build the backend; a blank API key is a configuration error
    pub fn new(config: GeminiConfig) -> neuro_core::Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(neuro_core::Error::Configuration(
                "API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| neuro_core::Error::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn classify(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.config.timeout_secs * 1_000,
            }
        } else {
            TransportError::Unreachable(e.to_string())
        }
    }
}

fn build_request_body(request: GenerationRequest) -> GeminiRequest {
    let system_instruction = request.system_instruction.map(|text| GeminiContent {
        role: None,
        parts: vec![GeminiPart { text }],
    });

    let contents = request
        .turns
        .into_iter()
        .map(|turn| GeminiContent {
            role: Some(turn.role.as_str()),
            parts: vec![GeminiPart { text: turn.text }],
        })
        .collect();

    let response_mime_type = request
        .response_schema
        .as_ref()
        .map(|_| "application/json");

    GeminiRequest {
        system_instruction,
        contents,
        generation_config: GeminiGenerationConfig {
            temperature: request.temperature,
            response_mime_type,
            response_schema: request.response_schema,
        },
    }
}

/// Concatenated text parts of the first candidate
fn extract_text(body: &str) -> AgentResult<String> {
    let response: GeminiResponse = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse Gemini response envelope: {}", e);
        MalformedResponse::Unparseable(e.to_string())
    })?;

    if let Some(usage) = &response.usage_metadata {
        info!(
            "Gemini usage - Prompt: {:?} tokens, Response: {:?} tokens, Total: {:?} tokens",
            usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
        );
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(MalformedResponse::EmptyCandidate)?;

    if let Some(reason) = &candidate.finish_reason {
        debug!("Gemini finish reason: {}", reason);
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(MalformedResponse::EmptyCandidate.into());
    }

    Ok(text)
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn send(&self, request: GenerationRequest) -> AgentResult<String> {
        let url = self.endpoint();
        debug!("Sending request to Gemini API: {}", url);

        let body = build_request_body(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        debug!("Gemini API response status: {}", status);

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, text);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        extract_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::GenerationError;
    use neuro_core::ChatMessage;
    use serde_json::json;

    fn create_test_config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: format!("{DEFAULT_BASE_URL}/"),
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_backend_creation() {
        let backend = GeminiBackend::new(create_test_config()).unwrap();
        assert_eq!(
            backend.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(backend.name(), "gemini-2.5-flash");
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = create_test_config();
        config.api_key = "  ".to_string();
        assert!(matches!(
            GeminiBackend::new(config),
            Err(neuro_core::Error::Configuration(_))
        ));
    }

    #[test]
    fn test_structured_request_body() {
        let body = build_request_body(GenerationRequest {
            system_instruction: None,
            turns: vec![ChatMessage::user("prompt")],
            response_schema: Some(json!({ "type": "OBJECT" })),
            temperature: 0.8,
        });

        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("systemInstruction").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_chat_request_body() {
        let body = build_request_body(GenerationRequest {
            system_instruction: Some("grounding".to_string()),
            turns: vec![ChatMessage::user("hi"), ChatMessage::model("hello")],
            response_schema: None,
            temperature: 0.7,
        });

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "grounding");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][1]["role"], "model");
        assert!(value["generationConfig"].get("responseMimeType").is_none());
        assert!(value["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15 }
        });

        assert_eq!(extract_text(&body.to_string()).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let err = extract_text(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MalformedResponse(MalformedResponse::EmptyCandidate)
        ));

        let err = extract_text("<html>").unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MalformedResponse(MalformedResponse::Unparseable(_))
        ));
    }

    // Integration test - requires API key
    #[tokio::test]
    #[ignore = "Requires NEURO_API_KEY environment variable"]
    async fn test_gemini_integration() {
        let api_key = std::env::var("NEURO_API_KEY").expect("NEURO_API_KEY must be set");
        let backend = GeminiBackend::new(GeminiConfig {
            api_key,
            ..create_test_config()
        })
        .unwrap();

        let text = backend
            .send(GenerationRequest {
                system_instruction: None,
                turns: vec![ChatMessage::user("Reply with the single word: ready")],
                response_schema: None,
                temperature: 0.1,
            })
            .await
            .unwrap();
        assert!(!text.is_empty());
    }
}
