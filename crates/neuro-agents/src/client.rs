//! Generation client: one validated round-trip to the generative service.
//!
//! The client owns the only place raw response text is inspected. With a
//! contract, text is parsed, validated against the contract and decoded into
//! a typed result, or the call fails with `MalformedResponse`. Without a
//! contract (chat), the raw text is the result.

use async_trait::async_trait;
use neuro_core::{ChatMessage, GenerationResult, ScenarioResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::agent::{
    temperature_in_range, AgentResult, GenerationError, MalformedResponse, RetryPolicy,
};
use crate::contract::{ContractKind, SchemaContract};

/// Wire-level request handed to a backend
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: Option<String>,
    /// Conversation turns; a one-shot prompt is a single user turn
    pub turns: Vec<ChatMessage>,
    /// Machine-readable contract in the service's schema dialect
    pub response_schema: Option<Value>,
    pub temperature: f32,
}

/// One raw round-trip to the external service
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Send the request and return the raw response text
    async fn send(&self, request: GenerationRequest) -> AgentResult<String>;
}

/// Decoded output of a generation call, one variant per mode
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Profile(GenerationResult),
    Scenario(ScenarioResult),
    Text(String),
}

/// Dispatches prompts, enforces contracts
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    retry: RetryPolicy,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Send a one-shot prompt; validate against `contract` when present
    pub async fn generate(
        &self,
        prompt: &str,
        contract: Option<&SchemaContract>,
        temperature: f32,
    ) -> AgentResult<Generated> {
        let request = GenerationRequest {
            system_instruction: None,
            turns: vec![ChatMessage::user(prompt)],
            response_schema: contract.map(SchemaContract::to_response_schema),
            temperature,
        };

        let raw = self.dispatch(request).await?;

        match contract {
            Some(contract) => decode(contract, &raw),
            None => Ok(Generated::Text(raw)),
        }
    }

    pub async fn generate_profile(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> AgentResult<GenerationResult> {
        match self
            .generate(prompt, Some(&SchemaContract::profile()), temperature)
            .await?
        {
            Generated::Profile(result) => Ok(result),
            other => Err(unexpected_variant("profile", &other)),
        }
    }

    pub async fn generate_scenario(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> AgentResult<ScenarioResult> {
        match self
            .generate(prompt, Some(&SchemaContract::scenario()), temperature)
            .await?
        {
            Generated::Scenario(result) => Ok(result),
            other => Err(unexpected_variant("scenario", &other)),
        }
    }

    /// Next model turn of a conversation; freeform, no contract
    pub async fn continue_chat(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        temperature: f32,
    ) -> AgentResult<String> {
        let request = GenerationRequest {
            system_instruction: Some(system_instruction.to_string()),
            turns: history.to_vec(),
            response_schema: None,
            temperature,
        };

        self.dispatch(request).await
    }

    async fn dispatch(&self, request: GenerationRequest) -> AgentResult<String> {
        if !temperature_in_range(request.temperature) {
            return Err(GenerationError::InvalidRequest(format!(
                "temperature must be in (0, 1], got {}",
                request.temperature
            )));
        }
        if request.turns.is_empty() {
            return Err(GenerationError::InvalidRequest(
                "request has no turns".to_string(),
            ));
        }

        let mut retry = 0;
        loop {
            debug!(
                "Dispatching to {} ({} turns, contract: {})",
                self.backend.name(),
                request.turns.len(),
                request.response_schema.is_some()
            );

            match self.backend.send(request.clone()).await {
                Ok(text) => {
                    info!("{} returned {} bytes", self.backend.name(), text.len());
                    return Ok(text);
                }
                Err(e) if e.is_transient() && retry < self.retry.max_retries => {
                    let delay = self.retry.backoff(retry);
                    warn!(
                        "Transient failure ({}), retry {}/{} in {:?}",
                        e,
                        retry + 1,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Parse, validate and decode contract-bound response text
fn decode(contract: &SchemaContract, raw: &str) -> AgentResult<Generated> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| MalformedResponse::Unparseable(e.to_string()))?;

    contract
        .validate(&value)
        .map_err(MalformedResponse::ContractViolation)?;

    let generated = match contract.kind() {
        ContractKind::Profile => Generated::Profile(
            serde_json::from_value(value).map_err(|e| MalformedResponse::Decode(e.to_string()))?,
        ),
        ContractKind::Scenario => {
            let result: ScenarioResult = serde_json::from_value(value)
                .map_err(|e| MalformedResponse::Decode(e.to_string()))?;
            if !result.has_ordered_curve() {
                return Err(MalformedResponse::Decode(
                    "emotionalResponseCurve must be ordered start, middle, end".to_string(),
                )
                .into());
            }
            Generated::Scenario(result)
        }
    };

    Ok(generated)
}

/// Models occasionally wrap JSON in a markdown fence despite the mime type
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn unexpected_variant(expected: &str, got: &Generated) -> GenerationError {
    let got = match got {
        Generated::Profile(_) => "profile",
        Generated::Scenario(_) => "scenario",
        Generated::Text(_) => "text",
    };
    MalformedResponse::Decode(format!("expected {expected} result, got {got}")).into()
}


#[cfg(test)]
mod tests {
    use super::mock::MockBackend;
    use super::*;
    use crate::agent::TransportError;
    use crate::contract::fixtures::{profile_json, scenario_json};
    use serde_json::json;

    fn client(backend: &Arc<MockBackend>) -> GenerationClient {
        GenerationClient::new(backend.clone())
    }

    fn assert_malformed(result: AgentResult<Generated>) {
        match result {
            Err(GenerationError::MalformedResponse(_)) => {}
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_profile_passes_through_unchanged() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());

        let result = client(&backend).generate_profile("prompt", 0.8).await.unwrap();
        assert_eq!(result.researcher_report.big_five_profile.openness, 73.0);
        assert_eq!(result.charts_data.neurotransmitter_balance[0].value, 80.0);

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, 0.8);
        assert_eq!(requests[0].turns, vec![ChatMessage::user("prompt")]);
        assert_eq!(
            requests[0].response_schema,
            Some(SchemaContract::profile().to_response_schema())
        );
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let backend = MockBackend::new();
        let mut value = profile_json();
        value.as_object_mut().unwrap().remove("chartsData");
        backend.push_json(&value);

        let result = client(&backend)
            .generate("prompt", Some(&SchemaContract::profile()), 0.8)
            .await;
        assert_malformed(result);
    }

    #[tokio::test]
    async fn test_out_of_range_is_malformed() {
        let backend = MockBackend::new();
        let mut value = scenario_json();
        value["performanceMetrics"][0]["value"] = json!(140);
        backend.push_json(&value);

        let result = client(&backend)
            .generate("prompt", Some(&SchemaContract::scenario()), 0.7)
            .await;
        assert_malformed(result);
    }

    #[tokio::test]
    async fn test_short_array_is_malformed() {
        let backend = MockBackend::new();
        let mut value = profile_json();
        value["chartsData"]["brainActivityMap"] = json!([]);
        backend.push_json(&value);

        let result = client(&backend)
            .generate("prompt", Some(&SchemaContract::profile()), 0.8)
            .await;
        assert_malformed(result);
    }

    #[tokio::test]
    async fn test_unparseable_text_is_malformed() {
        let backend = MockBackend::new();
        backend.push_ok("Here is your profile: {");

        let result = client(&backend)
            .generate("prompt", Some(&SchemaContract::profile()), 0.8)
            .await;
        assert_malformed(result);
    }

    #[tokio::test]
    async fn test_unordered_curve_is_malformed() {
        let backend = MockBackend::new();
        let mut value = scenario_json();
        value["emotionalResponseCurve"].as_array_mut().unwrap().swap(0, 1);
        backend.push_json(&value);

        let result = client(&backend).generate_scenario("prompt", 0.7).await;
        assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_fenced_json_accepted() {
        let backend = MockBackend::new();
        backend.push_ok(format!("```json\n{}\n```", scenario_json()));

        let result = client(&backend).generate_scenario("prompt", 0.7).await.unwrap();
        assert_eq!(result.outcome, "The board approves the project.");
    }

    #[tokio::test]
    async fn test_no_contract_returns_raw_text() {
        let backend = MockBackend::new();
        backend.push_ok("  not json at all  ");

        let result = client(&backend).generate("prompt", None, 0.7).await.unwrap();
        assert_eq!(result, Generated::Text("  not json at all  ".to_string()));
        assert!(backend.requests()[0].response_schema.is_none());
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let backend = MockBackend::failing();

        let result = client(&backend).generate("prompt", None, 0.7).await;
        assert!(matches!(result, Err(GenerationError::Transport(_))));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_only_on_transport() {
        let retry = RetryPolicy {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 2,
        };

        let backend = MockBackend::new();
        backend.push_err(
            TransportError::Status {
                status: 503,
                body: String::new(),
            }
            .into(),
        );
        backend.push_ok("recovered");
        let text = client(&backend)
            .with_retry(retry)
            .continue_chat("system", &[ChatMessage::user("hi")], 0.7)
            .await
            .unwrap();
        assert_eq!(text, "recovered");
        assert_eq!(backend.calls(), 2);

        let backend = MockBackend::new();
        backend.push_ok("{}");
        backend.push_json(&profile_json());
        let result = client(&backend)
            .with_retry(retry)
            .generate_profile("prompt", 0.8)
            .await;
        assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_temperature_out_of_range_rejected_before_dispatch() {
        let backend = MockBackend::new();
        backend.push_ok("unused");

        let result = client(&backend).generate("prompt", None, 1.5).await;
        assert!(matches!(result, Err(GenerationError::InvalidRequest(_))));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_request_carries_instruction_and_history() {
        let backend = MockBackend::new();
        backend.push_ok("Hello!");
        let history = vec![
            ChatMessage::user("hi"),
            ChatMessage::model("hello"),
            ChatMessage::user("how focused am I?"),
        ];

        client(&backend)
            .continue_chat("grounding", &history, 0.7)
            .await
            .unwrap();

        let request = &backend.requests()[0];
        assert_eq!(request.system_instruction.as_deref(), Some("grounding"));
        assert_eq!(request.turns, history);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }
}
