//! Orchestrator owning the baseline profile, chat session and scenario.
//!
//! ```text
//! BrainParameters
//!     ↓ compile_profile_prompt
//! [GenerationClient + profile contract]
//!     → Profile (baseline)
//!        ├─→ SessionManager  (chat grounded in the full profile)
//!        └─→ ScenarioEngine  (projection from the researcher report)
//! ```
//!
//! A new baseline generation discards the chat session and the scenario
//! result before the new profile becomes visible. Chat and scenario never
//! touch each other's state. No lock is held across a network call, so the
//! three workflows proceed independently.

use neuro_core::{
    BrainParameters, ChatMessage, Profile, ScenarioRequest, ScenarioResult, SessionId,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::agent::{AgentConfig, ApplicationError, Workflow, WorkflowStatus};
use crate::client::{GenerationBackend, GenerationClient};
use crate::prompts::compile_profile_prompt;
use crate::scenario::ScenarioEngine;
use crate::session::SessionManager;
use crate::view::StateSnapshot;

#[derive(Debug, Default)]
struct ProfileState {
    current: Option<Arc<Profile>>,
    status: WorkflowStatus,
    /// Bumped on every baseline request so late completions are ignored
    epoch: u64,
}

/// Single orchestration object for one user session
pub struct NeuroArchitect {
    config: AgentConfig,
    client: GenerationClient,
    profile: RwLock<ProfileState>,
    sessions: SessionManager,
    scenarios: ScenarioEngine,
}

impl NeuroArchitect {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: AgentConfig) -> Self {
        let client = GenerationClient::new(backend).with_retry(config.retry);

        Self {
            sessions: SessionManager::new(client.clone(), config.locale, config.chat_temperature),
            scenarios: ScenarioEngine::new(
                client.clone(),
                config.locale,
                config.scenario_temperature,
            ),
            profile: RwLock::new(ProfileState::default()),
            client,
            config,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Generate a new baseline profile.
    ///
    /// The previous profile, chat session and scenario result are cleared
    /// up front; on failure nothing replaces them and a generic error is
    /// recorded.
    pub async fn generate_profile(
        &self,
        parameters: BrainParameters,
    ) -> Result<Arc<Profile>, ApplicationError> {
        let epoch = {
            let mut state = self.profile.write();
            state.current = None;
            state.status = WorkflowStatus::Loading;
            state.epoch += 1;
            state.epoch
        };
        self.sessions.invalidate();
        self.scenarios.reset();

        info!("Generating baseline profile (request {})", epoch);

        let prompt = compile_profile_prompt(&parameters, self.config.locale);
        let outcome = self
            .client
            .generate_profile(&prompt, self.config.profile_temperature)
            .await;

        let mut state = self.profile.write();
        let stale = state.epoch != epoch;

        match outcome {
            Ok(result) => {
                let profile = Arc::new(Profile::new(parameters, result));
                if stale {
                    info!("Ignoring superseded profile request {}", epoch);
                } else {
                    // a chat or scenario may have raced the clear above
                    self.sessions.invalidate();
                    self.scenarios.reset();
                    state.current = Some(profile.clone());
                    state.status = WorkflowStatus::Idle;
                    info!(
                        "Baseline profile {} generated at {}",
                        profile.id,
                        profile.generated_at.to_datetime()
                    );
                }
                Ok(profile)
            }
            Err(e) => {
                error!("Profile generation failed: {}", e);
                let err = ApplicationError::new(Workflow::Profile, self.config.locale);
                if !stale {
                    state.status = WorkflowStatus::Failed(err.message.clone());
                }
                Err(err)
            }
        }
    }

    /// Send a chat message about the current profile.
    ///
    /// Returns `None` when there is no profile yet or the text is blank;
    /// otherwise always the model's reply (or the fallback apology).
    pub async fn send_chat_message(&self, text: &str) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let Some(profile) = self.profile() else {
            warn!("Chat message ignored: no baseline profile");
            return None;
        };

        Some(
            self.sessions
                .send_message(&profile.parameters, &profile, text)
                .await,
        )
    }

    /// Run a scenario against the current profile's researcher report
    pub async fn simulate_scenario(
        &self,
        request: &ScenarioRequest,
    ) -> Result<ScenarioResult, ApplicationError> {
        let Some(profile) = self.profile() else {
            warn!("Scenario requested without a baseline profile");
            return Err(ApplicationError::new(Workflow::Scenario, self.config.locale));
        };
        if request.is_empty() {
            warn!("Scenario requested with empty description");
            return Err(ApplicationError::new(Workflow::Scenario, self.config.locale));
        }

        let text = request.text(self.config.locale);
        self.scenarios
            .simulate(&profile.parameters, &profile.result.researcher_report, &text)
            .await
    }

    /// Clear the scenario result; profile and chat are untouched
    pub fn reset_scenario(&self) {
        self.scenarios.reset();
    }

    pub fn profile(&self) -> Option<Arc<Profile>> {
        self.profile.read().current.clone()
    }

    pub fn profile_status(&self) -> WorkflowStatus {
        self.profile.read().status.clone()
    }

    pub fn chat_history(&self) -> Vec<ChatMessage> {
        self.sessions.history()
    }

    pub fn chat_session_id(&self) -> Option<SessionId> {
        self.sessions.session_id()
    }

    pub fn chat_pending(&self) -> bool {
        self.sessions.is_pending()
    }

    /// Session handle for the current profile, creating it if needed
    pub fn open_chat(&self) -> Option<SessionId> {
        let profile = self.profile()?;
        Some(self.sessions.get_or_create(&profile.parameters, &profile))
    }

    pub fn scenario(&self) -> Option<ScenarioResult> {
        self.scenarios.current()
    }

    pub fn scenario_status(&self) -> WorkflowStatus {
        self.scenarios.status()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let (profile, profile_status) = {
            let state = self.profile.read();
            (state.current.clone(), state.status.clone())
        };

        StateSnapshot {
            profile,
            profile_status,
            chat_history: self.sessions.history(),
            scenario: self.scenarios.current(),
            scenario_status: self.scenarios.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::TransportError;
    use crate::agent::AgentResult;
    use crate::client::mock::{GatedBackend, MockBackend};
    use crate::contract::fixtures::{profile_json, scenario_json};
    use crate::view::{ReportView, ViewTab};
    use neuro_core::{ChatRole, Locale, Parameter, ScenarioPreset};

    fn architect(backend: &Arc<MockBackend>) -> NeuroArchitect {
        NeuroArchitect::new(backend.clone(), AgentConfig::default())
    }

    fn params_with_dopamine(level: u8) -> BrainParameters {
        BrainParameters::default()
            .with(Parameter::Dopamine, level)
            .unwrap()
    }

    /// Drive `fut` while releasing gated call `call` with `reply`
    async fn settle<F: std::future::Future>(
        gate: &GatedBackend,
        call: usize,
        reply: AgentResult<String>,
        fut: F,
    ) -> F::Output {
        let (output, _) = tokio::join!(fut, async {
            gate.wait_for_calls(call + 1).await;
            gate.release(call, reply);
        });
        output
    }

    fn profile_reply() -> AgentResult<String> {
        Ok(profile_json().to_string())
    }

    #[tokio::test]
    async fn test_end_to_end_values_pass_through() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        let architect = architect(&backend);

        let params = params_with_dopamine(80)
            .with(Parameter::Serotonin, 10)
            .unwrap();
        let profile = architect.generate_profile(params).await.unwrap();

        assert_eq!(profile.result.researcher_report.big_five_profile.openness, 73.0);
        assert_eq!(profile.parameters, params);
        let visible = architect.profile().unwrap();
        assert_eq!(visible.result.researcher_report.big_five_profile.openness, 73.0);
        assert_eq!(architect.profile_status(), WorkflowStatus::Idle);

        let prompt = &backend.requests()[0].turns[0].text;
        assert!(prompt.contains("Baseline Dopamine: 80"));
        assert!(prompt.contains("Baseline Serotonin: 10"));
    }

    #[tokio::test]
    async fn test_profile_failure_sets_generic_error() {
        let backend = MockBackend::new();
        backend.push_err(
            TransportError::Status {
                status: 500,
                body: "boom".to_string(),
            }
            .into(),
        );
        let architect = architect(&backend);

        let err = architect
            .generate_profile(BrainParameters::default())
            .await
            .unwrap_err();

        assert_eq!(err.workflow, Workflow::Profile);
        assert!(!err.message.contains("boom"));
        assert!(architect.profile().is_none());
        assert_eq!(
            architect.profile_status().error(),
            Some(Locale::English.profile_error())
        );
    }

    #[tokio::test]
    async fn test_malformed_profile_never_exposed() {
        let backend = MockBackend::new();
        let mut partial = profile_json();
        partial.as_object_mut().unwrap().remove("scientificAnalysis");
        backend.push_json(&partial);
        let architect = architect(&backend);

        assert!(architect
            .generate_profile(BrainParameters::default())
            .await
            .is_err());
        assert!(architect.profile().is_none());
    }

    #[tokio::test]
    async fn test_chat_requires_profile() {
        let backend = MockBackend::new();
        let architect = architect(&backend);

        assert!(architect.send_chat_message("hello").await.is_none());
        assert!(architect.open_chat().is_none());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_failure_stays_in_transcript() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        let architect = architect(&backend);
        architect
            .generate_profile(BrainParameters::default())
            .await
            .unwrap();

        // script exhausted: the chat call fails
        let reply = architect.send_chat_message("hello").await.unwrap();
        assert_eq!(reply.role, ChatRole::Model);
        assert_eq!(reply.text, Locale::English.chat_fallback());
        assert_eq!(architect.chat_history().len(), 2);
        assert_eq!(architect.profile_status(), WorkflowStatus::Idle);
    }

    #[tokio::test]
    async fn test_scenario_reset_leaves_profile_and_chat() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        backend.push_ok("Your dopamine drives you.");
        backend.push_json(&scenario_json());
        let architect = architect(&backend);

        let baseline = architect.generate_profile(BrainParameters::default()).await.unwrap();
        architect.send_chat_message("hello").await.unwrap();
        let session = architect.chat_session_id();
        architect
            .simulate_scenario(&ScenarioRequest::Preset(ScenarioPreset::Presentation))
            .await
            .unwrap();
        assert!(architect.scenario().is_some());

        architect.reset_scenario();

        assert!(architect.scenario().is_none());
        assert_eq!(architect.chat_history().len(), 2);
        assert_eq!(architect.chat_session_id(), session);
        let after = architect.profile().unwrap();
        assert!(Arc::ptr_eq(&baseline, &after));
        assert_eq!(after.result, baseline.result);
    }

    #[tokio::test]
    async fn test_scenario_failure_leaves_profile_and_chat() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        backend.push_ok("hi there");
        backend.push_err(TransportError::Unreachable("offline".to_string()).into());
        let architect = architect(&backend);

        architect.generate_profile(BrainParameters::default()).await.unwrap();
        architect.send_chat_message("hello").await.unwrap();

        let err = architect
            .simulate_scenario(&ScenarioRequest::Custom("A job interview".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err.workflow, Workflow::Scenario);
        assert!(architect.scenario_status().error().is_some());
        assert_eq!(architect.profile_status(), WorkflowStatus::Idle);
        assert!(architect.profile().is_some());
        assert_eq!(architect.chat_history().len(), 2);
    }

    #[tokio::test]
    async fn test_scenario_uses_researcher_report_only() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        backend.push_json(&scenario_json());
        let architect = architect(&backend);

        let profile = architect.generate_profile(BrainParameters::default()).await.unwrap();
        architect
            .simulate_scenario(&ScenarioRequest::Preset(ScenarioPreset::SocialGathering))
            .await
            .unwrap();

        let prompt = &backend.requests()[1].turns[0].text;
        assert!(prompt.contains(ScenarioPreset::SocialGathering.description(Locale::English)));
        assert!(prompt.contains("Reward seeking"));
        assert!(!prompt.contains(&profile.result.narrative_report));
    }

    #[tokio::test]
    async fn test_empty_scenario_rejected_without_dispatch() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        let architect = architect(&backend);
        architect.generate_profile(BrainParameters::default()).await.unwrap();

        let result = architect
            .simulate_scenario(&ScenarioRequest::Custom("  ".to_string()))
            .await;
        assert!(result.is_err());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_regeneration_clears_chat_and_scenario() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        backend.push_ok("hello back");
        backend.push_json(&scenario_json());
        backend.push_json(&profile_json());
        let architect = architect(&backend);

        let first = architect.generate_profile(params_with_dopamine(80)).await.unwrap();
        architect.send_chat_message("hello").await.unwrap();
        let old_session = architect.chat_session_id().unwrap();
        architect
            .simulate_scenario(&ScenarioRequest::Preset(ScenarioPreset::Argument))
            .await
            .unwrap();

        let second = architect.generate_profile(params_with_dopamine(20)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(architect.chat_history().is_empty());
        assert!(architect.chat_session_id().is_none());
        assert!(architect.scenario().is_none());

        let new_session = architect.open_chat().unwrap();
        assert_ne!(new_session, old_session);
        assert!(architect.chat_history().is_empty());
    }

    #[tokio::test]
    async fn test_regeneration_with_same_parameters_renews_session() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        backend.push_json(&profile_json());
        let architect = architect(&backend);
        let params = BrainParameters::default();

        architect.generate_profile(params).await.unwrap();
        let first = architect.open_chat().unwrap();
        assert_eq!(architect.open_chat(), Some(first));

        architect.generate_profile(params).await.unwrap();
        assert_ne!(architect.open_chat(), Some(first));
    }

    #[tokio::test]
    async fn test_failed_regeneration_still_clears_old_state() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        backend.push_ok("reply");
        let architect = architect(&backend);

        architect.generate_profile(BrainParameters::default()).await.unwrap();
        architect.send_chat_message("hello").await.unwrap();

        // script exhausted: regeneration fails
        assert!(architect
            .generate_profile(BrainParameters::default())
            .await
            .is_err());
        assert!(architect.profile().is_none());
        assert!(architect.chat_history().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_views() {
        let backend = MockBackend::new();
        backend.push_json(&profile_json());
        backend.push_ok("reply");
        let architect = architect(&backend);

        assert!(architect.snapshot().view(ViewTab::Narrative).is_none());

        let profile = architect.generate_profile(BrainParameters::default()).await.unwrap();
        architect.send_chat_message("hello").await.unwrap();

        let snapshot = architect.snapshot();
        assert_eq!(
            snapshot.view(ViewTab::Narrative),
            Some(ReportView::Narrative(profile.result.narrative_report.as_str()))
        );
        match snapshot.view(ViewTab::Chat) {
            Some(ReportView::Chat(history)) => assert_eq!(history.len(), 2),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_late_chat_reply_dropped_after_regeneration() {
        let gate = GatedBackend::new();
        let architect = NeuroArchitect::new(gate.clone(), AgentConfig::default());

        settle(&gate, 0, profile_reply(), architect.generate_profile(params_with_dopamine(80)))
            .await
            .unwrap();

        let chat = architect.send_chat_message("hello");
        let regenerate = async {
            gate.wait_for_calls(2).await;
            assert_eq!(architect.chat_history(), vec![ChatMessage::user("hello")]);
            assert!(architect.chat_pending());

            let second = settle(
                &gate,
                2,
                profile_reply(),
                architect.generate_profile(params_with_dopamine(20)),
            )
            .await
            .unwrap();
            gate.release(1, Ok("late reply".to_string()));
            second
        };

        let (reply, second) = tokio::join!(chat, regenerate);

        assert_eq!(reply.unwrap().text, "late reply");
        assert!(architect.chat_history().is_empty());
        assert!(architect.chat_session_id().is_none());
        assert_eq!(architect.profile().unwrap().id, second.id);
    }

    #[tokio::test]
    async fn test_late_scenario_result_dropped_after_regeneration() {
        let gate = GatedBackend::new();
        let architect = NeuroArchitect::new(gate.clone(), AgentConfig::default());

        settle(&gate, 0, profile_reply(), architect.generate_profile(params_with_dopamine(80)))
            .await
            .unwrap();

        let scenario =
            architect.simulate_scenario(&ScenarioRequest::Preset(ScenarioPreset::Argument));
        let regenerate = async {
            gate.wait_for_calls(2).await;
            assert!(architect.scenario_status().is_loading());

            settle(
                &gate,
                2,
                profile_reply(),
                architect.generate_profile(params_with_dopamine(20)),
            )
            .await
            .unwrap();
            gate.release(1, Ok(scenario_json().to_string()));
        };

        let (late, _) = tokio::join!(scenario, regenerate);

        // the caller still gets its result; it is just not installed
        assert!(late.is_ok());
        assert!(architect.scenario().is_none());
        assert_eq!(architect.scenario_status(), WorkflowStatus::Idle);
        assert_eq!(architect.profile().unwrap().parameters.dopamine, 20);
    }

    #[tokio::test]
    async fn test_superseded_profile_not_installed() {
        let gate = GatedBackend::new();
        let architect = NeuroArchitect::new(gate.clone(), AgentConfig::default());

        let older = architect.generate_profile(params_with_dopamine(80));
        let newer = async {
            gate.wait_for_calls(1).await;
            let newer = settle(
                &gate,
                1,
                profile_reply(),
                architect.generate_profile(params_with_dopamine(20)),
            )
            .await
            .unwrap();
            gate.release(0, profile_reply());
            newer
        };

        let (older, newer) = tokio::join!(older, newer);
        let older = older.unwrap();

        assert_ne!(older.id, newer.id);
        let current = architect.profile().unwrap();
        assert_eq!(current.id, newer.id);
        assert_eq!(current.parameters.dopamine, 20);
        assert_eq!(architect.profile_status(), WorkflowStatus::Idle);
    }

    #[tokio::test]
    async fn test_superseded_profile_failure_keeps_newer_status() {
        let gate = GatedBackend::new();
        let architect = NeuroArchitect::new(gate.clone(), AgentConfig::default());

        let older = architect.generate_profile(params_with_dopamine(80));
        let newer = async {
            gate.wait_for_calls(1).await;
            settle(
                &gate,
                1,
                profile_reply(),
                architect.generate_profile(params_with_dopamine(20)),
            )
            .await
            .unwrap();
            gate.release(0, Err(TransportError::Timeout { duration_ms: 60_000 }.into()));
        };

        let (older, _) = tokio::join!(older, newer);

        assert!(older.is_err());
        assert_eq!(architect.profile_status(), WorkflowStatus::Idle);
        assert_eq!(architect.profile().unwrap().parameters.dopamine, 20);
    }
}
