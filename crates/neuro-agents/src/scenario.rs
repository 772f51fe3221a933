//! Scenario engine: one-shot projections against the current profile.
//!
//! Holds at most one `ScenarioResult`. Unlike chat, failures surface to the
//! caller as an `ApplicationError`, and the engine records a generic error
//! status; the cause is only logged.

use neuro_core::{BrainParameters, Locale, ResearcherReport, ScenarioResult};
use parking_lot::Mutex;
use tracing::{error, info};

use crate::agent::{ApplicationError, Workflow, WorkflowStatus};
use crate::client::GenerationClient;
use crate::prompts::compile_scenario_prompt;

#[derive(Debug, Default)]
struct ScenarioState {
    current: Option<ScenarioResult>,
    status: WorkflowStatus,
    /// Bumped by reset/invalidate so late results are not installed
    epoch: u64,
}

pub struct ScenarioEngine {
    client: GenerationClient,
    locale: Locale,
    temperature: f32,
    state: Mutex<ScenarioState>,
}

impl ScenarioEngine {
    pub fn new(client: GenerationClient, locale: Locale, temperature: f32) -> Self {
        Self {
            client,
            locale,
            temperature,
            state: Mutex::new(ScenarioState::default()),
        }
    }

    /// Run one scenario; on success it replaces the current result.
    ///
    /// The previous result is cleared when the run starts. A run that
    /// completes after `reset`/`invalidate` still returns its result to the
    /// caller but is not installed as current.
    pub async fn simulate(
        &self,
        parameters: &BrainParameters,
        report: &ResearcherReport,
        scenario_text: &str,
    ) -> Result<ScenarioResult, ApplicationError> {
        let epoch = {
            let mut state = self.state.lock();
            state.current = None;
            state.status = WorkflowStatus::Loading;
            state.epoch
        };

        let prompt = compile_scenario_prompt(parameters, report, scenario_text, self.locale);
        let outcome = self
            .client
            .generate_scenario(&prompt, self.temperature)
            .await;

        let mut state = self.state.lock();
        let stale = state.epoch != epoch;

        match outcome {
            Ok(result) => {
                if stale {
                    info!("Discarding scenario result that finished after a reset");
                } else {
                    info!(
                        "Scenario simulated with {} performance metrics",
                        result.performance_metrics.len()
                    );
                    state.current = Some(result.clone());
                    state.status = WorkflowStatus::Idle;
                }
                Ok(result)
            }
            Err(e) => {
                error!("Scenario simulation failed: {}", e);
                let err = ApplicationError::new(Workflow::Scenario, self.locale);
                if !stale {
                    state.status = WorkflowStatus::Failed(err.message.clone());
                }
                Err(err)
            }
        }
    }

    /// Clear the current result and any error
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.current = None;
        state.status = WorkflowStatus::Idle;
        state.epoch += 1;
    }

    pub fn current(&self) -> Option<ScenarioResult> {
        self.state.lock().current.clone()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.state.lock().status.clone()
    }
}
