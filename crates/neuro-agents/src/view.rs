//! View dispatch: which slice of the state each renderer receives.

use neuro_core::{
    ChartsData, ChatMessage, Profile, ResearcherReport, ScenarioResult, ScientificAnalysis,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::agent::WorkflowStatus;

/// Output tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewTab {
    Narrative,
    Researcher,
    Charts,
    Scientific,
    Chat,
    Scenario,
}

impl ViewTab {
    pub const ALL: [ViewTab; 6] = [
        ViewTab::Narrative,
        ViewTab::Researcher,
        ViewTab::Charts,
        ViewTab::Scientific,
        ViewTab::Chat,
        ViewTab::Scenario,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ViewTab::Narrative => "narrative",
            ViewTab::Researcher => "researcher",
            ViewTab::Charts => "charts",
            ViewTab::Scientific => "scientific",
            ViewTab::Chat => "chat",
            ViewTab::Scenario => "scenario",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewTab::Narrative => "Narrative Mode",
            ViewTab::Researcher => "Researcher Report",
            ViewTab::Charts => "Charts",
            ViewTab::Scientific => "Scientific Analysis",
            ViewTab::Chat => "Chat",
            ViewTab::Scenario => "Scenario Simulator",
        }
    }
}

impl fmt::Display for ViewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ViewTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ViewTab::ALL
            .iter()
            .copied()
            .find(|t| t.key() == wanted)
            .ok_or_else(|| format!("unknown view: {s}"))
    }
}

/// Borrowed payload for one renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportView<'a> {
    Narrative(&'a str),
    Researcher(&'a ResearcherReport),
    Charts(&'a ChartsData),
    Scientific(&'a ScientificAnalysis),
    Chat(&'a [ChatMessage]),
    Scenario(Option<&'a ScenarioResult>),
}

/// Consistent copy of the orchestrator state at one instant
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    pub profile: Option<Arc<Profile>>,
    pub profile_status: WorkflowStatus,
    pub chat_history: Vec<ChatMessage>,
    pub scenario: Option<ScenarioResult>,
    pub scenario_status: WorkflowStatus,
}

impl StateSnapshot {
    /// `None` until a baseline profile exists; every tab depends on one
    pub fn view(&self, tab: ViewTab) -> Option<ReportView<'_>> {
        let profile = self.profile.as_deref()?;
        let result = &profile.result;

        Some(match tab {
            ViewTab::Narrative => ReportView::Narrative(&result.narrative_report),
            ViewTab::Researcher => ReportView::Researcher(&result.researcher_report),
            ViewTab::Charts => ReportView::Charts(&result.charts_data),
            ViewTab::Scientific => ReportView::Scientific(&result.scientific_analysis),
            ViewTab::Chat => ReportView::Chat(&self.chat_history),
            ViewTab::Scenario => ReportView::Scenario(self.scenario.as_ref()),
        })
    }
}
