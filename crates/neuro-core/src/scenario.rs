//! Scenario projections: how a profile reacts to a described situation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::locale::Locale;

/// Curated situations offered alongside free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPreset {
    Presentation,
    Argument,
    CreativeChallenge,
    SocialGathering,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 4] = [
        ScenarioPreset::Presentation,
        ScenarioPreset::Argument,
        ScenarioPreset::CreativeChallenge,
        ScenarioPreset::SocialGathering,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ScenarioPreset::Presentation => "presentation",
            ScenarioPreset::Argument => "argument",
            ScenarioPreset::CreativeChallenge => "creative_challenge",
            ScenarioPreset::SocialGathering => "social_gathering",
        }
    }

    pub fn title(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ScenarioPreset::Presentation, Locale::English) => "An important presentation at work",
            (ScenarioPreset::Presentation, Locale::Persian) => "ارائه مهم در محل کار",
            (ScenarioPreset::Argument, Locale::English) => "An unexpected argument with a friend",
            (ScenarioPreset::Argument, Locale::Persian) => "بحث غیرمنتظره با یک دوست",
            (ScenarioPreset::CreativeChallenge, Locale::English) => "Facing a creative challenge",
            (ScenarioPreset::CreativeChallenge, Locale::Persian) => "مواجهه با یک چالش خلاقانه",
            (ScenarioPreset::SocialGathering, Locale::English) => "Attending a large social gathering",
            (ScenarioPreset::SocialGathering, Locale::Persian) => "شرکت در یک گردهمایی اجتماعی بزرگ",
        }
    }

    pub fn description(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ScenarioPreset::Presentation, Locale::English) => {
                "You have to present a key project you have worked on for months to the company's senior management."
            }
            (ScenarioPreset::Presentation, Locale::Persian) => {
                "شما باید یک پروژه کلیدی را که ماه‌ها روی آن کار کرده‌اید به مدیران ارشد شرکت ارائه دهید."
            }
            (ScenarioPreset::Argument, Locale::English) => {
                "A close friend accuses you of something you think is unfair, and an argument breaks out between you."
            }
            (ScenarioPreset::Argument, Locale::Persian) => {
                "یک دوست نزدیک شما را به چیزی متهم می‌کند که فکر می‌کنید ناعادلانه است و بحثی بین شما در می‌گیرد."
            }
            (ScenarioPreset::CreativeChallenge, Locale::English) => {
                "Your project has hit a complex problem with no obvious solution, and you must invent an entirely new approach."
            }
            (ScenarioPreset::CreativeChallenge, Locale::Persian) => {
                "در پروژه خود با یک مشکل پیچیده روبرو شده‌اید که راه‌حل مشخصی ندارد و باید یک رویکرد کاملاً جدید ابداع کنید."
            }
            (ScenarioPreset::SocialGathering, Locale::English) => {
                "You are invited to a party where you know few people and have to connect with strangers."
            }
            (ScenarioPreset::SocialGathering, Locale::Persian) => {
                "شما به یک مهمانی دعوت شده‌اید که در آن افراد زیادی را نمی‌شناسید و باید با غریبه‌ها ارتباط برقرار کنید."
            }
        }
    }
}

impl FromStr for ScenarioPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ScenarioPreset::ALL
            .iter()
            .copied()
            .find(|p| p.id() == wanted)
            .ok_or_else(|| Error::UnknownScenario(s.to_string()))
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Situation chosen by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioRequest {
    Preset(ScenarioPreset),
    Custom(String),
}

impl ScenarioRequest {
    /// Text handed to the prompt compiler
    pub fn text(&self, locale: Locale) -> String {
        match self {
            ScenarioRequest::Preset(preset) => preset.description(locale).to_string(),
            ScenarioRequest::Custom(text) => text.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ScenarioRequest::Custom(text) if text.trim().is_empty())
    }
}

/// Projected reaction of a profile to one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    /// First-person account of the situation
    pub narrative: String,
    pub outcome: String,
    /// Exactly three points: start, middle, end
    pub emotional_response_curve: Vec<EmotionalPoint>,
    pub performance_metrics: Vec<PerformanceMetric>,
}

impl ScenarioResult {
    /// True when the curve holds exactly start, middle, end in that order
    pub fn has_ordered_curve(&self) -> bool {
        self.emotional_response_curve
            .iter()
            .map(|p| p.time)
            .eq(CurvePhase::ALL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurvePhase {
    Start,
    Middle,
    End,
}

impl CurvePhase {
    pub const ALL: [CurvePhase; 3] = [CurvePhase::Start, CurvePhase::Middle, CurvePhase::End];

    pub fn key(&self) -> &'static str {
        match self {
            CurvePhase::Start => "start",
            CurvePhase::Middle => "middle",
            CurvePhase::End => "end",
        }
    }
}

/// Emotional state at one phase, each score 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalPoint {
    pub time: CurvePhase,
    pub stress: f64,
    pub focus: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub name: String,
    /// Score 0-100
    pub value: f64,
    pub explanation: String,
}
