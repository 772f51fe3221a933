//! Baseline profile produced from one brain configuration.
//!
//! The shapes here mirror the JSON the generative service is asked to emit
//! (camelCase on the wire). A `GenerationResult` is only ever built from a
//! response that passed contract validation as a whole.

use serde::{Deserialize, Serialize};

use crate::params::BrainParameters;
use crate::types::{ProfileId, Timestamp};

/// Complete structured profile from one baseline generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// First-person story of a typical day
    pub narrative_report: String,
    pub researcher_report: ResearcherReport,
    pub charts_data: ChartsData,
    pub scientific_analysis: ScientificAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearcherReport {
    pub cognitive_analysis: CognitiveAnalysis,
    pub big_five_profile: BigFiveProfile,
    /// e.g. anxiety, high creativity, depression, focus
    pub predispositions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Big Five (OCEAN) scores, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BigFiveProfile {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl BigFiveProfile {
    pub fn score(&self, trait_name: BigFiveTrait) -> f64 {
        match trait_name {
            BigFiveTrait::Openness => self.openness,
            BigFiveTrait::Conscientiousness => self.conscientiousness,
            BigFiveTrait::Extraversion => self.extraversion,
            BigFiveTrait::Agreeableness => self.agreeableness,
            BigFiveTrait::Neuroticism => self.neuroticism,
        }
    }

    /// Highest-scoring trait; ties resolve to the earlier trait
    pub fn dominant_trait(&self) -> BigFiveTrait {
        BigFiveTrait::ALL
            .into_iter()
            .fold(BigFiveTrait::Openness, |best, t| {
                if self.score(t) > self.score(best) {
                    t
                } else {
                    best
                }
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BigFiveTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl BigFiveTrait {
    pub const ALL: [BigFiveTrait; 5] = [
        BigFiveTrait::Openness,
        BigFiveTrait::Conscientiousness,
        BigFiveTrait::Extraversion,
        BigFiveTrait::Agreeableness,
        BigFiveTrait::Neuroticism,
    ];

    /// Wire key
    pub fn key(&self) -> &'static str {
        match self {
            BigFiveTrait::Openness => "openness",
            BigFiveTrait::Conscientiousness => "conscientiousness",
            BigFiveTrait::Extraversion => "extraversion",
            BigFiveTrait::Agreeableness => "agreeableness",
            BigFiveTrait::Neuroticism => "neuroticism",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BigFiveTrait::Openness => "Openness",
            BigFiveTrait::Conscientiousness => "Conscientiousness",
            BigFiveTrait::Extraversion => "Extraversion",
            BigFiveTrait::Agreeableness => "Agreeableness",
            BigFiveTrait::Neuroticism => "Neuroticism",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsData {
    pub radar_profile: RadarProfile,
    pub neurotransmitter_balance: Vec<NameValue>,
    /// Levels over time after a stressful event, in time order
    pub stress_response_curve: Vec<StressResponsePoint>,
    pub brain_activity_map: Vec<BrainActivityPoint>,
}

/// Five cognitive axes, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarProfile {
    pub memory: f64,
    pub creativity: f64,
    pub attention: f64,
    pub logic: f64,
    pub emotional_intelligence: f64,
}

impl RadarProfile {
    pub fn score(&self, metric: CognitiveMetric) -> f64 {
        match metric {
            CognitiveMetric::Memory => self.memory,
            CognitiveMetric::Creativity => self.creativity,
            CognitiveMetric::Attention => self.attention,
            CognitiveMetric::Logic => self.logic,
            CognitiveMetric::EmotionalIntelligence => self.emotional_intelligence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CognitiveMetric {
    Memory,
    Creativity,
    Attention,
    Logic,
    EmotionalIntelligence,
}

impl CognitiveMetric {
    pub const ALL: [CognitiveMetric; 5] = [
        CognitiveMetric::Memory,
        CognitiveMetric::Creativity,
        CognitiveMetric::Attention,
        CognitiveMetric::Logic,
        CognitiveMetric::EmotionalIntelligence,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CognitiveMetric::Memory => "memory",
            CognitiveMetric::Creativity => "creativity",
            CognitiveMetric::Attention => "attention",
            CognitiveMetric::Logic => "logic",
            CognitiveMetric::EmotionalIntelligence => "emotionalIntelligence",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CognitiveMetric::Memory => "Memory",
            CognitiveMetric::Creativity => "Creativity",
            CognitiveMetric::Attention => "Attention",
            CognitiveMetric::Logic => "Logic",
            CognitiveMetric::EmotionalIntelligence => "Emotional Intelligence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressResponsePoint {
    pub time: f64,
    pub cortisol: f64,
    pub dopamine: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainActivityPoint {
    /// e.g. PFC, Amygdala, Hippocampus, Striatum
    pub area: String,
    /// Coordinate in [-10, 10]
    pub x: f64,
    /// Coordinate in [-10, 10]
    pub y: f64,
    /// Activity level in [0, 100]
    pub activity: f64,
}

/// Formula-level justification of every derived score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScientificAnalysis {
    pub cognitive_metrics: CognitiveMetricFormulas,
    pub personality_traits: PersonalityTraitFormulas,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveMetricFormulas {
    pub memory: FormulaExplanation,
    pub creativity: FormulaExplanation,
    pub attention: FormulaExplanation,
    pub logic: FormulaExplanation,
    pub emotional_intelligence: FormulaExplanation,
}

impl CognitiveMetricFormulas {
    pub fn get(&self, metric: CognitiveMetric) -> &FormulaExplanation {
        match metric {
            CognitiveMetric::Memory => &self.memory,
            CognitiveMetric::Creativity => &self.creativity,
            CognitiveMetric::Attention => &self.attention,
            CognitiveMetric::Logic => &self.logic,
            CognitiveMetric::EmotionalIntelligence => &self.emotional_intelligence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraitFormulas {
    pub openness: FormulaExplanation,
    pub conscientiousness: FormulaExplanation,
    pub extraversion: FormulaExplanation,
    pub agreeableness: FormulaExplanation,
    pub neuroticism: FormulaExplanation,
}

impl PersonalityTraitFormulas {
    pub fn get(&self, trait_name: BigFiveTrait) -> &FormulaExplanation {
        match trait_name {
            BigFiveTrait::Openness => &self.openness,
            BigFiveTrait::Conscientiousness => &self.conscientiousness,
            BigFiveTrait::Extraversion => &self.extraversion,
            BigFiveTrait::Agreeableness => &self.agreeableness,
            BigFiveTrait::Neuroticism => &self.neuroticism,
        }
    }
}

/// LaTeX formula, worked calculation and prose justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaExplanation {
    pub formula: String,
    pub calculation: String,
    pub explanation: String,
}

/// A validated generation stamped with the configuration that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub parameters: BrainParameters,
    pub result: GenerationResult,
    pub generated_at: Timestamp,
}

impl Profile {
    pub fn new(parameters: BrainParameters, result: GenerationResult) -> Self {
        Self {
            id: ProfileId::new(),
            parameters,
            result,
            generated_at: Timestamp::now(),
        }
    }
}
