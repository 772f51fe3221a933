//! Prompt templates for the three generation modes.
//!
//! Every function here is pure: no I/O, deterministic output for a given
//! input, and no failure path for range-valid parameters.

use neuro_core::{BrainParameters, GenerationResult, Locale, ResearcherReport};
use serde::Serialize;
use std::fmt::{Debug, Write};

/// Persona and task framing for baseline profiles
pub const PROFILE_PREAMBLE: &str = r#"You are a sophisticated neuroscience and psychology simulator called Neuro-Architect.
Your task is to generate a detailed profile of a person based on a custom-engineered brain.
Analyze the following neurochemical and structural parameters (where 0 is extremely low and 100 is extremely high) and their complex interactions."#;

/// Worked interactions between parameters
pub const INTERACTION_GUIDANCE: &str = r#"The analysis should be insightful and reflect the interplay between different parameters, not each parameter in isolation. For example:
- High dopamine and low PFC-Amygdala connectivity might lead to impulsive, reward-seeking behavior.
- Low serotonin and high cortisol could predispose to anxiety.
- High synaptic plasticity and acetylcholine would suggest a fast learner.
- High oxytocin with high GABA may produce a calm, trusting and socially warm disposition."#;

/// What the scientific-analysis section must contain
pub const SCIENTIFIC_GUIDANCE: &str = r#"In scientificAnalysis, for each cognitive metric (memory, creativity, attention, logic, emotionalIntelligence) and each Big Five trait, give:
- formula: a LaTeX formula expressing the score as a weighted combination of the brain parameters,
- calculation: the same formula with this profile's parameter values substituted and the result,
- explanation: a short neuroscientific justification of the weights.
Scores in formulas must match the scores reported in researcherReport and chartsData. Finish with a summary."#;

/// Grounding rules for the chat assistant
pub const CHAT_GROUNDING_RULES: &str = r#"You are the Neuro-Architect assistant. You answer questions about one simulated person whose brain configuration and generated profile are given below.
Rules:
- The configuration and profile below are your ONLY source of facts about this person.
- Do not introduce facts, diagnoses, events or scores that are not present in or directly derivable from this context.
- If a question cannot be answered from the context, say so plainly.
- You may explain the neuroscience behind the profile in general terms, and you may use LaTeX for formulas."#;

/// Persona and task framing for scenario projections
pub const SCENARIO_PREAMBLE: &str = r#"You are Neuro-Architect, simulating how one specific person reacts to a situation.
Write from inside this person's head, grounded in the brain configuration and researcher report below. Every reaction must be explainable by that profile."#;

/// Baseline profile prompt: every parameter with its exact value and gloss
pub fn compile_profile_prompt(params: &BrainParameters, locale: Locale) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(PROFILE_PREAMBLE);
    prompt.push_str("\n\n**Brain Parameters:**\n");
    prompt.push_str(&format_parameter_lines(params));

    let _ = write!(
        prompt,
        "\nBased on these parameters, generate a detailed, scientifically-plausible analysis in the required JSON format.\n\
         {INTERACTION_GUIDANCE}\n\n\
         {SCIENTIFIC_GUIDANCE}\n\n\
         {}\n",
        language_rule(locale)
    );

    prompt
}

/// System instruction for a chat session bound to one profile
pub fn compile_chat_system_instruction(
    params: &BrainParameters,
    result: &GenerationResult,
    locale: Locale,
) -> String {
    format!(
        r#"{CHAT_GROUNDING_RULES}
- {}

=== BRAIN PARAMETERS (0-100) ===
{}

=== GENERATED PROFILE ===
{}"#,
        language_rule(locale),
        to_pretty_json(params),
        to_pretty_json(result),
    )
}

/// Scenario prompt: parameters, researcher report and the situation
pub fn compile_scenario_prompt(
    params: &BrainParameters,
    report: &ResearcherReport,
    scenario_text: &str,
    locale: Locale,
) -> String {
    format!(
        r#"{SCENARIO_PREAMBLE}

=== BRAIN PARAMETERS (0-100) ===
{}
=== RESEARCHER REPORT ===
{}

=== SCENARIO ===
{}

Produce, in the required JSON format:
- narrative: a first-person narrative of the experience, grounded in the profile above,
- outcome: how the situation most likely ends for this person,
- emotionalResponseCurve: exactly three points with time "start", "middle" and "end", in that order, each scoring stress, focus and confidence from 0-100,
- performanceMetrics: scores from 0-100 for the abilities this situation tests, each with an explanation tied to the profile.
{}
"#,
        format_parameter_lines(params),
        to_pretty_json(report),
        scenario_text.trim(),
        language_rule(locale),
    )
}

/// One `- Label: value (gloss)` line per parameter, in canonical order
pub fn format_parameter_lines(params: &BrainParameters) -> String {
    params.iter().fold(String::new(), |mut out, (parameter, value)| {
        let _ = writeln!(out, "- {}: {} ({})", parameter.label(), value, parameter.gloss());
        out
    })
}

fn language_rule(locale: Locale) -> String {
    format!(
        "Write all human-readable text in {}. Keep JSON field names exactly as specified.",
        locale.language_name()
    )
}

fn to_pretty_json<T: Serialize + Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
}
