//! Plain-text rendering, one function per view.

use neuro_agents::ReportView;
use neuro_core::{
    BigFiveTrait, ChartsData, ChatMessage, ChatRole, CognitiveMetric, FormulaExplanation,
    ResearcherReport, ScenarioResult, ScientificAnalysis,
};
use std::fmt::Write;

pub fn render(view: ReportView<'_>) -> String {
    let mut out = String::new();
    match view {
        ReportView::Narrative(text) => render_narrative(&mut out, text),
        ReportView::Researcher(report) => render_researcher(&mut out, report),
        ReportView::Charts(charts) => render_charts(&mut out, charts),
        ReportView::Scientific(analysis) => render_scientific(&mut out, analysis),
        ReportView::Chat(history) => render_chat(&mut out, history),
        ReportView::Scenario(result) => render_scenario(&mut out, result),
    }
    out
}

fn render_narrative(out: &mut String, text: &str) {
    let _ = writeln!(out, "{}", text.trim());
}

fn render_researcher(out: &mut String, report: &ResearcherReport) {
    let _ = writeln!(out, "Cognitive strengths:");
    bullet_list(out, &report.cognitive_analysis.strengths);
    let _ = writeln!(out, "Cognitive weaknesses:");
    bullet_list(out, &report.cognitive_analysis.weaknesses);

    let _ = writeln!(out, "Big Five profile:");
    for t in BigFiveTrait::ALL {
        let _ = writeln!(
            out,
            "  {:<18} {:>5.1}",
            t.name(),
            report.big_five_profile.score(t)
        );
    }
    let _ = writeln!(
        out,
        "  dominant: {}",
        report.big_five_profile.dominant_trait().name()
    );

    let _ = writeln!(out, "Predispositions:");
    bullet_list(out, &report.predispositions);
}

fn render_charts(out: &mut String, charts: &ChartsData) {
    let _ = writeln!(out, "Cognitive radar:");
    for metric in CognitiveMetric::ALL {
        let score = charts.radar_profile.score(metric);
        let _ = writeln!(out, "  {:<22} {:>5.1} {}", metric.name(), score, bar(score));
    }

    let _ = writeln!(out, "Neurotransmitter balance:");
    for entry in &charts.neurotransmitter_balance {
        let _ = writeln!(out, "  {:<22} {:>5.1} {}", entry.name, entry.value, bar(entry.value));
    }

    let _ = writeln!(out, "Stress response (time, cortisol, dopamine):");
    for point in &charts.stress_response_curve {
        let _ = writeln!(
            out,
            "  t={:<6} {:>5.1} {:>5.1}",
            point.time, point.cortisol, point.dopamine
        );
    }

    let _ = writeln!(out, "Brain activity:");
    for point in &charts.brain_activity_map {
        let _ = writeln!(
            out,
            "  {:<14} ({:>5.1}, {:>5.1}) {:>5.1}",
            point.area, point.x, point.y, point.activity
        );
    }
}

fn render_scientific(out: &mut String, analysis: &ScientificAnalysis) {
    let _ = writeln!(out, "Cognitive metrics:");
    for metric in CognitiveMetric::ALL {
        formula(out, metric.name(), analysis.cognitive_metrics.get(metric));
    }
    let _ = writeln!(out, "Personality traits:");
    for t in BigFiveTrait::ALL {
        formula(out, t.name(), analysis.personality_traits.get(t));
    }
    let _ = writeln!(out, "Summary: {}", analysis.summary);
}

fn render_chat(out: &mut String, history: &[ChatMessage]) {
    for message in history {
        let speaker = match message.role {
            ChatRole::User => "you",
            ChatRole::Model => "profile",
        };
        let _ = writeln!(out, "[{speaker}] {}", message.text);
    }
}

fn render_scenario(out: &mut String, result: Option<&ScenarioResult>) {
    let Some(result) = result else {
        let _ = writeln!(out, "No scenario simulated yet.");
        return;
    };

    let _ = writeln!(out, "{}", result.narrative.trim());
    let _ = writeln!(out);
    let _ = writeln!(out, "Outcome: {}", result.outcome);

    let _ = writeln!(out, "Emotional response (stress, focus, confidence):");
    for point in &result.emotional_response_curve {
        let _ = writeln!(
            out,
            "  {:<7} {:>5.1} {:>5.1} {:>5.1}",
            point.time.key(),
            point.stress,
            point.focus,
            point.confidence
        );
    }

    let _ = writeln!(out, "Performance:");
    for metric in &result.performance_metrics {
        let _ = writeln!(
            out,
            "  {:<22} {:>5.1}  {}",
            metric.name, metric.value, metric.explanation
        );
    }
}

fn bullet_list(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn formula(out: &mut String, name: &str, f: &FormulaExplanation) {
    let _ = writeln!(out, "  {name}");
    let _ = writeln!(out, "    formula:     {}", f.formula);
    let _ = writeln!(out, "    calculation: {}", f.calculation);
    let _ = writeln!(out, "    {}", f.explanation);
}

/// Ten-cell bar for a 0-100 score
fn bar(score: f64) -> String {
    let filled = (score.clamp(0.0, 100.0) / 10.0).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
}
