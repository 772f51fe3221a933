//! Command-line argument parsing.

use clap::{Args, Parser, Subcommand};
use neuro_agents::ViewTab;
use neuro_core::{BrainParameters, Parameter, ScenarioPreset, ScenarioRequest};
use std::path::PathBuf;

/// Neuro-Architect: brain configuration → personality profile
#[derive(Parser)]
#[command(name = "neuro-architect", version)]
#[command(about = "Generate a cognitive and personality profile from ten brain parameters", long_about = None)]
pub struct Cli {
    /// Configuration file (any format the config crate reads)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub brain: BrainArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Brain parameters, each 0-100
#[derive(Args, Debug, Clone)]
pub struct BrainArgs {
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub dopamine: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub serotonin: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub acetylcholine: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub gaba: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub glutamate: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub synaptic_plasticity: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub receptor_sensitivity: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub pfc_amygdala_connectivity: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub cortisol: u8,
    #[arg(long, default_value_t = 50, value_parser = level)]
    pub oxytocin: u8,
}

fn level(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err(format!("expected an integer in 0-100, got {s}")),
    }
}

impl BrainArgs {
    pub fn to_parameters(&self) -> neuro_core::Result<BrainParameters> {
        [
            (Parameter::Dopamine, self.dopamine),
            (Parameter::Serotonin, self.serotonin),
            (Parameter::Acetylcholine, self.acetylcholine),
            (Parameter::Gaba, self.gaba),
            (Parameter::Glutamate, self.glutamate),
            (Parameter::SynapticPlasticity, self.synaptic_plasticity),
            (Parameter::ReceptorSensitivity, self.receptor_sensitivity),
            (Parameter::PfcAmygdalaConnectivity, self.pfc_amygdala_connectivity),
            (Parameter::Cortisol, self.cortisol),
            (Parameter::Oxytocin, self.oxytocin),
        ]
        .into_iter()
        .try_fold(BrainParameters::default(), |params, (p, v)| params.with(p, v))
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a baseline profile and print it
    Profile {
        /// Print one view only (narrative, researcher, charts, scientific)
        #[arg(long)]
        view: Option<ViewTab>,
    },

    /// Generate a baseline profile, then simulate a scenario against it
    Scenario {
        /// presentation, argument, creative_challenge, social_gathering
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        preset: Option<ScenarioPreset>,

        /// Free-text scenario description
        #[arg(long)]
        text: Option<String>,
    },

    /// Generate a baseline profile, then chat with it on stdin
    Chat,
}

/// Scenario request from the `scenario` subcommand arguments
pub fn scenario_request(preset: Option<ScenarioPreset>, text: Option<String>) -> ScenarioRequest {
    match preset {
        Some(preset) => ScenarioRequest::Preset(preset),
        None => ScenarioRequest::Custom(text.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parameters_from_args() {
        let cli = Cli::try_parse_from([
            "neuro-architect",
            "--dopamine",
            "80",
            "--pfc-amygdala-connectivity",
            "15",
            "profile",
        ])
        .unwrap();

        let params = cli.brain.to_parameters().unwrap();
        assert_eq!(params.dopamine, 80);
        assert_eq!(params.pfc_amygdala_connectivity, 15);
        assert_eq!(params.serotonin, 50);
    }

    #[test]
    fn test_out_of_range_level_rejected() {
        assert!(Cli::try_parse_from(["neuro-architect", "--cortisol", "101", "profile"]).is_err());
    }

    #[test]
    fn test_scenario_needs_preset_or_text() {
        assert!(Cli::try_parse_from(["neuro-architect", "scenario"]).is_err());
        assert!(Cli::try_parse_from([
            "neuro-architect",
            "scenario",
            "--preset",
            "argument",
            "--text",
            "x"
        ])
        .is_err());

        let cli =
            Cli::try_parse_from(["neuro-architect", "scenario", "--preset", "social-gathering"])
                .unwrap();
        match cli.command {
            Commands::Scenario { preset, text } => assert_eq!(
                scenario_request(preset, text),
                ScenarioRequest::Preset(ScenarioPreset::SocialGathering)
            ),
            _ => panic!("expected scenario command"),
        }
    }
}
