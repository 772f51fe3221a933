//! neuro-architect - generate and explore brain-configuration profiles
//!
//! Usage:
//!   neuro-architect --dopamine 80 --serotonin 20 profile
//!   neuro-architect profile --view charts
//!   neuro-architect --cortisol 90 scenario --preset presentation
//!   neuro-architect scenario --text "A job interview after a sleepless night"
//!   neuro-architect chat

mod cli;
mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use neuro_agents::{GeminiBackend, NeuroArchitect, ViewTab};
use neuro_core::{ScenarioPreset, ScenarioRequest};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{scenario_request, Cli, Commands};
use crate::config::AppConfig;
use crate::render::render;

const REPORT_TABS: [ViewTab; 4] = [
    ViewTab::Narrative,
    ViewTab::Researcher,
    ViewTab::Charts,
    ViewTab::Scientific,
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    settings.validate()?;

    let backend = Arc::new(GeminiBackend::new(settings.gemini_config()?)?);
    let architect = NeuroArchitect::new(backend, settings.agent_config()?);
    info!(
        "Using model {} ({:?})",
        architect.config().model,
        architect.config().locale
    );

    let parameters = cli.brain.to_parameters()?;
    architect.generate_profile(parameters).await?;

    match cli.command {
        Commands::Profile { view } => {
            let tabs = match view {
                Some(tab) => vec![tab],
                None => REPORT_TABS.to_vec(),
            };
            for tab in tabs {
                print_view(&architect, tab);
            }
        }
        Commands::Scenario { preset, text } => {
            architect
                .simulate_scenario(&scenario_request(preset, text))
                .await?;
            print_view(&architect, ViewTab::Scenario);
        }
        Commands::Chat => chat_loop(&architect).await?,
    }

    Ok(())
}

fn print_view(architect: &NeuroArchitect, tab: ViewTab) {
    let snapshot = architect.snapshot();
    if let Some(view) = snapshot.view(tab) {
        println!("== {} ==", tab.title());
        println!("{}", render(view));
    }
}

/// Line-oriented chat on stdin.
///
/// `/scenario <preset|text>` runs a scenario, `/reset-scenario` clears it,
/// `/view <tab>` prints a report view and `/quit` exits.
async fn chat_loop(architect: &NeuroArchitect) -> Result<()> {
    let presets: Vec<_> = ScenarioPreset::ALL.iter().map(|p| p.id()).collect();
    println!(
        "Chat with the generated profile. Commands: /scenario <{}|text>, /reset-scenario, /view <tab>, /quit",
        presets.join("|")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        let (command, arg) = line
            .split_once(' ')
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((line, ""));

        match (command, arg) {
            ("", _) => continue,
            ("/quit", _) => break,
            ("/reset-scenario", _) => {
                architect.reset_scenario();
                println!("Scenario cleared.");
            }
            ("/scenario", arg) => {
                let request = match arg.parse::<ScenarioPreset>() {
                    Ok(preset) => ScenarioRequest::Preset(preset),
                    Err(_) => ScenarioRequest::Custom(arg.to_string()),
                };
                match architect.simulate_scenario(&request).await {
                    Ok(_) => print_view(architect, ViewTab::Scenario),
                    Err(e) => println!("{e}"),
                }
            }
            ("/view", arg) => match arg.parse::<ViewTab>() {
                Ok(tab) => print_view(architect, tab),
                Err(e) => println!("{e}"),
            },
            _ => {
                if let Some(reply) = architect.send_chat_message(line).await {
                    println!("{}", reply.text);
                }
            }
        }
    }

    Ok(())
}
