//! Flood Adapt - Entry Point
//!
//! Runs a single scenario or a seeded batch sweep and writes the results as
//! JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use flood_adapt::core::config::{EconomicState, FloodMapChoice, NetworkKind, OrganisationStructure};
use flood_adapt::core::error::Result;
use flood_adapt::simulation::{run, BatchRunner, Variant};
use flood_adapt::ModelConfig;

/// Agent-based household flood adaptation model
#[derive(Parser, Debug)]
#[command(name = "flood_adapt")]
#[command(about = "Simulate household flood adaptation and government infrastructure decisions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one scenario
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Random seed, overrides the scenario file
        #[arg(long)]
        seed: Option<u64>,

        /// Write the full run output to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Run a seeded sweep, optionally over several flood probabilities
    Batch {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Runs per variant; iteration i is seeded base_seed + i
        #[arg(long, default_value_t = 10)]
        iterations: u32,

        /// First seed of the sweep (defaults to the scenario seed)
        #[arg(long)]
        base_seed: Option<u64>,

        /// One variant per value; the scenario as-is when omitted
        #[arg(long, num_args = 1..)]
        flood_probability: Vec<f64>,

        /// Write batch results to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct ScenarioArgs {
    /// Scenario file (TOML); built-in defaults when omitted
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Number of steps to simulate
    #[arg(long, default_value_t = 80)]
    steps: u32,

    /// Network kind: erdos_renyi, barabasi_albert, watts_strogatz or no_network
    #[arg(long)]
    network: Option<String>,

    /// Flood map: harvey, 100yr or 500yr
    #[arg(long)]
    flood_map: Option<String>,

    /// Government structure: centralised or decentralised
    #[arg(long)]
    structure: Option<String>,

    /// Economic state: growth, neutral or recession
    #[arg(long)]
    economy: Option<String>,

    /// Number of households
    #[arg(long)]
    households: Option<u32>,
}

impl ScenarioArgs {
    fn load(&self) -> Result<ModelConfig> {
        let mut config = match &self.config {
            Some(path) => ModelConfig::load(path)?,
            None => ModelConfig::new(),
        };
        if let Some(network) = &self.network {
            config.network.kind = network.parse::<NetworkKind>()?;
        }
        if let Some(map) = &self.flood_map {
            config.flood.map = map.parse::<FloodMapChoice>()?;
        }
        if let Some(structure) = &self.structure {
            config.government.structure = structure.parse::<OrganisationStructure>()?;
        }
        if let Some(economy) = &self.economy {
            config.economy.state = economy.parse::<EconomicState>()?;
        }
        if let Some(count) = self.households {
            config.households.count = count;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flood_adapt=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            scenario,
            seed,
            output,
        } => {
            let mut config = scenario.load()?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let result = run(config, scenario.steps)?;
            println!("{}", result.summary());

            if let Some(path) = output {
                write_output(&path, &result.to_json()?)?;
            }
        }
        Command::Batch {
            scenario,
            iterations,
            base_seed,
            flood_probability,
            output,
        } => {
            let config = scenario.load()?;
            let base_seed = base_seed.unwrap_or(config.seed);
            let variants = if flood_probability.is_empty() {
                vec![Variant::new("scenario", config)]
            } else {
                flood_probability
                    .iter()
                    .map(|&p| {
                        let mut variant = config.clone();
                        variant.flood.probability = p;
                        variant.validate()?;
                        Ok(Variant::new(format!("flood_probability={}", p), variant))
                    })
                    .collect::<Result<Vec<_>>>()?
            };

            let runner = BatchRunner::new(variants, iterations, scenario.steps, base_seed);
            let results = runner.run()?;

            println!("{:<28} {:>5} {:>6} {:>8} {:>7} {:>14}", "variant", "iter", "seed", "adapted", "floods", "infrastructure");
            for r in &results {
                println!(
                    "{:<28} {:>5} {:>6} {:>8} {:>7} {:>14}",
                    r.variant,
                    r.iteration,
                    r.seed,
                    r.final_metrics.map_or(0, |m| m.total_adapted_households),
                    r.floods,
                    r.infrastructure.as_deref().unwrap_or("-"),
                );
            }

            if let Some(path) = output {
                write_output(&path, &serde_json::to_string_pretty(&results)?)?;
            }
        }
    }
    Ok(())
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Wrote output");
    Ok(())
}
