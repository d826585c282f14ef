//! Write a random planning scenario.
//!
//! Usage:
//!   cargo run -p uav-cli --bin generate_scenario -- --targets 40 --profile 2,850,6

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use uav_core::{GeneratorConfig, ScenarioGenerator};
use uav_cli::{init_tracing, parse_profile, write_json};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a random UAV coverage scenario")]
struct Args {
    /// Number of targets
    #[arg(long, default_value_t = 26)]
    targets: usize,

    /// Map width (x in [0, width))
    #[arg(long, default_value_t = 900)]
    width: i32,

    /// Map height (y in [0, height))
    #[arg(long, default_value_t = 700)]
    height: i32,

    /// Seed for reproducible scenarios
    #[arg(long)]
    seed: Option<u64>,

    /// UAV profile as services,range,radius; repeat for more UAVs
    #[arg(long = "profile")]
    profiles: Vec<String>,

    /// Write the scenario here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing("uav_core=info")?;
    let args = Args::parse();

    let mut config = GeneratorConfig {
        targets: args.targets,
        x_range: (0, args.width),
        y_range: (0, args.height),
        seed: args.seed,
        ..GeneratorConfig::default()
    };
    if !args.profiles.is_empty() {
        config.profiles = args
            .profiles
            .iter()
            .map(|raw| parse_profile(raw))
            .collect::<Result<_>>()?;
    }

    let scenario = ScenarioGenerator::new(config)?.generate();
    tracing::info!(
        "Generated {} targets for {} uav(s)",
        scenario.targets.len(),
        scenario.uavs.len()
    );
    write_json(&scenario, args.output.as_deref())
}
