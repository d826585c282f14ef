//! Plan coverage routes for a scenario file.
//!
//! Usage:
//!   cargo run -p uav-cli --bin plan_routes -- --scenario scenario.json --seed 7

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use uav_core::{build_routes, AntColonyParams};
use uav_cli::{init_tracing, read_scenario, write_json};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan ant-colony coverage routes for a UAV fleet")]
struct Args {
    /// Scenario JSON file (targets and uavs)
    #[arg(long)]
    scenario: PathBuf,

    /// Number of colony iterations
    #[arg(long, default_value_t = 200)]
    iterations: usize,

    /// Pheromone exponent
    #[arg(long, default_value_t = 0.87)]
    alpha: f64,

    /// Visibility exponent
    #[arg(long, default_value_t = 2.08)]
    beta: f64,

    /// Evaporation rate in [0, 1]
    #[arg(long, default_value_t = 0.36)]
    evaporation: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write the plan here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing("uav_core=info")?;
    let args = Args::parse();

    let scenario = read_scenario(&args.scenario)?;
    let params = AntColonyParams {
        iterations: args.iterations,
        alpha: args.alpha,
        beta: args.beta,
        evaporation: args.evaporation,
        seed: args.seed,
        ..AntColonyParams::default()
    };

    let plan = build_routes(&scenario, &params).context("route planning failed")?;
    for route in &plan.routes {
        tracing::info!(
            "UAV {}: {} segment(s), {} target(s), distance {:.2}",
            route.uav_id,
            route.segments.len(),
            route.observed_targets().len(),
            route.distance()
        );
    }
    if !plan.uncovered.is_empty() {
        tracing::warn!("{} target(s) left uncovered", plan.uncovered.len());
    }

    write_json(&plan, args.output.as_deref())
}
