//! UAV CLI - Command line tools for the coverage planner.
//!
//! Binaries:
//! - plan_routes: plan routes for a scenario file
//! - generate_scenario: write a random scenario

pub mod io;
pub mod profile;

pub use io::{read_scenario, write_json};
pub use profile::parse_profile;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the fmt subscriber, honouring `RUST_LOG` on top of `default_directive`.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(default_directive.parse()?))
        .init();
    Ok(())
}
