//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Iterations used when a request does not ask for a count
    pub default_iterations: usize,
    /// Upper bound on iterations per request
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_iterations: 200,
            max_iterations: 20_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let default_iterations = env::var("UAV_DEFAULT_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.default_iterations);
        let max_iterations = env::var("UAV_MAX_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_iterations);

        Self {
            server_port: env::var("UAV_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            default_iterations,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Requested iteration count, bounded by `max_iterations`.
    pub fn iterations_for(&self, requested: Option<usize>) -> usize {
        let iterations = requested.unwrap_or(self.default_iterations);
        if iterations > self.max_iterations {
            tracing::warn!(
                "Clamping requested iterations {} to {}",
                iterations,
                self.max_iterations
            );
            return self.max_iterations;
        }
        iterations
    }
}
