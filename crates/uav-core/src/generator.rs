//! Random scenario generation for demos and stress runs.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::{Point, PointRole, Scenario, Uav};

/// Give up on unique target coordinates after this many draws per target.
const DRAWS_PER_TARGET: usize = 20;

/// Shape of one generated UAV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UavProfile {
    pub service_points: usize,
    pub max_range: f64,
    pub recognition_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub targets: usize,
    /// Half-open integer range for x coordinates
    pub x_range: (i32, i32),
    /// Half-open integer range for y coordinates
    pub y_range: (i32, i32),
    /// One UAV is generated per profile
    pub profiles: Vec<UavProfile>,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            targets: 26,
            x_range: (0, 900),
            y_range: (0, 700),
            profiles: vec![
                UavProfile {
                    service_points: 2,
                    max_range: 850.0,
                    recognition_radius: 6.0,
                },
                UavProfile {
                    service_points: 3,
                    max_range: 900.0,
                    recognition_radius: 4.0,
                },
                UavProfile {
                    service_points: 2,
                    max_range: 1000.0,
                    recognition_radius: 5.0,
                },
            ],
            seed: None,
        }
    }
}

pub struct ScenarioGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl ScenarioGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, PlannerError> {
        let (x_min, x_max) = config.x_range;
        let (y_min, y_max) = config.y_range;
        if x_min >= x_max || y_min >= y_max {
            return Err(PlannerError::invalid_input("generator ranges must be non-empty"));
        }
        if let Some(profile) = config
            .profiles
            .iter()
            .find(|p| p.max_range <= 0.0 || p.recognition_radius <= 0.0)
        {
            return Err(PlannerError::invalid_input(format!(
                "profile with range {} and radius {} is not positive",
                profile.max_range, profile.recognition_radius
            )));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self { config, rng })
    }

    /// Draw a fresh scenario: unique integer-coordinate targets plus one UAV
    /// per profile with random start, end and service points.
    pub fn generate(&mut self) -> Scenario {
        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(self.config.targets);
        let mut draws = 0;
        while targets.len() < self.config.targets
            && draws < self.config.targets * DRAWS_PER_TARGET
        {
            draws += 1;
            let (x, y) = self.random_coords();
            if seen.insert((x, y)) {
                targets.push(Point::target(x as f64, y as f64));
            }
        }
        if targets.len() < self.config.targets {
            tracing::warn!(
                "Generated only {} of {} unique targets",
                targets.len(),
                self.config.targets
            );
        }

        let profiles = self.config.profiles.clone();
        let uavs = profiles
            .iter()
            .zip(1u32..)
            .map(|(profile, id)| {
                let services = (0..profile.service_points)
                    .map(|_| self.random_point(PointRole::Service))
                    .collect();
                Uav::new(
                    id,
                    self.random_point(PointRole::Start),
                    self.random_point(PointRole::Finish),
                    services,
                    profile.max_range,
                    profile.recognition_radius,
                )
            })
            .collect();

        tracing::debug!(
            "Generated scenario with {} targets and {} uavs",
            targets.len(),
            profiles.len()
        );
        Scenario { targets, uavs }
    }

    fn random_coords(&mut self) -> (i32, i32) {
        let (x_min, x_max) = self.config.x_range;
        let (y_min, y_max) = self.config.y_range;
        (
            self.rng.random_range(x_min..x_max),
            self.rng.random_range(y_min..y_max),
        )
    }

    fn random_point(&mut self, role: PointRole) -> Point {
        let (x, y) = self.random_coords();
        Point::new(x as f64, y as f64, role)
    }
}
