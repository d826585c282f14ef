//! Error types for route planning.

use serde::Serialize;
use thiserror::Error;

use crate::models::Point;

/// Points that leave one UAV unable to complete a mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfeasibleUav {
    pub uav_id: u32,
    pub points: Vec<Point>,
}

/// Errors that can occur while planning routes.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Malformed scenario or parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Some UAVs cannot fly from start to end within their range.
    #[error("infeasible scenario for {} uav(s)", .0.len())]
    InfeasibleScenario(Vec<InfeasibleUav>),

    /// A UAV had no admissible path to its end during construction.
    #[error("uav {uav_id} has no feasible path to its end from ({x}, {y})")]
    ConstructionDeadlock { uav_id: u32, x: f64, y: f64 },

    /// Every iteration was discarded.
    #[error("no iteration produced a complete solution ({discarded} discarded)")]
    NoSolution { discarded: usize },
}

impl PlannerError {
    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::InvalidInput(details.into())
    }

    pub(crate) fn deadlock(uav_id: u32, at: &Point) -> Self {
        Self::ConstructionDeadlock {
            uav_id,
            x: at.x,
            y: at.y,
        }
    }
}
