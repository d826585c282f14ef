//! Route planning and scenario generation handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use uav_core::{
    build_routes, AntColonyParams, GeneratorConfig, PlannerError, Point, RoutePlan, Scenario,
    ScenarioGenerator, Uav,
};

use crate::config::Config;
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
pub struct PlanRoutesRequest {
    pub targets: Vec<Point>,
    pub uavs: Vec<Uav>,
    #[serde(default)]
    pub params: Option<PlanParams>,
}

/// Optional overrides of the planner defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PlanParams {
    pub iterations: Option<usize>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub evaporation: Option<f64>,
    pub initial_pheromone: Option<f64>,
    pub seed: Option<u64>,
}

impl PlanParams {
    pub fn resolve(self, config: &Config) -> AntColonyParams {
        let defaults = AntColonyParams::default();
        AntColonyParams {
            iterations: config.iterations_for(self.iterations),
            alpha: self.alpha.unwrap_or(defaults.alpha),
            beta: self.beta.unwrap_or(defaults.beta),
            evaporation: self.evaporation.unwrap_or(defaults.evaporation),
            initial_pheromone: self.initial_pheromone.unwrap_or(defaults.initial_pheromone),
            seed: self.seed,
        }
    }
}

pub async fn plan_routes(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PlanRoutesRequest>,
) -> Result<(StatusCode, Json<RoutePlan>), ApiError> {
    let params = payload.params.unwrap_or_default().resolve(state.config());
    let scenario = Scenario::new(payload.targets, payload.uavs);
    tracing::info!(
        "Planning {} targets for {} uav(s) over {} iterations",
        scenario.targets.len(),
        scenario.uavs.len(),
        params.iterations
    );

    let outcome = tokio::task::spawn_blocking(move || build_routes(&scenario, &params))
        .await
        .map_err(|err| {
            tracing::error!("Planning task failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Planning task failed" })),
            )
        })?;

    let plan = outcome.map_err(planner_error)?;
    Ok((StatusCode::OK, Json(plan)))
}

pub async fn generate_scenario(
    Json(config): Json<GeneratorConfig>,
) -> Result<(StatusCode, Json<Scenario>), ApiError> {
    let mut generator = ScenarioGenerator::new(config).map_err(planner_error)?;
    Ok((StatusCode::OK, Json(generator.generate())))
}

fn planner_error(err: PlannerError) -> ApiError {
    match err {
        PlannerError::InvalidInput(details) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Invalid planning request",
                "details": details
            })),
        ),
        PlannerError::InfeasibleScenario(reports) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "Scenario is infeasible",
                "infeasible": reports
            })),
        ),
        other => {
            tracing::error!("Route planning failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Route planning failed",
                    "details": other.to_string()
                })),
            )
        }
    }
}
