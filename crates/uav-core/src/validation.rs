//! Up-front checks on planning input.

use std::collections::HashSet;

use crate::engine::AntColonyParams;
use crate::error::{InfeasibleUav, PlannerError};
use crate::geometry::distance;
use crate::models::{Scenario, Uav};
use crate::reachability::feasible_reach;

pub fn validate_params(params: &AntColonyParams) -> Result<(), PlannerError> {
    if params.iterations == 0 {
        return Err(PlannerError::invalid_input("iterations must be at least 1"));
    }
    if !(0.0..=1.0).contains(&params.evaporation) {
        return Err(PlannerError::invalid_input("evaporation must be within [0, 1]"));
    }
    if !(params.alpha.is_finite() && params.alpha >= 0.0)
        || !(params.beta.is_finite() && params.beta >= 0.0)
    {
        return Err(PlannerError::invalid_input("alpha and beta must be non-negative"));
    }
    if !(params.initial_pheromone.is_finite() && params.initial_pheromone > 0.0) {
        return Err(PlannerError::invalid_input("initial pheromone must be positive"));
    }
    Ok(())
}

/// Reject malformed input, then report every UAV that cannot get from its
/// start to its end.
pub fn validate_scenario(scenario: &Scenario, params: &AntColonyParams) -> Result<(), PlannerError> {
    validate_params(params)?;

    if scenario.uavs.is_empty() {
        return Err(PlannerError::invalid_input("scenario has no uavs"));
    }
    if let Some(target) = scenario.targets.iter().find(|point| !point.is_finite()) {
        return Err(PlannerError::invalid_input(format!(
            "target ({}, {}) is not finite",
            target.x, target.y
        )));
    }

    let mut ids = HashSet::new();
    for uav in &scenario.uavs {
        if !ids.insert(uav.id) {
            return Err(PlannerError::invalid_input(format!("duplicate uav id {}", uav.id)));
        }
        validate_uav(uav)?;
    }

    let infeasible: Vec<InfeasibleUav> = scenario.uavs.iter().filter_map(check_reach).collect();
    if !infeasible.is_empty() {
        for report in &infeasible {
            tracing::warn!(
                "UAV {} cannot complete its mission ({} blocking point(s))",
                report.uav_id,
                report.points.len()
            );
        }
        return Err(PlannerError::InfeasibleScenario(infeasible));
    }
    Ok(())
}

fn validate_uav(uav: &Uav) -> Result<(), PlannerError> {
    if !(uav.max_range.is_finite() && uav.max_range > 0.0) {
        return Err(PlannerError::invalid_input(format!(
            "uav {} max range must be positive",
            uav.id
        )));
    }
    if !(uav.recognition_radius.is_finite() && uav.recognition_radius > 0.0) {
        return Err(PlannerError::invalid_input(format!(
            "uav {} recognition radius must be positive",
            uav.id
        )));
    }
    let all_finite = uav.start.is_finite()
        && uav.end.is_finite()
        && uav.service_points.iter().all(|point| point.is_finite());
    if !all_finite {
        return Err(PlannerError::invalid_input(format!(
            "uav {} has non-finite coordinates",
            uav.id
        )));
    }
    Ok(())
}

/// Points of the UAV's own network (start, services, end) with no neighbour
/// within range, or its start and end when the end is out of reach anyway.
fn check_reach(uav: &Uav) -> Option<InfeasibleUav> {
    let mut network = uav.service_points.clone();
    network.push(uav.start);
    network.push(uav.end);

    let isolated: Vec<_> = network
        .iter()
        .enumerate()
        .filter(|(index, point)| {
            !network
                .iter()
                .enumerate()
                .any(|(other, near)| other != *index && distance(point, near) <= uav.max_range)
        })
        .map(|(_, point)| *point)
        .collect();

    let reachable = feasible_reach(
        &uav.start,
        uav.max_range,
        &uav.service_points,
        &uav.end,
        uav.max_range,
    );
    if isolated.is_empty() && reachable {
        return None;
    }

    let points = if isolated.is_empty() {
        vec![uav.start, uav.end]
    } else {
        isolated
    };
    Some(InfeasibleUav {
        uav_id: uav.id,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn uav(id: u32, end_x: f64, services: Vec<Point>) -> Uav {
        Uav::new(id, Point::start(0.0, 0.0), Point::finish(end_x, 0.0), services, 10.0, 1.0)
    }

    #[test]
    fn test_valid_scenario_passes() {
        let scenario = Scenario::new(
            vec![Point::target(3.0, 3.0)],
            vec![uav(1, 18.0, vec![Point::service(9.0, 0.0)])],
        );
        assert!(validate_scenario(&scenario, &AntColonyParams::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_params() {
        let scenario = Scenario::new(Vec::new(), vec![uav(1, 5.0, Vec::new())]);
        let bad = [
            AntColonyParams { iterations: 0, ..AntColonyParams::default() },
            AntColonyParams { evaporation: 1.5, ..AntColonyParams::default() },
            AntColonyParams { beta: -1.0, ..AntColonyParams::default() },
        ];
        for params in bad {
            assert!(matches!(
                validate_scenario(&scenario, &params),
                Err(PlannerError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_rejects_malformed_scenario() {
        let params = AntColonyParams::default();
        let empty = Scenario::new(vec![Point::target(1.0, 1.0)], Vec::new());
        assert!(matches!(validate_scenario(&empty, &params), Err(PlannerError::InvalidInput(_))));

        let dup = Scenario::new(Vec::new(), vec![uav(1, 5.0, Vec::new()), uav(1, 6.0, Vec::new())]);
        assert!(matches!(validate_scenario(&dup, &params), Err(PlannerError::InvalidInput(_))));

        let nan = Scenario::new(vec![Point::target(f64::NAN, 0.0)], vec![uav(1, 5.0, Vec::new())]);
        assert!(matches!(validate_scenario(&nan, &params), Err(PlannerError::InvalidInput(_))));
    }

    #[test]
    fn test_reports_unreachable_end() {
        let scenario = Scenario::new(
            Vec::new(),
            vec![uav(1, 5.0, Vec::new()), uav(2, 25.0, Vec::new())],
        );
        match validate_scenario(&scenario, &AntColonyParams::default()) {
            Err(PlannerError::InfeasibleScenario(reports)) => {
                assert_eq!(reports.len(), 1);
                assert_eq!(reports[0].uav_id, 2);
                assert_eq!(reports[0].points.len(), 2);
            }
            other => panic!("expected infeasible scenario, got {other:?}"),
        }
    }

    #[test]
    fn test_reports_isolated_service_point() {
        let scenario = Scenario::new(
            Vec::new(),
            vec![uav(1, 5.0, vec![Point::service(100.0, 100.0)])],
        );
        match validate_scenario(&scenario, &AntColonyParams::default()) {
            Err(PlannerError::InfeasibleScenario(reports)) => {
                assert_eq!(reports[0].points, vec![Point::service(100.0, 100.0)]);
            }
            other => panic!("expected infeasible scenario, got {other:?}"),
        }
    }
}
