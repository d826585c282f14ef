//! Ant-colony construction of coverage routes for a UAV fleet.
//!
//! Every iteration builds one route per UAV. UAVs take turns in a shuffled
//! round-robin order; on its turn a UAV either flies towards a pair of targets
//! picked by pheromone-weighted roulette, refuels at a service point, or heads
//! for its end. Complete iterations deposit pheromone proportional to their
//! coverage, and the best one (most targets, then shortest) is kept.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::classic::{build_classic_path, sighting_waypoint};
use crate::enhance::enhance_finish;
use crate::error::PlannerError;
use crate::geometry::{distance, visible_along};
use crate::models::{
    Point, PointKey, Route, RoutePlan, RouteSegment, RouteSegmentPoint, Scenario, Uav,
};
use crate::pheromone::PheromoneMatrix;
use crate::reachability::{feasible_reach, shortest_feasible_path, FeasiblePath};
use crate::segment::select_segment;
use crate::smoothed::smoothed_length;
use crate::validation::validate_scenario;

/// Lengths below this are treated as this when computing visibility.
const MIN_SEGMENT_LENGTH: f64 = 1e-6;
const IMPROVEMENT_EPS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntColonyParams {
    pub iterations: usize,
    /// Pheromone exponent
    pub alpha: f64,
    /// Visibility exponent
    pub beta: f64,
    /// Share of pheromone lost per iteration, in `[0, 1]`
    pub evaporation: f64,
    pub initial_pheromone: f64,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for AntColonyParams {
    fn default() -> Self {
        Self {
            iterations: 200,
            alpha: 0.87,
            beta: 2.08,
            evaporation: 0.36,
            initial_pheromone: 0.0001,
            seed: None,
        }
    }
}

/// Validate `scenario` and plan routes for it.
pub fn build_routes(
    scenario: &Scenario,
    params: &AntColonyParams,
) -> Result<RoutePlan, PlannerError> {
    let scenario = scenario.normalized();
    validate_scenario(&scenario, params)?;
    AntColonyPlanner::new(params.clone()).plan(&scenario)
}

pub struct AntColonyPlanner {
    params: AntColonyParams,
    rng: StdRng,
}

impl AntColonyPlanner {
    pub fn new(params: AntColonyParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { params, rng }
    }

    /// Run every iteration on an already validated, normalised scenario.
    pub fn plan(&mut self, scenario: &Scenario) -> Result<RoutePlan, PlannerError> {
        let targets = TargetSet::new(&scenario.targets);
        let mut matrix = PheromoneMatrix::new(targets.points(), self.params.initial_pheromone);
        let mut best: Option<Solution> = None;
        let mut completed = 0;
        let mut discarded = 0;

        for iteration in 0..self.params.iterations {
            let outcome =
                Iteration::new(scenario, &targets, &matrix, &self.params, &mut self.rng).run();
            matrix.evaporate(self.params.evaporation);

            match outcome {
                Ok(solution) => {
                    completed += 1;
                    solution.deposit(&mut matrix, &targets);
                    if solution.improves_on(best.as_ref()) {
                        tracing::debug!(
                            "Iteration {} improved best to {}/{} targets over {:.2}",
                            iteration,
                            solution.covered,
                            targets.len(),
                            solution.distance
                        );
                        best = Some(solution);
                    }
                }
                Err(err @ PlannerError::ConstructionDeadlock { .. }) => {
                    discarded += 1;
                    tracing::warn!("Iteration {} discarded: {}", iteration, err);
                }
                Err(err) => return Err(err),
            }
        }

        let best = best.ok_or(PlannerError::NoSolution { discarded })?;
        tracing::info!(
            "Planned {} route(s): {}/{} targets covered, distance {:.2} ({} iterations, {} discarded)",
            best.routes.len(),
            best.covered,
            targets.len(),
            best.distance,
            completed,
            discarded
        );
        Ok(best.into_plan(&targets, completed, discarded))
    }
}

/// Deduplicated targets with index lookup by identity.
struct TargetSet {
    points: Vec<Point>,
    index: HashMap<PointKey, usize>,
}

impl TargetSet {
    fn new(raw: &[Point]) -> Self {
        let mut points = Vec::with_capacity(raw.len());
        let mut index = HashMap::with_capacity(raw.len());
        for point in raw {
            if index.contains_key(&point.key()) {
                tracing::warn!("Ignoring duplicate target ({}, {})", point.x, point.y);
                continue;
            }
            index.insert(point.key(), points.len());
            points.push(*point);
        }
        Self { points, index }
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn index_of(&self, point: &Point) -> Option<usize> {
        self.index.get(&point.key()).copied()
    }
}

/// Round-robin over the UAVs of one iteration, skipping finished ones.
struct UavRing {
    order: Vec<usize>,
    finished: Vec<bool>,
    cursor: usize,
}

impl UavRing {
    fn new(order: Vec<usize>) -> Self {
        let finished = vec![false; order.len()];
        Self {
            order,
            finished,
            cursor: 0,
        }
    }

    fn current(&self) -> Option<usize> {
        let uav = *self.order.get(self.cursor)?;
        (!self.finished[uav]).then_some(uav)
    }

    fn finish(&mut self, uav: usize) {
        self.finished[uav] = true;
    }

    fn advance(&mut self) {
        let len = self.order.len();
        for step in 1..=len {
            let candidate = (self.cursor + step) % len;
            if !self.finished[self.order[candidate]] {
                self.cursor = candidate;
                return;
            }
        }
    }
}

struct UavState<'a> {
    uav: &'a Uav,
    route: Route,
    remaining: f64,
    position: RouteSegmentPoint,
    /// Target this UAV has committed to observe next
    pending: Option<usize>,
    /// Service points still unused in this iteration
    services: Vec<Point>,
}

impl<'a> UavState<'a> {
    fn new(uav: &'a Uav) -> Self {
        Self {
            uav,
            route: Route::new(uav.id),
            remaining: uav.max_range,
            position: RouteSegmentPoint::fixed(uav.start),
            pending: None,
            services: uav.service_points.clone(),
        }
    }

    fn origin(&self) -> Point {
        self.position.display
    }

    fn radius(&self) -> f64 {
        self.uav.recognition_radius
    }

    fn has_arrived(&self) -> bool {
        self.route.touches(&self.uav.end)
    }

    fn deadlock(&self) -> PlannerError {
        PlannerError::deadlock(self.uav.id, &self.position.display)
    }

    fn can_reach_end_from(&self, point: &Point, remaining: f64) -> bool {
        feasible_reach(
            point,
            remaining,
            &self.services,
            &self.uav.end,
            self.uav.max_range,
        )
    }

    fn use_services(&mut self, path: &FeasiblePath) {
        let used: Vec<Point> = path.services().copied().collect();
        self.services.retain(|service| !used.contains(service));
    }

    fn push(&mut self, segment: RouteSegment) {
        self.remaining -= segment.length();
        if let Some(last) = segment.last() {
            self.position = last.clone();
        }
        self.route.push(segment);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PairCandidate {
    first: usize,
    second: usize,
    length: f64,
}

/// One construction pass over the whole fleet.
struct Iteration<'a> {
    params: &'a AntColonyParams,
    targets: &'a TargetSet,
    matrix: &'a PheromoneMatrix,
    rng: &'a mut StdRng,
    available: Vec<bool>,
    states: Vec<UavState<'a>>,
}

impl<'a> Iteration<'a> {
    fn new(
        scenario: &'a Scenario,
        targets: &'a TargetSet,
        matrix: &'a PheromoneMatrix,
        params: &'a AntColonyParams,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            params,
            targets,
            matrix,
            rng,
            available: vec![true; targets.len()],
            states: scenario.uavs.iter().map(UavState::new).collect(),
        }
    }

    fn run(mut self) -> Result<Solution, PlannerError> {
        let mut order: Vec<usize> = (0..self.states.len()).collect();
        order.shuffle(&mut *self.rng);
        let mut ring = UavRing::new(order);

        while let Some(current) = ring.current() {
            self.step(current)?;
            if self.states[current].has_arrived() {
                ring.finish(current);
            }
            ring.advance();
        }

        self.enhance_routes();
        Ok(self.into_solution())
    }

    fn step(&mut self, current: usize) -> Result<(), PlannerError> {
        if let Some(pending) = self.states[current].pending {
            if !self.available[pending] {
                self.states[current].pending = None;
            }
        }

        match self.available.iter().filter(|open| **open).count() {
            0 => self.finish_direct(current),
            1 => self.finish_last(current),
            _ => self.advance(current),
        }
    }

    /// Targets pending for some other unfinished UAV.
    fn reserved_by_others(&self, current: usize) -> Vec<bool> {
        let mut reserved = vec![false; self.targets.len()];
        for (index, state) in self.states.iter().enumerate() {
            if index == current || state.has_arrived() {
                continue;
            }
            if let Some(pending) = state.pending {
                reserved[pending] = true;
            }
        }
        reserved
    }

    fn open_targets(&self, reserved: &[bool]) -> Vec<Point> {
        self.targets
            .points()
            .iter()
            .enumerate()
            .filter(|(index, _)| self.available[*index] && !reserved[*index])
            .map(|(_, point)| *point)
            .collect()
    }

    fn consume(&mut self, observed: &[usize]) {
        for index in observed {
            self.available[*index] = false;
        }
    }

    fn observed_in(&self, segment: &RouteSegment) -> Vec<usize> {
        segment
            .targets()
            .filter_map(|point| self.targets.index_of(point))
            .collect()
    }

    fn advance(&mut self, current: usize) -> Result<(), PlannerError> {
        let reserved = self.reserved_by_others(current);
        let candidates = self.pair_candidates(current, &reserved);

        if candidates.is_empty() {
            if self.visit_service(current, &reserved) {
                return Ok(());
            }
            return match self.states[current].pending {
                Some(pending) => self.finish_through(current, pending),
                None => self.finish_direct(current),
            };
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|pair| {
                let trail = self.matrix.pheromone(pair.first, pair.second);
                let visibility = 1.0 / pair.length.max(MIN_SEGMENT_LENGTH);
                trail.powf(self.params.alpha) * visibility.powf(self.params.beta)
            })
            .collect();
        let choice = roulette(&weights, &mut *self.rng);
        self.fly_pair(current, candidates[choice], &reserved);
        Ok(())
    }

    /// Feasible target pairs for the current UAV, each in its shorter
    /// orientation. A UAV with a pending target only considers pairs starting
    /// there.
    fn pair_candidates(&self, current: usize, reserved: &[bool]) -> Vec<PairCandidate> {
        let state = &self.states[current];
        let origin = state.origin();
        let radius = state.radius();
        let points = self.targets.points();
        let open: Vec<usize> = (0..self.targets.len())
            .filter(|&index| self.available[index] && !reserved[index])
            .collect();

        let mut candidates = Vec::new();
        for (k, &i) in open.iter().enumerate() {
            for &j in &open[k + 1..] {
                let orientations = match state.pending {
                    Some(pending) if pending == i => [Some((i, j)), None],
                    Some(pending) if pending == j => [Some((j, i)), None],
                    Some(_) => continue,
                    None => [Some((i, j)), Some((j, i))],
                };
                if self.matrix.distance(i, j) - radius > state.remaining {
                    continue;
                }

                let best = orientations
                    .into_iter()
                    .flatten()
                    .filter_map(|(first, second)| {
                        let length = smoothed_length(&origin, &points[first], &points[second], radius);
                        let feasible = length <= state.remaining
                            && state.can_reach_end_from(&points[second], state.remaining - length);
                        feasible.then_some(PairCandidate {
                            first,
                            second,
                            length,
                        })
                    })
                    .min_by(|left, right| left.length.total_cmp(&right.length));
                candidates.extend(best);
            }
        }
        candidates
    }

    fn fly_pair(&mut self, current: usize, pair: PairCandidate, reserved: &[bool]) {
        let pool = self.open_targets(reserved);
        let first = self.targets.points()[pair.first];
        let second = self.targets.points()[pair.second];

        let state = &self.states[current];
        let mut segment = select_segment(&state.origin(), &first, &second, state.radius(), &pool)
            .with_origin(state.position.clone());

        let pending = if segment.is_smoothed() {
            // Stop at the observation point; the second target stays pending
            if let Some(apex) = segment.points.iter().position(|point| point.map == first) {
                segment.points.truncate(apex + 1);
            }
            Some(pair.second)
        } else {
            None
        };

        let observed = self.observed_in(&segment);
        let state = &mut self.states[current];
        state.pending = pending;
        state.push(segment);
        self.consume(&observed);
    }

    /// Refuel at a random reachable service point, sweeping targets on the way.
    fn visit_service(&mut self, current: usize, reserved: &[bool]) -> bool {
        let pool = self.open_targets(reserved);
        let state = &self.states[current];
        let origin = state.origin();
        let max_range = state.uav.max_range;

        let options: Vec<usize> = (0..state.services.len())
            .filter(|&k| {
                let service = &state.services[k];
                if distance(&origin, service) > state.remaining {
                    return false;
                }
                let rest: Vec<Point> = state
                    .services
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != k)
                    .map(|(_, point)| *point)
                    .collect();
                feasible_reach(service, max_range, &rest, &state.uav.end, max_range)
            })
            .collect();
        if options.is_empty() {
            return false;
        }
        let pick = options[self.rng.random_range(0..options.len())];

        let state = &mut self.states[current];
        let service = state.services.remove(pick);
        let seen = visible_along(&pool, &origin, &service, state.uav.recognition_radius, &[]);

        let mut points = Vec::with_capacity(seen.len() + 2);
        points.push(state.position.clone());
        points.extend(seen.iter().map(sighting_waypoint));
        points.push(RouteSegmentPoint::fixed(service));

        let observed: Vec<usize> = seen
            .iter()
            .filter_map(|sighting| self.targets.index_of(&sighting.point))
            .collect();
        if state.pending.is_some_and(|pending| observed.contains(&pending)) {
            state.pending = None;
        }
        state.push(RouteSegment::classic(points));
        state.remaining = max_range;
        tracing::trace!("UAV {} refuels at ({}, {})", state.uav.id, service.x, service.y);
        self.consume(&observed);
        true
    }

    /// Exactly one target is left somewhere on the map.
    fn finish_last(&mut self, current: usize) -> Result<(), PlannerError> {
        let reserved = self.reserved_by_others(current);
        let Some(last) = self.available.iter().position(|open| *open) else {
            return self.finish_direct(current);
        };

        let state = &self.states[current];
        if state.pending == Some(last) {
            return self.finish_through(current, last);
        }
        if reserved[last] {
            return self.finish_direct(current);
        }

        let target = self.targets.points()[last];
        let hop = distance(&state.origin(), &target);
        if hop <= state.remaining && state.can_reach_end_from(&target, state.remaining - hop) {
            self.finish_through(current, last)
        } else {
            self.finish_direct(current)
        }
    }

    /// Observe `target`, then take the shortest admissible path to the end.
    fn finish_through(&mut self, current: usize, target: usize) -> Result<(), PlannerError> {
        let reserved = self.reserved_by_others(current);
        let pool = self.open_targets(&reserved);
        let point = self.targets.points()[target];

        let state = &self.states[current];
        let path = shortest_feasible_path(&point, &state.services, &state.uav.end, state.uav.max_range)
            .ok_or_else(|| state.deadlock())?;
        let next = path.points.get(1).copied().unwrap_or(state.uav.end);
        let lead = select_segment(&state.origin(), &point, &next, state.radius(), &pool)
            .with_origin(state.position.clone());
        let observed = self.observed_in(&lead);

        let state = &mut self.states[current];
        state.use_services(&path);
        state.pending = None;
        state.push(lead);
        if path.points.len() > 2 {
            let tail = build_classic_path(&path.points[1..]).with_origin(state.position.clone());
            state.push(tail);
        }
        self.consume(&observed);
        Ok(())
    }

    fn finish_direct(&mut self, current: usize) -> Result<(), PlannerError> {
        let state = &mut self.states[current];
        let path = shortest_feasible_path(
            &state.origin(),
            &state.services,
            &state.uav.end,
            state.uav.max_range,
        )
        .ok_or_else(|| state.deadlock())?;

        state.use_services(&path);
        state.pending = None;
        let segment = path.into_segment().with_origin(state.position.clone());
        state.push(segment);
        Ok(())
    }

    fn enhance_routes(&mut self) {
        let no_reservations = vec![false; self.targets.len()];
        for index in 0..self.states.len() {
            let pool = self.open_targets(&no_reservations);
            let state = &mut self.states[index];
            if !enhance_finish(&mut state.route, state.uav, &pool) {
                continue;
            }
            let observed: Vec<usize> = state
                .route
                .observed_targets()
                .iter()
                .filter_map(|point| self.targets.index_of(point))
                .collect();
            self.consume(&observed);
        }
    }

    fn into_solution(self) -> Solution {
        let mut covered = vec![false; self.targets.len()];
        for state in &self.states {
            for point in state.route.observed_targets() {
                if let Some(index) = self.targets.index_of(&point) {
                    covered[index] = true;
                }
            }
        }
        Solution::new(self.states.into_iter().map(|state| state.route).collect(), covered)
    }
}

/// Pick an index with probability proportional to its weight.
///
/// Falls back to a uniform pick when the weights carry no information.
fn roulette<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return rng.random_range(0..weights.len());
    }

    let threshold = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if threshold <= cumulative {
            return index;
        }
    }
    weights.len() - 1
}

#[derive(Debug, Clone)]
struct Solution {
    routes: Vec<Route>,
    covered_mask: Vec<bool>,
    covered: usize,
    distance: f64,
}

impl Solution {
    fn new(routes: Vec<Route>, covered_mask: Vec<bool>) -> Self {
        let covered = covered_mask.iter().filter(|seen| **seen).count();
        let distance = routes.iter().map(Route::distance).sum();
        Self {
            routes,
            covered_mask,
            covered,
            distance,
        }
    }

    /// More targets wins; equal coverage needs a strictly shorter total.
    fn improves_on(&self, best: Option<&Solution>) -> bool {
        match best {
            None => true,
            Some(best) => {
                self.covered > best.covered
                    || (self.covered == best.covered
                        && self.distance < best.distance - IMPROVEMENT_EPS)
            }
        }
    }

    /// Reinforce every edge between consecutive targets of every route by
    /// that route's own share of the map.
    fn deposit(&self, matrix: &mut PheromoneMatrix, targets: &TargetSet) {
        if targets.len() == 0 {
            return;
        }
        for route in &self.routes {
            let observed = route
                .observed_targets()
                .iter()
                .filter(|point| targets.index_of(point).is_some())
                .count();
            let amount = observed as f64 / targets.len() as f64;
            let mut previous: Option<usize> = None;
            for waypoint in route.waypoints() {
                let Some(index) = targets.index_of(&waypoint.map) else {
                    continue;
                };
                if let Some(prev) = previous {
                    if prev != index {
                        matrix.deposit(prev, index, amount);
                    }
                }
                previous = Some(index);
            }
        }
    }

    fn into_plan(self, targets: &TargetSet, completed: usize, discarded: usize) -> RoutePlan {
        let uncovered = targets
            .points()
            .iter()
            .zip(&self.covered_mask)
            .filter(|(_, seen)| !**seen)
            .map(|(point, _)| *point)
            .collect();
        RoutePlan {
            routes: self.routes,
            covered_targets: self.covered,
            total_targets: targets.len(),
            total_distance: self.distance,
            uncovered,
            iterations_completed: completed,
            iterations_discarded: discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SegmentKind;

    fn seeded(iterations: usize, seed: u64) -> AntColonyParams {
        AntColonyParams {
            iterations,
            seed: Some(seed),
            ..AntColonyParams::default()
        }
    }

    fn line_route(uav_id: u32, maps: &[Point]) -> Route {
        let mut route = Route::new(uav_id);
        route.push(RouteSegment::classic(
            maps.iter().copied().map(RouteSegmentPoint::fixed).collect(),
        ));
        route
    }

    #[test]
    fn test_roulette_follows_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = [0.0, 1.0, 0.0];
        for _ in 0..50 {
            assert_eq!(roulette(&weights, &mut rng), 1);
        }

        let weights = [1.0, 3.0];
        let picks = (0..4000)
            .filter(|_| roulette(&weights, &mut rng) == 1)
            .count();
        assert!((2700..3300).contains(&picks), "picked heavy side {picks} times");
    }

    #[test]
    fn test_roulette_without_weight_is_uniform_choice() {
        let mut rng = StdRng::seed_from_u64(3);
        let weights = [0.0, 0.0, 0.0];
        assert!(roulette(&weights, &mut rng) < 3);
    }

    #[test]
    fn test_ring_skips_finished() {
        let mut ring = UavRing::new(vec![2, 0, 1]);
        assert_eq!(ring.current(), Some(2));
        ring.advance();
        assert_eq!(ring.current(), Some(0));
        ring.finish(0);
        ring.advance();
        assert_eq!(ring.current(), Some(1));
        ring.advance();
        assert_eq!(ring.current(), Some(2));
        ring.finish(2);
        ring.advance();
        assert_eq!(ring.current(), Some(1));
        ring.finish(1);
        ring.advance();
        assert_eq!(ring.current(), None);
    }

    #[test]
    fn test_best_rule_prefers_coverage_then_distance() {
        let short = Solution::new(
            vec![line_route(1, &[Point::start(0.0, 0.0), Point::finish(1.0, 0.0)])],
            vec![true, false],
        );
        let long_full = Solution::new(
            vec![line_route(1, &[Point::start(0.0, 0.0), Point::finish(9.0, 0.0)])],
            vec![true, true],
        );
        let shorter = Solution::new(
            vec![line_route(1, &[Point::start(0.0, 0.0), Point::finish(0.5, 0.0)])],
            vec![false, true],
        );

        assert!(short.improves_on(None));
        assert!(long_full.improves_on(Some(&short)));
        assert!(!short.improves_on(Some(&long_full)));
        assert!(shorter.improves_on(Some(&short)));
        assert!(!short.clone().improves_on(Some(&short)));
    }

    #[test]
    fn test_deposit_ignores_route_order() {
        let targets = TargetSet::new(&[
            Point::target(0.0, 0.0),
            Point::target(5.0, 0.0),
            Point::target(5.0, 5.0),
            Point::target(0.0, 5.0),
        ]);
        let first = line_route(
            1,
            &[Point::start(-1.0, 0.0), targets.points[0], targets.points[1], Point::finish(6.0, 0.0)],
        );
        let second = line_route(
            2,
            &[Point::start(6.0, 6.0), targets.points[2], targets.points[3], Point::finish(-1.0, 6.0)],
        );

        let forward = Solution::new(vec![first.clone(), second.clone()], vec![true; 4]);
        let backward = Solution::new(vec![second, first], vec![true; 4]);

        let mut a = PheromoneMatrix::new(targets.points(), 0.5);
        let mut b = PheromoneMatrix::new(targets.points(), 0.5);
        forward.deposit(&mut a, &targets);
        backward.deposit(&mut b, &targets);

        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(a.pheromone(i, j), b.pheromone(i, j));
            }
        }
        assert_eq!(a.pheromone(0, 1), 1.0);
        assert_eq!(a.pheromone(2, 3), 1.0);
        assert_eq!(a.pheromone(1, 2), 0.5);
    }

    #[test]
    fn test_deposit_scales_with_each_route_coverage() {
        let targets = TargetSet::new(&[
            Point::target(0.0, 0.0),
            Point::target(4.0, 0.0),
            Point::target(8.0, 0.0),
            Point::target(8.0, 8.0),
        ]);
        let wide = line_route(
            1,
            &[
                Point::start(-1.0, 0.0),
                targets.points[0],
                targets.points[1],
                targets.points[2],
                Point::finish(9.0, 0.0),
            ],
        );
        let narrow = line_route(2, &[Point::start(7.0, 9.0), targets.points[3], Point::finish(9.0, 9.0)]);
        let solution = Solution::new(vec![wide, narrow], vec![true; 4]);

        let mut matrix = PheromoneMatrix::new(targets.points(), 0.5);
        solution.deposit(&mut matrix, &targets);

        assert_eq!(matrix.pheromone(0, 1), 1.25);
        assert_eq!(matrix.pheromone(1, 2), 1.25);
        // The single-target route has no edge to reinforce
        assert_eq!(matrix.pheromone(2, 3), 0.5);
        assert_eq!(matrix.pheromone(0, 3), 0.5);
    }

    #[test]
    fn test_duplicate_targets_are_ignored() {
        let targets = TargetSet::new(&[
            Point::target(1.0, 1.0),
            Point::target(1.0, 1.0),
            Point::target(2.0, 2.0),
        ]);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets.index_of(&Point::target(2.0, 2.0)), Some(1));
        assert_eq!(targets.index_of(&Point::service(2.0, 2.0)), None);
    }

    #[test]
    fn test_collinear_targets_use_classic_route() {
        let scenario = Scenario::new(
            vec![Point::target(0.0, 0.0), Point::target(10.0, 0.0)],
            vec![Uav::new(
                1,
                Point::start(-5.0, 0.0),
                Point::finish(15.0, 0.0),
                Vec::new(),
                1000.0,
                100.0,
            )],
        );

        let plan = build_routes(&scenario, &seeded(5, 11)).expect("plan");
        assert_eq!(plan.covered_targets, 2);
        assert!(plan.uncovered.is_empty());
        let route = plan.route_for(1).expect("route");
        assert_eq!(route.segments.len(), 1);
        assert_eq!(route.segments[0].kind, SegmentKind::Classic);
        assert_eq!(route.segments[0].points.len(), 4);
        assert!((plan.total_distance - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_iteration_deadlocks_without_a_way_home() {
        // Skips validation: the end lies beyond range and there is nowhere to refuel
        let scenario = Scenario::new(
            vec![Point::target(5.0, 0.0)],
            vec![Uav::new(1, Point::start(0.0, 0.0), Point::finish(50.0, 0.0), Vec::new(), 10.0, 1.0)],
        );

        let result = AntColonyPlanner::new(seeded(4, 2)).plan(&scenario);
        match result {
            Err(PlannerError::NoSolution { discarded }) => assert_eq!(discarded, 4),
            other => panic!("expected no solution, got {other:?}"),
        }
    }

    #[test]
    fn test_service_inventory_resets_each_iteration() {
        let service = Point::service(150.0, 0.0);
        let uav = Uav::new(
            1,
            Point::start(0.0, 0.0),
            Point::finish(300.0, 0.0),
            vec![service],
            160.0,
            2.0,
        );

        let mut state = UavState::new(&uav);
        let path = shortest_feasible_path(&uav.start, &state.services, &uav.end, uav.max_range)
            .expect("path through the service point");
        state.use_services(&path);
        assert!(state.services.is_empty());
        assert_eq!(UavState::new(&uav).services, vec![service]);

        let scenario = Scenario::new(Vec::new(), vec![uav]);
        let plan = build_routes(&scenario, &seeded(6, 9)).expect("plan");
        assert_eq!(plan.iterations_completed, 6);
        assert_eq!(plan.iterations_discarded, 0);
        assert!(plan.routes[0].touches(&service));
    }

    #[test]
    fn test_same_seed_same_plan() {
        let scenario = Scenario::new(
            vec![
                Point::target(10.0, 40.0),
                Point::target(60.0, 15.0),
                Point::target(35.0, 70.0),
                Point::target(80.0, 80.0),
                Point::target(20.0, 5.0),
            ],
            vec![
                Uav::new(1, Point::start(0.0, 0.0), Point::finish(100.0, 0.0), Vec::new(), 500.0, 3.0),
                Uav::new(2, Point::start(0.0, 100.0), Point::finish(100.0, 100.0), Vec::new(), 500.0, 3.0),
            ],
        );

        let first = build_routes(&scenario, &seeded(30, 42)).expect("first");
        let second = build_routes(&scenario, &seeded(30, 42)).expect("second");
        assert_eq!(first.routes, second.routes);
        assert_eq!(first.total_distance, second.total_distance);
    }
}
