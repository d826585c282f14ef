//! Range feasibility over service points.
//!
//! A UAV flies at most its remaining range between refuels; reaching a service
//! point resets the range to the maximum.

use std::collections::VecDeque;

use crate::classic::build_classic_path;
use crate::geometry::distance;
use crate::models::{Point, RouteSegment};

/// Can a UAV at `start` with `remaining` range reach `end`, refuelling at
/// `services` along the way?
pub fn feasible_reach(
    start: &Point,
    remaining: f64,
    services: &[Point],
    end: &Point,
    max_range: f64,
) -> bool {
    if distance(start, end) <= remaining {
        return true;
    }

    let mut visited = vec![false; services.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for (index, service) in services.iter().enumerate() {
        if distance(start, service) <= remaining {
            visited[index] = true;
            queue.push_back(index);
        }
    }

    while let Some(current) = queue.pop_front() {
        let from = &services[current];
        if distance(from, end) <= max_range {
            return true;
        }
        for (index, service) in services.iter().enumerate() {
            if !visited[index] && distance(from, service) <= max_range {
                visited[index] = true;
                queue.push_back(index);
            }
        }
    }
    false
}

/// Shortest admissible path found by [`shortest_feasible_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeasiblePath {
    pub distance: f64,
    /// `start`, intermediate service points, `end`
    pub points: Vec<Point>,
}

impl FeasiblePath {
    /// Service points the path refuels at.
    pub fn services(&self) -> impl Iterator<Item = &Point> + '_ {
        let len = self.points.len();
        self.points
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != 0 && *index + 1 != len)
            .map(|(_, point)| point)
    }

    pub fn into_segment(self) -> RouteSegment {
        build_classic_path(&self.points)
    }
}

/// Dijkstra over `{start} ∪ services ∪ {end}` where a hop is admissible when
/// it is no longer than `max_range`.
///
/// Returns `None` when `end` is unreachable.
pub fn shortest_feasible_path(
    start: &Point,
    services: &[Point],
    end: &Point,
    max_range: f64,
) -> Option<FeasiblePath> {
    let mut nodes = Vec::with_capacity(services.len() + 2);
    nodes.push(*start);
    nodes.extend_from_slice(services);
    nodes.push(*end);
    let target = nodes.len() - 1;

    let mut dist = vec![f64::INFINITY; nodes.len()];
    let mut previous: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut done = vec![false; nodes.len()];
    dist[0] = 0.0;

    loop {
        let current = (0..nodes.len())
            .filter(|&index| !done[index] && dist[index].is_finite())
            .min_by(|&left, &right| dist[left].total_cmp(&dist[right]))?;
        if current == target {
            break;
        }
        done[current] = true;

        for next in 0..nodes.len() {
            if done[next] {
                continue;
            }
            let hop = distance(&nodes[current], &nodes[next]);
            if hop > max_range {
                continue;
            }
            let candidate = dist[current] + hop;
            if candidate < dist[next] {
                dist[next] = candidate;
                previous[next] = Some(current);
            }
        }
    }

    let mut points = vec![nodes[target]];
    let mut cursor = target;
    while let Some(prev) = previous[cursor] {
        points.push(nodes[prev]);
        cursor = prev;
    }
    points.reverse();

    Some(FeasiblePath {
        distance: dist[target],
        points,
    })
}
