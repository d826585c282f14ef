//! Smoothed segments: two straight legs bent around a target's sensor circle.

use std::f64::consts::TAU;
use std::ops::{Add, Mul, Neg, Sub};

use crate::classic::sighting_waypoint;
use crate::geometry::{distance, visible_along, Sighting};
use crate::models::{Point, RouteSegment, RouteSegmentPoint};

const UNIT_EPS: f64 = 1e-12;
const TIE_EPS: f64 = 1e-9;
const DUPLICATE_DOT: f64 = 0.999;
const COARSE_SAMPLES: usize = 48;
const GOLDEN_STEPS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vec2 {
    x: f64,
    y: f64,
}

impl Vec2 {
    const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    fn between(from: &Point, to: &Point) -> Self {
        Vec2 {
            x: to.x - from.x,
            y: to.y - from.y,
        }
    }

    fn from_angle(theta: f64) -> Self {
        Vec2 {
            x: theta.cos(),
            y: theta.sin(),
        }
    }

    fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn perp(self) -> Self {
        Vec2 {
            x: -self.y,
            y: self.x,
        }
    }

    fn unit(self) -> Option<Self> {
        let len = self.x.hypot(self.y);
        (len > UNIT_EPS).then(|| self * (1.0 / len))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        self + (-rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

fn on_circle(center: &Point, radius: f64, direction: Vec2) -> (f64, f64) {
    (center.x + radius * direction.x, center.y + radius * direction.y)
}

fn path_via(a: &Point, c: &Point, (x, y): (f64, f64)) -> f64 {
    (a.x - x).hypot(a.y - y) + (c.x - x).hypot(c.y - y)
}

/// Point on the circle of `radius` around `mid` to fly through when going
/// from `a` to `c`, chosen to keep `a -> point -> c` short.
///
/// A fixed set of candidate directions is scored first (shortest path, ties
/// broken by the smallest turn away from the legs), then a scan of the whole
/// circle may replace the winner when it finds a strictly shorter path.
pub fn smoothing_point(a: &Point, mid: &Point, c: &Point, radius: f64) -> (f64, f64) {
    let u1 = Vec2::between(mid, a).unit();
    let u2 = Vec2::between(mid, c).unit();
    if u1.is_none() && u2.is_none() {
        return (mid.x + radius, mid.y);
    }

    let v1 = u1.unwrap_or(Vec2::ZERO);
    let v2 = u2.unwrap_or(Vec2::ZERO);
    let raw = [
        v1 + v2,
        v1 - v2,
        v1.perp(),
        -v1.perp(),
        v2.perp(),
        -v2.perp(),
        v1 + v2.perp(),
        v2 + v1.perp(),
        v1,
        v2,
    ];
    let mut directions: Vec<Vec2> = Vec::with_capacity(raw.len());
    for dir in raw.iter().filter_map(|candidate| candidate.unit()) {
        if !directions.iter().any(|seen| seen.dot(dir) > DUPLICATE_DOT) {
            directions.push(dir);
        }
    }

    let legs: Vec<Vec2> = [u1, u2].into_iter().flatten().collect();
    let deviation = |dir: Vec2| -> f64 {
        legs.iter()
            .map(|leg| leg.dot(dir).clamp(-1.0, 1.0).acos())
            .sum()
    };

    let mut best = (f64::INFINITY, f64::INFINITY, (mid.x + radius, mid.y));
    for dir in directions {
        let point = on_circle(mid, radius, dir);
        let path = path_via(a, c, point);
        let angle = deviation(dir);
        let (best_path, best_angle, _) = best;
        if path < best_path - TIE_EPS || ((path - best_path).abs() <= TIE_EPS && angle < best_angle)
        {
            best = (path, angle, point);
        }
    }

    let (best_path, _, best_point) = best;
    let refined = refine_on_circle(a, mid, c, radius);
    if path_via(a, c, refined) < best_path - TIE_EPS {
        refined
    } else {
        best_point
    }
}

/// Coarse scan of the circle followed by a golden-section search around every
/// local minimum of the scan.
fn refine_on_circle(a: &Point, mid: &Point, c: &Point, radius: f64) -> (f64, f64) {
    let at = |theta: f64| on_circle(mid, radius, Vec2::from_angle(theta));
    let cost = |theta: f64| path_via(a, c, at(theta));

    let step = TAU / COARSE_SAMPLES as f64;
    let samples: Vec<f64> = (0..COARSE_SAMPLES).map(|k| cost(k as f64 * step)).collect();

    let mut best_theta = 0.0;
    let mut best_cost = f64::INFINITY;
    for k in 0..COARSE_SAMPLES {
        let prev = samples[(k + COARSE_SAMPLES - 1) % COARSE_SAMPLES];
        let next = samples[(k + 1) % COARSE_SAMPLES];
        if samples[k] > prev || samples[k] > next {
            continue;
        }
        let center = k as f64 * step;
        let theta = golden_section(&cost, center - step, center + step);
        let value = cost(theta);
        if value < best_cost {
            best_cost = value;
            best_theta = theta;
        }
    }
    at(best_theta)
}

fn golden_section(cost: &impl Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> f64 {
    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let mut x1 = hi - inv_phi * (hi - lo);
    let mut x2 = lo + inv_phi * (hi - lo);
    let mut f1 = cost(x1);
    let mut f2 = cost(x2);
    for _ in 0..GOLDEN_STEPS {
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - inv_phi * (hi - lo);
            f1 = cost(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + inv_phi * (hi - lo);
            f2 = cost(x2);
        }
    }
    (lo + hi) / 2.0
}

/// Cheap estimate of a smoothed segment's length, flying through the point
/// of the circle on the bisector of the two legs.
///
/// Used to score pair candidates; degenerate geometry falls back to going
/// over `mid` itself.
pub fn smoothed_length(a: &Point, mid: &Point, c: &Point, radius: f64) -> f64 {
    let fallback = distance(a, mid) + distance(mid, c);
    let (Some(v1), Some(v2)) = (Vec2::between(mid, a).unit(), Vec2::between(mid, c).unit()) else {
        return fallback;
    };
    match (v1 + v2).unit() {
        Some(bisector) => path_via(a, c, on_circle(mid, radius, bisector)),
        None => fallback,
    }
}

/// `a -> smoothing point of mid -> c`.
pub fn build_smoothed(a: &Point, mid: &Point, c: &Point, radius: f64) -> RouteSegment {
    let (x, y) = smoothing_point(a, mid, c, radius);
    RouteSegment::smoothed(vec![
        RouteSegmentPoint::fixed(*a),
        RouteSegmentPoint::observed(*mid, x, y),
        RouteSegmentPoint::fixed(*c),
    ])
}

/// Smoothed segment that also picks up candidates seen from either leg.
pub fn build_smoothed_enhanced(
    a: &Point,
    mid: &Point,
    c: &Point,
    radius: f64,
    candidates: &[Point],
) -> RouteSegment {
    let (x, y) = smoothing_point(a, mid, c, radius);
    let apex = Point::new(x, y, mid.role);
    let exclude = [*a, *mid, *c];

    let inbound = visible_along(candidates, a, &apex, radius, &exclude);
    let outbound: Vec<Sighting> = visible_along(candidates, &apex, c, radius, &exclude)
        .into_iter()
        .filter(|sighting| !inbound.iter().any(|seen| seen.point == sighting.point))
        .collect();

    let mut points = Vec::with_capacity(inbound.len() + outbound.len() + 3);
    points.push(RouteSegmentPoint::fixed(*a));
    points.extend(inbound.iter().map(sighting_waypoint));
    points.push(RouteSegmentPoint::observed(*mid, x, y));
    points.extend(outbound.iter().map(sighting_waypoint));
    points.push(RouteSegmentPoint::fixed(*c));
    RouteSegment::smoothed(points)
}
