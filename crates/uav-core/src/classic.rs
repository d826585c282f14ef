//! Straight-line segment builders.

use crate::geometry::{project_onto_segment, visible_along, Sighting};
use crate::models::{Point, RouteSegment, RouteSegmentPoint};

/// Two-point straight hop.
pub fn build_classic(a: &Point, b: &Point) -> RouteSegment {
    RouteSegment::classic(vec![RouteSegmentPoint::fixed(*a), RouteSegmentPoint::fixed(*b)])
}

/// Straight polyline through every point, each flown over exactly.
pub fn build_classic_path(points: &[Point]) -> RouteSegment {
    RouteSegment::classic(points.iter().copied().map(RouteSegmentPoint::fixed).collect())
}

/// Straight hop from `a` to `c` observing `mid` from its projection.
pub fn build_classic_through(a: &Point, mid: &Point, c: &Point) -> RouteSegment {
    let projection = project_onto_segment(mid, a, c);
    RouteSegment::classic(vec![
        RouteSegmentPoint::fixed(*a),
        RouteSegmentPoint::observed(*mid, projection.x, projection.y),
        RouteSegmentPoint::fixed(*c),
    ])
}

/// Like [`build_classic_through`], but only when the straight line `a`-`c`
/// passes within `radius` of `mid`.
pub fn try_build_classic_through(
    a: &Point,
    mid: &Point,
    c: &Point,
    radius: f64,
) -> Option<RouteSegment> {
    (project_onto_segment(mid, a, c).offset <= radius).then(|| build_classic_through(a, mid, c))
}

/// Straight hop from `a` to `c` picking up every candidate it passes by.
///
/// Returns `None` when fewer than two candidates are observed on the way.
pub fn build_classic_enhanced(
    a: &Point,
    c: &Point,
    radius: f64,
    candidates: &[Point],
) -> Option<RouteSegment> {
    let seen = visible_along(candidates, a, c, radius, &[*a, *c]);
    if seen.len() < 2 {
        return None;
    }

    let mut points = Vec::with_capacity(seen.len() + 2);
    points.push(RouteSegmentPoint::fixed(*a));
    points.extend(seen.iter().map(sighting_waypoint));
    points.push(RouteSegmentPoint::fixed(*c));
    Some(RouteSegment::classic(points))
}

pub(crate) fn sighting_waypoint(sighting: &Sighting) -> RouteSegmentPoint {
    RouteSegmentPoint::observed(sighting.point, sighting.projection.x, sighting.projection.y)
}
