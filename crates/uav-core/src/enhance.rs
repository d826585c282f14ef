//! Post-pass rework of the last approach to a UAV's end.

use crate::classic::sighting_waypoint;
use crate::geometry::visible_along;
use crate::models::{
    Point, PointRole, Route, RouteSegment, RouteSegmentPoint, SegmentKind, Uav,
};
use crate::smoothed::build_smoothed_enhanced;

const LENGTH_EPS: f64 = 1e-9;

/// Try to merge the last two segments of `route` into one segment that passes
/// the pivot target instead of flying over it.
///
/// Applies when the route ends with a straight, service-free run to the end
/// and the segment before it ends exactly on a target. A straight line to the
/// end is tried first, then a smoothed detour around the pivot. Either
/// replacement must keep every target the two segments observed (it may pick
/// up some of `available` as well) and must not be longer.
pub fn enhance_finish(route: &mut Route, uav: &Uav, available: &[Point]) -> bool {
    let count = route.segments.len();
    if count < 2 {
        return false;
    }
    let last = &route.segments[count - 1];
    let prev = &route.segments[count - 2];

    if last.kind != SegmentKind::Classic || last.contains_role(PointRole::Service) {
        return false;
    }
    let (Some(origin), Some(pivot)) = (prev.first(), prev.last()) else {
        return false;
    };
    if pivot.role() != PointRole::Target {
        return false;
    }
    if prev.kind == SegmentKind::Smoothed && pivot.is_offset() {
        return false;
    }

    let mut observed = prev.interior_targets();
    for target in last.interior_targets() {
        if !observed.contains(&target) {
            observed.push(target);
        }
    }
    let before = prev.length() + last.length();
    let radius = uav.recognition_radius;

    let mut straight_pool = observed.clone();
    straight_pool.push(pivot.map);
    straight_pool.extend(available.iter().filter(|point| !observed.contains(point)));
    let straight = build_straight(origin, &uav.end, radius, &straight_pool);
    let replacement = if keeps_all(&straight, &observed, &pivot.map, before) {
        straight
    } else {
        let mut pool = observed.clone();
        pool.extend(available.iter().filter(|point| !observed.contains(point)));
        let smoothed = build_smoothed_enhanced(&origin.display, &pivot.map, &uav.end, radius, &pool)
            .with_origin(origin.clone());
        if !keeps_all(&smoothed, &observed, &pivot.map, before) {
            return false;
        }
        smoothed
    };

    route.segments.truncate(count - 2);
    route.segments.push(replacement);
    true
}

/// Straight run from `origin` to `end` picking up every visible candidate.
fn build_straight(
    origin: &RouteSegmentPoint,
    end: &Point,
    radius: f64,
    candidates: &[Point],
) -> RouteSegment {
    let seen = visible_along(candidates, &origin.display, end, radius, &[origin.map, *end]);
    let mut points = Vec::with_capacity(seen.len() + 2);
    points.push(origin.clone());
    points.extend(seen.iter().map(sighting_waypoint));
    points.push(RouteSegmentPoint::fixed(*end));
    RouteSegment::classic(points)
}

fn keeps_all(segment: &RouteSegment, observed: &[Point], pivot: &Point, before: f64) -> bool {
    segment.contains_map(pivot)
        && observed.iter().all(|target| segment.contains_map(target))
        && segment.length() <= before + LENGTH_EPS
}
