//! Core data models for UAV coverage planning.

use serde::{Deserialize, Serialize};

use crate::geometry::distance;

/// What a point on the map stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointRole {
    /// Ground point that has to be observed
    #[default]
    Target,
    /// Take-off point of a UAV
    Start,
    /// Landing point of a UAV
    Finish,
    /// Single-use refuelling stop
    Service,
}

/// A location on the planning map.
///
/// Equality is structural: two points are equal when both their
/// coordinates and their role match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub role: PointRole,
}

/// Hashable identity of a [`Point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PointKey(u64, u64, PointRole);

impl Point {
    pub fn new(x: f64, y: f64, role: PointRole) -> Self {
        Self { x, y, role }
    }

    pub fn target(x: f64, y: f64) -> Self {
        Self::new(x, y, PointRole::Target)
    }

    pub fn start(x: f64, y: f64) -> Self {
        Self::new(x, y, PointRole::Start)
    }

    pub fn finish(x: f64, y: f64) -> Self {
        Self::new(x, y, PointRole::Finish)
    }

    pub fn service(x: f64, y: f64) -> Self {
        Self::new(x, y, PointRole::Service)
    }

    /// Same coordinates, different role.
    pub fn with_role(self, role: PointRole) -> Self {
        Self { role, ..self }
    }

    /// True when both points sit on the same coordinates, whatever their role.
    pub fn same_place(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub(crate) fn key(&self) -> PointKey {
        // `+ 0.0` folds -0.0 into 0.0 so both hash alike
        PointKey((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits(), self.role)
    }
}

/// A resource-limited vehicle taking part in the coverage mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Uav {
    pub id: u32,
    pub start: Point,
    pub end: Point,
    /// Single-use refuelling stops available to this UAV
    #[serde(default)]
    pub service_points: Vec<Point>,
    /// Flight distance available on a full tank
    pub max_range: f64,
    /// Sensor footprint radius
    pub recognition_radius: f64,
}

impl Uav {
    /// Create a UAV; roles of the given points are normalised.
    pub fn new(
        id: u32,
        start: Point,
        end: Point,
        service_points: Vec<Point>,
        max_range: f64,
        recognition_radius: f64,
    ) -> Self {
        Self {
            id,
            start,
            end,
            service_points,
            max_range,
            recognition_radius,
        }
        .normalized()
    }

    /// Copy of this UAV with every point carrying the role its slot implies.
    pub fn normalized(&self) -> Self {
        Self {
            id: self.id,
            start: self.start.with_role(PointRole::Start),
            end: self.end.with_role(PointRole::Finish),
            service_points: self
                .service_points
                .iter()
                .map(|point| point.with_role(PointRole::Service))
                .collect(),
            max_range: self.max_range,
            recognition_radius: self.recognition_radius,
        }
    }
}

/// A waypoint as it appears in a built route.
///
/// `map` is the true location that is accounted for (target, service or
/// terminal point); `display` is the location actually flown through, which
/// differs from `map` when a target is observed from a distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegmentPoint {
    pub map: Point,
    pub display: Point,
}

impl RouteSegmentPoint {
    /// Waypoint flown exactly over its map location.
    pub fn fixed(point: Point) -> Self {
        Self {
            map: point,
            display: point,
        }
    }

    /// Waypoint observing `map` from the display coordinates `(x, y)`.
    pub fn observed(map: Point, x: f64, y: f64) -> Self {
        Self {
            map,
            display: Point::new(x, y, map.role),
        }
    }

    pub fn role(&self) -> PointRole {
        self.map.role
    }

    /// True when the UAV does not fly over the map location itself.
    pub fn is_offset(&self) -> bool {
        !self.map.same_place(&self.display)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// One or more straight legs
    Classic,
    /// Two-leg detour touching the sensor circle of one target
    Smoothed,
}

/// Ordered run of waypoints built in one construction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub kind: SegmentKind,
    pub points: Vec<RouteSegmentPoint>,
}

impl RouteSegment {
    pub fn classic(points: Vec<RouteSegmentPoint>) -> Self {
        Self {
            kind: SegmentKind::Classic,
            points,
        }
    }

    pub fn smoothed(points: Vec<RouteSegmentPoint>) -> Self {
        Self {
            kind: SegmentKind::Smoothed,
            points,
        }
    }

    pub fn is_smoothed(&self) -> bool {
        self.kind == SegmentKind::Smoothed
    }

    /// Sum of distances between consecutive display coordinates.
    pub fn length(&self) -> f64 {
        polyline_length(self.points.iter())
    }

    pub fn first(&self) -> Option<&RouteSegmentPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&RouteSegmentPoint> {
        self.points.last()
    }

    /// Replace the first waypoint, keeping the rest of the segment.
    ///
    /// Builders start every segment at a plain fixed point; the engine swaps in
    /// the waypoint the UAV actually stands on so the route stays continuous.
    pub fn with_origin(mut self, origin: RouteSegmentPoint) -> Self {
        match self.points.first_mut() {
            Some(first) => *first = origin,
            None => self.points.push(origin),
        }
        self
    }

    /// Map locations of every target waypoint in this segment.
    pub fn targets(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points
            .iter()
            .filter(|point| point.role() == PointRole::Target)
            .map(|point| &point.map)
    }

    /// Targets strictly between the first and last waypoint.
    pub fn interior_targets(&self) -> Vec<Point> {
        let len = self.points.len();
        if len < 3 {
            return Vec::new();
        }
        self.points[1..len - 1]
            .iter()
            .filter(|point| point.role() == PointRole::Target)
            .map(|point| point.map)
            .collect()
    }

    pub fn contains_role(&self, role: PointRole) -> bool {
        self.points.iter().any(|point| point.role() == role)
    }

    pub fn contains_map(&self, map: &Point) -> bool {
        self.points.iter().any(|point| point.map == *map)
    }
}

/// Route of one UAV, built segment by segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub uav_id: u32,
    pub segments: Vec<RouteSegment>,
}

impl Route {
    pub fn new(uav_id: u32) -> Self {
        Self {
            uav_id,
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: RouteSegment) {
        self.segments.push(segment);
    }

    /// All waypoints in flight order; segment junctions appear twice.
    pub fn waypoints(&self) -> impl Iterator<Item = &RouteSegmentPoint> + '_ {
        self.segments.iter().flat_map(|segment| segment.points.iter())
    }

    /// Total flown distance over display coordinates.
    pub fn distance(&self) -> f64 {
        polyline_length(self.waypoints())
    }

    /// True once some waypoint of the route is `point`.
    pub fn touches(&self, point: &Point) -> bool {
        self.waypoints().any(|waypoint| waypoint.map == *point)
    }

    /// Distinct targets observed by this route.
    pub fn observed_targets(&self) -> Vec<Point> {
        let mut observed: Vec<Point> = Vec::new();
        for target in self.segments.iter().flat_map(|segment| segment.targets()) {
            if !observed.contains(target) {
                observed.push(*target);
            }
        }
        observed
    }
}

/// Input of one planning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub targets: Vec<Point>,
    pub uavs: Vec<Uav>,
}

impl Scenario {
    pub fn new(targets: Vec<Point>, uavs: Vec<Uav>) -> Self {
        Self { targets, uavs }.normalized()
    }

    /// Copy with every point carrying the role its slot implies.
    pub fn normalized(&self) -> Self {
        Self {
            targets: self
                .targets
                .iter()
                .map(|point| point.with_role(PointRole::Target))
                .collect(),
            uavs: self.uavs.iter().map(Uav::normalized).collect(),
        }
    }
}

/// Best solution found by a planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    /// One route per UAV, in scenario order
    pub routes: Vec<Route>,
    pub covered_targets: usize,
    pub total_targets: usize,
    pub total_distance: f64,
    /// Targets no route observes
    pub uncovered: Vec<Point>,
    pub iterations_completed: usize,
    pub iterations_discarded: usize,
}

impl RoutePlan {
    pub fn route_for(&self, uav_id: u32) -> Option<&Route> {
        self.routes.iter().find(|route| route.uav_id == uav_id)
    }
}

fn polyline_length<'a>(points: impl Iterator<Item = &'a RouteSegmentPoint>) -> f64 {
    let mut total = 0.0;
    let mut previous: Option<&Point> = None;
    for point in points {
        if let Some(prev) = previous {
            total += distance(prev, &point.display);
        }
        previous = Some(&point.display);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_equality_is_structural() {
        assert_eq!(Point::target(1.0, 2.0), Point::target(1.0, 2.0));
        assert_ne!(Point::target(1.0, 2.0), Point::service(1.0, 2.0));
        assert!(Point::target(1.0, 2.0).same_place(&Point::service(1.0, 2.0)));
        assert_eq!(Point::target(0.0, 0.0).key(), Point::target(-0.0, 0.0).key());
    }

    #[test]
    fn test_uav_new_normalizes_roles() {
        let uav = Uav::new(
            7,
            Point::target(0.0, 0.0),
            Point::target(10.0, 0.0),
            vec![Point::target(5.0, 5.0)],
            100.0,
            2.0,
        );
        assert_eq!(uav.start.role, PointRole::Start);
        assert_eq!(uav.end.role, PointRole::Finish);
        assert_eq!(uav.service_points[0].role, PointRole::Service);
    }

    #[test]
    fn test_route_distance_spans_segments() {
        let mut route = Route::new(1);
        route.push(RouteSegment::classic(vec![
            RouteSegmentPoint::fixed(Point::start(0.0, 0.0)),
            RouteSegmentPoint::observed(Point::target(3.0, 1.0), 3.0, 0.0),
        ]));
        route.push(RouteSegment::classic(vec![
            RouteSegmentPoint::observed(Point::target(3.0, 1.0), 3.0, 0.0),
            RouteSegmentPoint::fixed(Point::finish(3.0, 4.0)),
        ]));

        assert!((route.distance() - 7.0).abs() < 1e-12);
        assert!(route.touches(&Point::finish(3.0, 4.0)));
        assert_eq!(route.observed_targets(), vec![Point::target(3.0, 1.0)]);
    }

    #[test]
    fn test_interior_targets_skip_endpoints() {
        let segment = RouteSegment::classic(vec![
            RouteSegmentPoint::fixed(Point::target(0.0, 0.0)),
            RouteSegmentPoint::observed(Point::target(1.0, 1.0), 1.0, 0.0),
            RouteSegmentPoint::fixed(Point::service(2.0, 0.0)),
            RouteSegmentPoint::fixed(Point::target(3.0, 0.0)),
        ]);
        assert_eq!(segment.interior_targets(), vec![Point::target(1.0, 1.0)]);
    }

    #[test]
    fn test_scenario_deserializes_with_default_roles() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "targets": [{"x": 1.0, "y": 2.0}],
                "uavs": [{
                    "id": 1,
                    "start": {"x": 0.0, "y": 0.0},
                    "end": {"x": 5.0, "y": 0.0},
                    "max_range": 50.0,
                    "recognition_radius": 1.5
                }]
            }"#,
        )
        .expect("parse scenario");

        let scenario = scenario.normalized();
        assert_eq!(scenario.targets[0].role, PointRole::Target);
        assert_eq!(scenario.uavs[0].end.role, PointRole::Finish);
        assert!(scenario.uavs[0].service_points.is_empty());
    }
}
