//! Planar distance and projection helpers.

use crate::models::Point;

pub fn distance(a: &Point, b: &Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Closest point of a segment to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: f64,
    pub y: f64,
    /// Position along the segment, clamped to `[0, 1]`
    pub t: f64,
    /// Distance from the query point to (x, y)
    pub offset: f64,
}

/// Project `point` onto the segment `a`-`b`.
///
/// A degenerate segment projects everything onto `a` with `t = 0`.
pub fn project_onto_segment(point: &Point, a: &Point, b: &Point) -> Projection {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };

    let x = a.x + t * dx;
    let y = a.y + t * dy;
    Projection {
        x,
        y,
        t,
        offset: (point.x - x).hypot(point.y - y),
    }
}

pub fn point_segment_distance(point: &Point, a: &Point, b: &Point) -> f64 {
    project_onto_segment(point, a, b).offset
}

/// A candidate observed from a straight leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub point: Point,
    pub projection: Projection,
}

/// Candidates within `radius` of the segment `a`-`b`, ordered along it.
///
/// Points structurally equal to anything in `exclude` are skipped.
pub fn visible_along<'a>(
    candidates: impl IntoIterator<Item = &'a Point>,
    a: &Point,
    b: &Point,
    radius: f64,
    exclude: &[Point],
) -> Vec<Sighting> {
    let mut sightings: Vec<Sighting> = candidates
        .into_iter()
        .filter(|point| !exclude.contains(point))
        .filter_map(|point| {
            let projection = project_onto_segment(point, a, b);
            (projection.offset <= radius).then_some(Sighting {
                point: *point,
                projection,
            })
        })
        .collect();
    sightings.sort_by(|left, right| left.projection.t.total_cmp(&right.projection.t));
    sightings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_clamps_to_segment() {
        let a = Point::start(0.0, 0.0);
        let b = Point::finish(10.0, 0.0);

        let inside = project_onto_segment(&Point::target(4.0, 3.0), &a, &b);
        assert_eq!((inside.x, inside.y, inside.t), (4.0, 0.0, 0.4));
        assert!((inside.offset - 3.0).abs() < 1e-12);

        let before = project_onto_segment(&Point::target(-3.0, 4.0), &a, &b);
        assert_eq!(before.t, 0.0);
        assert!((before.offset - 5.0).abs() < 1e-12);

        let after = project_onto_segment(&Point::target(13.0, 4.0), &a, &b);
        assert_eq!(after.t, 1.0);
        assert!((after.offset - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment_projects_to_endpoint() {
        let a = Point::start(2.0, 2.0);
        let projection = project_onto_segment(&Point::target(5.0, 6.0), &a, &a);
        assert_eq!(projection.t, 0.0);
        assert_eq!((projection.x, projection.y), (2.0, 2.0));
        assert!((projection.offset - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_visible_along_orders_and_filters() {
        let a = Point::start(0.0, 0.0);
        let b = Point::finish(10.0, 0.0);
        let candidates = vec![
            Point::target(8.0, 1.0),
            Point::target(2.0, -1.0),
            Point::target(5.0, 4.0),
            Point::target(0.0, 0.5),
        ];

        let seen = visible_along(&candidates, &a, &b, 1.5, &[Point::target(0.0, 0.5)]);
        let xs: Vec<f64> = seen.iter().map(|s| s.point.x).collect();
        assert_eq!(xs, vec![2.0, 8.0]);
    }
}
