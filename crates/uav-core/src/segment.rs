//! Choosing the segment shape for one construction step.

use crate::classic::{build_classic_enhanced, try_build_classic_through};
use crate::models::{Point, RouteSegment};
use crate::smoothed::{build_smoothed, build_smoothed_enhanced};

/// Build the segment `a -> mid -> c` that observes `mid`.
///
/// - when the straight line `a`-`c` misses `mid`'s sensor circle, the plain
///   smoothed segment is used;
/// - otherwise a straight line that picks up further `candidates` wins;
/// - otherwise the shorter of the straight line and the enhanced smoothed
///   segment, the straight line on ties.
pub fn select_segment(
    a: &Point,
    mid: &Point,
    c: &Point,
    radius: f64,
    candidates: &[Point],
) -> RouteSegment {
    let Some(classic) = try_build_classic_through(a, mid, c, radius) else {
        return build_smoothed(a, mid, c, radius);
    };

    let mut pool = candidates.to_vec();
    if !pool.contains(mid) {
        pool.push(*mid);
    }

    if let Some(enhanced) = build_classic_enhanced(a, c, radius, &pool) {
        if enhanced.contains_map(mid) {
            return enhanced;
        }
    }

    let smoothed = build_smoothed_enhanced(a, mid, c, radius, &pool);
    if smoothed.length() < classic.length() {
        smoothed
    } else {
        classic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;
    use crate::models::SegmentKind;

    #[test]
    fn test_uncovered_mid_goes_smoothed() {
        let a = Point::start(0.0, 0.0);
        let mid = Point::target(5.0, 2.0 + 1e-6);
        let c = Point::finish(10.0, 0.0);

        let segment = select_segment(&a, &mid, &c, 2.0, &[mid]);
        assert_eq!(segment.kind, SegmentKind::Smoothed);
        assert_eq!(segment.points.len(), 3);
        assert!((distance(&segment.points[1].display, &mid) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_covered_mid_prefers_enhanced_classic() {
        let a = Point::start(0.0, 0.0);
        let mid = Point::target(5.0, 1.0);
        let extra = Point::target(8.0, -1.0);
        let c = Point::finish(10.0, 0.0);

        let segment = select_segment(&a, &mid, &c, 2.0, &[mid, extra]);
        assert_eq!(segment.kind, SegmentKind::Classic);
        let maps: Vec<Point> = segment.points.iter().map(|p| p.map).collect();
        assert_eq!(maps, vec![a, mid, extra, c]);
    }

    #[test]
    fn test_covered_mid_tie_keeps_classic() {
        let a = Point::start(0.0, 0.0);
        let mid = Point::target(5.0, 0.0);
        let c = Point::finish(10.0, 0.0);

        let segment = select_segment(&a, &mid, &c, 1.0, &[]);
        assert_eq!(segment.kind, SegmentKind::Classic);
        assert!((segment.length() - 10.0).abs() < 1e-12);
    }
}
