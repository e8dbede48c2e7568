//! Spline subdivision of level-1 segments.
//!
//! Each segment is split at a Catmull-Rom midpoint computed from its chain
//! neighbors. Where the chain stops (network boundary, confluence, source)
//! the missing control point is synthesized by reflection.

use crate::geometry::{catmull_rom_midpoint, Point2D, Point3D, Segment3D};

use super::points::Neighborhood;
use super::segments::SegmentSet;

/// Level-1 segments split in two halves around their midpoints
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Subdivision {
    /// `(start, midpoint)` per segment
    pub begin: SegmentSet,
    /// `(midpoint, end)` per segment
    pub end: SegmentSet,
    /// Planar midpoints, laid out like the 5×5 inner cells
    pub midpoints: Neighborhood<5>,
}

impl Subdivision {
    /// All 50 half-segments, begin halves first
    pub fn halves(&self) -> impl Iterator<Item = &Segment3D> + '_ {
        self.begin.iter().chain(self.end.iter())
    }

    /// Nearest half-segment to `p` and its distance; the earlier half wins ties
    pub fn nearest_half(&self, p: Point2D) -> (Segment3D, f64) {
        let first = self.begin[0];
        self.halves()
            .skip(1)
            .fold((first, first.distance(p)), |best, segment| {
                let dist = segment.distance(p);
                if dist < best.1 {
                    (*segment, dist)
                } else {
                    best
                }
            })
    }
}

/// Unique predecessor and successor of `current` among `segments`.
///
/// Only non-zero-length segments take part in a chain; matching uses exact
/// coordinate equality. A count other than one yields `None`.
pub fn chain_neighbors(segments: &SegmentSet, current: &Segment3D) -> (Option<Segment3D>, Option<Segment3D>) {
    let mut predecessors = 0;
    let mut predecessor = None;
    let mut successors = 0;
    let mut successor = None;

    for segment in segments.iter().filter(|s| !s.is_zero_length()) {
        if segment.b == current.a {
            predecessors += 1;
            predecessor = Some(*segment);
        } else if segment.a == current.b {
            successors += 1;
            successor = Some(*segment);
        }
    }

    (
        predecessor.filter(|_| predecessors == 1),
        successor.filter(|_| successors == 1),
    )
}

/// Midpoint of `segment` given its (optional) chain neighbors
pub fn spline_midpoint(
    segment: &Segment3D,
    predecessor: Option<Segment3D>,
    successor: Option<Segment3D>,
) -> Point3D {
    if segment.is_zero_length() {
        return segment.a;
    }

    let p0 = predecessor.map_or(2.0 * segment.a - segment.b, |s| s.a);
    let p3 = successor.map_or(2.0 * segment.b - segment.a, |s| s.b);
    catmull_rom_midpoint(p0, segment.a, segment.b, p3)
}

/// Split every segment at its spline midpoint
pub fn subdivide(segments: &SegmentSet) -> Subdivision {
    let mut begin = [Segment3D::default(); 25];
    let mut end = [Segment3D::default(); 25];
    let mut midpoints = Neighborhood::<5>::default();

    for (i, segment) in segments.iter().enumerate() {
        let (predecessor, successor) = chain_neighbors(segments, segment);
        let mid = spline_midpoint(segment, predecessor, successor);

        begin[i] = Segment3D::new(segment.a, mid);
        end[i] = Segment3D::new(mid, segment.b);
        midpoints.set(i / 5, i % 5, mid.projection_z());
    }

    Subdivision { begin, end, midpoints }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z)
    }

    /// 25 zero-length segments at distinct places, with a few real ones swapped in
    fn set_with(real: &[(usize, Segment3D)]) -> SegmentSet {
        let mut segments: SegmentSet = std::array::from_fn(|i| {
            let q = p(100.0 + i as f64, 100.0, 0.0);
            Segment3D::new(q, q)
        });
        for &(i, s) in real {
            segments[i] = s;
        }
        segments
    }

    #[test]
    fn test_zero_length_midpoint_is_endpoint() {
        let a = p(1.5, 2.5, 0.2);
        let feeder = Segment3D::new(p(0.5, 1.5, 0.6), a);
        let segments = set_with(&[(0, Segment3D::new(a, a)), (1, feeder)]);
        let sub = subdivide(&segments);

        assert_eq!(sub.begin[0], Segment3D::new(a, a));
        assert_eq!(sub.end[0], Segment3D::new(a, a));
        assert_eq!(sub.midpoints.get(0, 0), Point2D::new(1.5, 2.5));
    }

    #[test]
    fn test_isolated_segment_uses_plain_midpoint() {
        // Both neighbors reflected: spline collapses onto the chord midpoint
        let s = Segment3D::new(p(0.0, 0.0, 1.0), p(2.0, 1.0, 0.0));
        let segments = set_with(&[(7, s)]);
        let sub = subdivide(&segments);

        let mid = sub.end[7].a;
        assert!((mid.x - 1.0).abs() < 1e-12);
        assert!((mid.y - 0.5).abs() < 1e-12);
        assert!((mid.z - 0.5).abs() < 1e-12);
        assert_eq!(sub.begin[7].b, mid);
        assert_eq!(sub.midpoints.get(1, 2), mid.projection_z());
    }

    #[test]
    fn test_chain_bends_midpoint() {
        let up = Segment3D::new(p(0.0, 1.0, 0.9), p(1.0, 0.0, 0.6));
        let mid_seg = Segment3D::new(p(1.0, 0.0, 0.6), p(2.0, 0.0, 0.4));
        let down = Segment3D::new(p(2.0, 0.0, 0.4), p(3.0, 1.0, 0.1));
        let segments = set_with(&[(3, up), (4, mid_seg), (5, down)]);

        let (pred, succ) = chain_neighbors(&segments, &mid_seg);
        assert_eq!(pred, Some(up));
        assert_eq!(succ, Some(down));

        let sub = subdivide(&segments);
        let mid = sub.begin[4].b;
        assert!((mid.x - 1.5).abs() < 1e-12);
        assert!((mid.y + 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_half_agrees_with_scan() {
        use crate::geometry::nearest_segment;

        let up = Segment3D::new(p(0.0, 1.0, 0.9), p(1.0, 0.0, 0.6));
        let mid_seg = Segment3D::new(p(1.0, 0.0, 0.6), p(2.0, 0.0, 0.4));
        let sub = subdivide(&set_with(&[(3, up), (4, mid_seg)]));

        for q in [Point2D::new(0.2, 0.4), Point2D::new(1.9, -0.3), Point2D::new(103.2, 99.0), Point2D::new(-50.0, 7.0)] {
            assert_eq!(Some(sub.nearest_half(q)), nearest_segment(q, sub.halves()));
        }

        let (nearest, distance) = sub.nearest_half(Point2D::new(1.9, -0.3));
        assert_eq!(nearest, sub.end[4]);
        assert!(distance > 0.25 && distance < 0.3);
    }

    #[test]
    fn test_confluence_has_no_single_predecessor() {
        let left = Segment3D::new(p(0.0, 0.0, 0.9), p(1.0, 1.0, 0.5));
        let right = Segment3D::new(p(2.0, 0.0, 0.9), p(1.0, 1.0, 0.5));
        let trunk = Segment3D::new(p(1.0, 1.0, 0.5), p(1.0, 2.0, 0.1));
        let segments = set_with(&[(0, left), (1, right), (2, trunk)]);

        let (pred, succ) = chain_neighbors(&segments, &trunk);
        assert!(pred.is_none());
        assert!(succ.is_none());

        // Each tributary still sees the trunk as its only successor
        assert_eq!(chain_neighbors(&segments, &left).1, Some(trunk));
    }

    #[test]
    fn test_reflected_start_matches_formula() {
        let s = Segment3D::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let succ = Segment3D::new(p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0));

        let mid = spline_midpoint(&s, None, Some(succ));
        let expected = catmull_rom_midpoint(p(-1.0, 0.0, 0.0), s.a, s.b, succ.b);
        assert_eq!(mid, expected);
    }
}
