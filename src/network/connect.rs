//! Level-2 segments: refined points attached to the level-1 network.

use crate::geometry::{Point2D, Segment3D};

use super::points::Neighborhood;
use super::subdivide::Subdivision;

/// One sub-segment per interior point of the refined 5×5 neighborhood
pub type SubSegmentSet = [Segment3D; 9];

/// Attachment parameter of `p` on `segment`, `distance` being their planar distance.
///
/// The orthogonal foot is pushed downstream by `distance / length` so the
/// branch joins at roughly 45°, never past the segment's end.
pub fn attachment_parameter(p: Point2D, segment: &Segment3D, distance: f64) -> f64 {
    let u = segment.projection(p).clamp(0.0, 1.0);
    if u > 0.0 && u < 1.0 {
        (u + distance / segment.length()).min(1.0)
    } else {
        u
    }
}

/// Connect `p` to the nearest half-segment.
///
/// The start takes the elevation of the junction.
pub fn connect_point(p: Point2D, subdivision: &Subdivision) -> Segment3D {
    let (parent, distance) = subdivision.nearest_half(p);
    let junction = parent.lerp(attachment_parameter(p, &parent, distance));
    Segment3D::new(p.with_z(junction.z), junction)
}

/// The 9 sub-segments of a refined neighborhood, row-major over its 3×3 interior
pub fn connect_sub_segments(points: &Neighborhood<5>, subdivision: &Subdivision) -> SubSegmentSet {
    let mut sub_segments = [Segment3D::default(); 9];

    for (row, col, p) in points.interior() {
        sub_segments[3 * (row - 1) + col - 1] = connect_point(p, subdivision);
    }

    sub_segments
}
