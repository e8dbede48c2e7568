//! Scalar field reduction: Worley distance plus debug overlays.

use crate::geometry::{nearest_segment, Point2D, Segment3D};

use super::points::Neighborhood;
use super::LocalContext;

// Marker radii, halving from level to level
const POINT_RADIUS: f64 = 1.0 / 16.0;
const MIDPOINT_RADIUS: f64 = 1.0 / 32.0;
const SEGMENT_RADIUS: f64 = 1.0 / 64.0;
const GRID_RADIUS: f64 = 1.0 / 128.0;

const SUB_POINT_RADIUS: f64 = 1.0 / 32.0;
const SUB_SEGMENT_RADIUS: f64 = 1.0 / 128.0;
const SUB_GRID_RADIUS: f64 = 1.0 / 256.0;

/// Which debug markers are drawn on top of the field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overlays {
    pub points: bool,
    pub segments: bool,
    pub grid: bool,
}

/// Distance to the nearest segment of either level plus the elevation along it
pub fn worley(p: Point2D, ctx: &LocalContext) -> f64 {
    let (mut nearest, mut distance) = ctx.subdivision.nearest_half(p);
    if let Some((sub, sub_distance)) = nearest_segment(p, ctx.sub_segments.iter()) {
        if sub_distance < distance {
            nearest = sub;
            distance = sub_distance;
        }
    }

    distance + nearest.elevation_at(p)
}

/// 1.0 within `radius` of any point
fn mark_points<const N: usize>(p: Point2D, points: &Neighborhood<N>, radius: f64) -> f64 {
    if points.iter().any(|(_, _, q)| p.distance(q) < radius) {
        1.0
    } else {
        0.0
    }
}

/// 1.0 within `radius` of any segment centerline
fn mark_segments<'a>(p: Point2D, segments: impl IntoIterator<Item = &'a Segment3D>, radius: f64) -> f64 {
    if segments.into_iter().any(|s| s.distance(p) < radius) {
        1.0
    } else {
        0.0
    }
}

/// 1.0 within `radius` of a grid line, lines sitting at integer + `offset`
fn mark_grid(p: Point2D, offset: f64, radius: f64) -> f64 {
    let near = |v: f64| {
        let f = (v - offset).rem_euclid(1.0);
        f.min(1.0 - f) < radius
    };
    if near(p.x) || near(p.y) {
        1.0
    } else {
        0.0
    }
}

/// Level-1 markers: generator points, midpoints, half-segments, cell grid
pub fn primary_overlay(p: Point2D, ctx: &LocalContext, overlays: Overlays) -> f64 {
    let mut value: f64 = 0.0;

    if overlays.points {
        value = value.max(mark_points(p, &ctx.points, POINT_RADIUS));
        value = value.max(mark_points(p, &ctx.subdivision.midpoints, MIDPOINT_RADIUS));
    }
    if overlays.segments {
        value = value.max(mark_segments(p, ctx.subdivision.halves(), SEGMENT_RADIUS));
    }
    if overlays.grid {
        value = value.max(mark_grid(p, 0.0, GRID_RADIUS));
    }

    value
}

/// Level-2 markers: refined points, sub-segments, half-cell grid
pub fn secondary_overlay(p: Point2D, ctx: &LocalContext, overlays: Overlays) -> f64 {
    let mut value: f64 = 0.0;

    if overlays.points {
        value = value.max(mark_points(p, &ctx.sub_points, SUB_POINT_RADIUS));
    }
    if overlays.segments {
        value = value.max(mark_segments(p, ctx.sub_segments.iter(), SUB_SEGMENT_RADIUS));
    }
    if overlays.grid {
        value = value.max(mark_grid(p, 0.5, SUB_GRID_RADIUS));
    }

    value
}

/// Final value at `p`: the largest of the field and both overlays
pub fn reduce(p: Point2D, ctx: &LocalContext, overlays: Overlays) -> f64 {
    worley(p, ctx)
        .max(primary_overlay(p, ctx, overlays))
        .max(secondary_overlay(p, ctx, overlays))
}
