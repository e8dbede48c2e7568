//! Level-1 network: one steepest-descent segment per cell.

use crate::geometry::Segment3D;

use super::points::Neighborhood;

/// Segments of the inner 5×5 cells of a 7×7 neighborhood, row-major
pub type SegmentSet = [Segment3D; 25];

/// Lowest point of the 3×3 block around (row, col).
///
/// Scans rows then columns in ascending order and keeps the first strict
/// minimum, so ties always resolve to the earliest scanned position.
pub fn steepest_descent(elevations: &[[f64; 7]; 7], row: usize, col: usize) -> (usize, usize) {
    let mut lowest = f64::MAX;
    let mut target = (row, col);

    for k in row - 1..=row + 1 {
        for l in col - 1..=col + 1 {
            if elevations[k][l] < lowest {
                lowest = elevations[k][l];
                target = (k, l);
            }
        }
    }

    target
}

/// Build the 25 directed segments flowing from each inner cell to its lowest neighbor.
///
/// A cell that is its own minimum yields a zero-length segment.
pub fn build_segments(points: &Neighborhood<7>, elevations: &[[f64; 7]; 7]) -> SegmentSet {
    let mut segments = [Segment3D::default(); 25];

    for row in 1..6 {
        for col in 1..6 {
            let (k, l) = steepest_descent(elevations, row, col);
            let a = points.get(row, col).with_z(elevations[row][col]);
            let b = points.get(k, l).with_z(elevations[k][l]);
            segments[5 * (row - 1) + col - 1] = Segment3D::new(a, b);
        }
    }

    segments
}
