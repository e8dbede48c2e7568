//! Level-2 points: the grid doubled around the query's quadrant.
//!
//! The finer grid reuses the point generator at twice the resolution, then
//! pins every cell it shares with level 1 to the level-1 point so both
//! levels agree exactly across cell boundaries.

use crate::geometry::Point2D;

use super::points::{Neighborhood, PointCache};

/// Half-cell address of a point relative to a cell origin.
///
/// Quadrant (0, 0) is the top-left half-cell of the cell; neighbors extend
/// the numbering in both directions (-1 is the half-cell left of the origin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Quadrant {
    pub x: i64,
    pub y: i64,
}

impl Quadrant {
    /// Quadrant of `p` relative to the cell whose origin is `cell`
    pub fn locate(cell: Point2D, p: Point2D) -> Self {
        Self {
            x: (2.0 * (p.x - cell.x)).floor() as i64,
            y: (2.0 * (p.y - cell.y)).floor() as i64,
        }
    }
}

/// 5×5 level-2 neighborhood around the quadrant holding `query`.
///
/// `cell` is the integer cell containing `query` and `points` its level-1
/// 7×7 neighborhood.
pub fn refine_points(
    cache: &PointCache,
    cell: (i64, i64),
    query: Point2D,
    points: &Neighborhood<7>,
) -> Neighborhood<5> {
    let origin = Point2D::new(cell.0 as f64, cell.1 as f64);
    let quadrant = Quadrant::locate(origin, query);
    let half = Neighborhood::<5>::HALF;

    let fine: Neighborhood<5> = cache.neighborhood(
        cell.0.saturating_mul(2).saturating_add(quadrant.x),
        cell.1.saturating_mul(2).saturating_add(quadrant.y),
    );
    let mut refined = fine.map(|p| Point2D::new(p.x / 2.0, p.y / 2.0));

    // Pin shared cells to their level-1 points
    for (_, _, p) in points.iter() {
        let q = Quadrant::locate(origin, p);
        let row = half.saturating_sub(quadrant.y).saturating_add(q.y);
        let col = half.saturating_sub(quadrant.x).saturating_add(q.x);
        if (0..5).contains(&row) && (0..5).contains(&col) {
            refined.set(row as usize, col as usize, p);
        }
    }

    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::points::PointGenerator;

    #[test]
    fn test_quadrant_numbering() {
        let origin = Point2D::new(3.0, -2.0);

        assert_eq!(Quadrant::locate(origin, Point2D::new(3.2, -1.9)), Quadrant { x: 0, y: 0 });
        assert_eq!(Quadrant::locate(origin, Point2D::new(3.7, -1.2)), Quadrant { x: 1, y: 1 });
        assert_eq!(Quadrant::locate(origin, Point2D::new(4.1, -2.6)), Quadrant { x: 2, y: -2 });
        assert_eq!(Quadrant::locate(origin, Point2D::new(2.9, -0.5)), Quadrant { x: -1, y: 3 });
        // Half-open on the upper side
        assert_eq!(Quadrant::locate(origin, Point2D::new(3.5, -1.5)), Quadrant { x: 1, y: 1 });
    }

    #[test]
    fn test_level_one_points_are_pinned() {
        let cache = PointCache::new(PointGenerator::new(11, 0.15));

        for &(qx, qy) in &[(2.1, 5.2), (2.8, 5.9), (-7.3, 0.6), (80.6, -90.1), (1.2e9 + 0.3, -3.0e9 + 0.6)] {
            let query = Point2D::new(qx, qy);
            let cell = (qx.floor() as i64, qy.floor() as i64);
            let points: Neighborhood<7> = cache.neighborhood(cell.0, cell.1);
            let refined = refine_points(&cache, cell, query, &points);

            let origin = Point2D::new(cell.0 as f64, cell.1 as f64);
            let quadrant = Quadrant::locate(origin, query);
            let mut pinned = 0;
            for (_, _, p) in points.iter() {
                let q = Quadrant::locate(origin, p);
                let row = 2 - quadrant.y + q.y;
                let col = 2 - quadrant.x + q.x;
                if (0..5).contains(&row) && (0..5).contains(&col) {
                    assert_eq!(refined.get(row as usize, col as usize), p);
                    pinned += 1;
                }
            }
            // The window spans 2.5 cells per axis, so it always holds at least 2×2 level-1 points
            assert!(pinned >= 4, "only {} pinned around {:?}", pinned, query);
        }
    }

    #[test]
    fn test_unshared_cells_come_from_doubled_grid() {
        let cache = PointCache::new(PointGenerator::new(4, 0.2));
        let query = Point2D::new(0.2, 0.2);
        let points: Neighborhood<7> = cache.neighborhood(0, 0);
        let refined = refine_points(&cache, (0, 0), query, &points);

        let pinned: Vec<Point2D> = points.iter().map(|(_, _, p)| p).collect();
        for (row, col, p) in refined.iter() {
            if pinned.contains(&p) {
                continue;
            }
            // Level-2 cell (col - 2, row - 2) at half scale
            let fine = cache.get(col as i64 - 2, row as i64 - 2);
            assert_eq!(p, Point2D::new(fine.x / 2.0, fine.y / 2.0));
        }
    }
}
