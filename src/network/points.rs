//! Jittered grid points and the memoization window around the origin.
//!
//! Every integer cell (i, j) owns exactly one point, derived from a
//! positional hash of the cell and the global seed. The generator is
//! re-seeded on every call so results never depend on query order.

use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::Point2D;

/// Side of the square point cache, in cells. Covers [-64, 64) on both axes.
pub const CACHE_SIZE: i64 = 128;

const INT_MAX: i64 = i32::MAX as i64;

// =============================================================================
// NEIGHBORHOODS
// =============================================================================

/// N×N block of points around a cell, stored row-major (row = y, column = x)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighborhood<const N: usize> {
    cells: [[Point2D; N]; N],
}

impl<const N: usize> Default for Neighborhood<N> {
    fn default() -> Self {
        Self {
            cells: [[Point2D::default(); N]; N],
        }
    }
}

impl<const N: usize> Neighborhood<N> {
    /// Offset of the center cell from either edge
    pub const HALF: i64 = (N / 2) as i64;

    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Point2D) -> Self {
        Self {
            cells: std::array::from_fn(|row| std::array::from_fn(|col| f(row, col))),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Point2D {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, point: Point2D) {
        self.cells[row][col] = point;
    }

    /// Iterate over all points with their (row, col)
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Point2D)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(row, line)| line.iter().enumerate().map(move |(col, p)| (row, col, *p)))
    }

    /// Points of the inner block, skipping a one-cell border
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize, Point2D)> + '_ {
        self.iter()
            .filter(|&(row, col, _)| row >= 1 && col >= 1 && row + 1 < N && col + 1 < N)
    }

    /// Apply `f` to every point
    pub fn map(&self, mut f: impl FnMut(Point2D) -> Point2D) -> Self {
        Self::from_fn(|row, col| f(self.cells[row][col]))
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Deterministic jittered point per integer cell
#[derive(Clone, Debug)]
pub struct PointGenerator {
    seed: u64,
    jitter: Uniform<f64>,
}

impl PointGenerator {
    /// `eps` must lie in (0, 0.5); the engine validates it before getting here.
    pub(crate) fn new(seed: u64, eps: f64) -> Self {
        Self {
            seed,
            jitter: Uniform::new_inclusive(eps, 1.0 - eps),
        }
    }

    /// Positional hash `(541 i + 79 j + seed) mod i32::MAX`.
    ///
    /// Weak by construction: distant cells may collide, which only repeats a
    /// jitter pattern.
    pub fn seed_noise(&self, i: i64, j: i64) -> u64 {
        // Reducing each term first keeps the sum inside i64 for any cell
        let seed = (self.seed % INT_MAX as u64) as i64;
        let (i, j) = (i.rem_euclid(INT_MAX), j.rem_euclid(INT_MAX));
        (541 * i + 79 * j + seed).rem_euclid(INT_MAX) as u64
    }

    /// The jittered point of cell (i, j)
    pub fn generate(&self, i: i64, j: i64) -> Point2D {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed_noise(i, j));
        let u = self.jitter.sample(&mut rng);
        let v = self.jitter.sample(&mut rng);
        Point2D::new(i as f64 + u, j as f64 + v)
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// Points of every cell in the window around the origin, filled once.
///
/// Lookups outside the window fall through to the generator, so the cache
/// never changes what a cell's point is.
#[derive(Clone, Debug)]
pub struct PointCache {
    generator: PointGenerator,
    points: Vec<Point2D>,
}

impl PointCache {
    pub fn new(generator: PointGenerator) -> Self {
        let half = CACHE_SIZE / 2;
        let mut points = Vec::with_capacity((CACHE_SIZE * CACHE_SIZE) as usize);
        for i in -half..half {
            for j in -half..half {
                points.push(generator.generate(i, j));
            }
        }
        Self { generator, points }
    }

    pub fn generator(&self) -> &PointGenerator {
        &self.generator
    }

    /// Whether cell (i, j) lies inside the cached window
    pub fn contains(&self, i: i64, j: i64) -> bool {
        let half = CACHE_SIZE / 2;
        (-half..half).contains(&i) && (-half..half).contains(&j)
    }

    /// The point of cell (i, j), from the window when possible
    pub fn get(&self, i: i64, j: i64) -> Point2D {
        if self.contains(i, j) {
            let half = CACHE_SIZE / 2;
            let idx = (i + half) as usize * CACHE_SIZE as usize + (j + half) as usize;
            self.points[idx]
        } else {
            self.generator.generate(i, j)
        }
    }

    /// N×N points centered on cell (cx, cy). Cell indices saturate at the
    /// ends of the i64 range.
    pub fn neighborhood<const N: usize>(&self, cx: i64, cy: i64) -> Neighborhood<N> {
        let half = Neighborhood::<N>::HALF;
        Neighborhood::from_fn(|row, col| {
            self.get(
                cx.saturating_add(col as i64 - half),
                cy.saturating_add(row as i64 - half),
            )
        })
    }
}
