//! Branching network noise engine
//!
//! Builds a two-level drainage network around each query point and reduces
//! it to one scalar:
//! - **Level 1**: jittered points on the integer grid, joined by
//!   steepest-descent segments and smoothed with Catmull-Rom midpoints
//! - **Level 2**: points on the grid doubled around the query's quadrant,
//!   attached to the level-1 network at roughly 45°
//!
//! Only a fixed-size neighborhood of the query is ever built, so each query
//! costs the same regardless of where it lands. The engine is immutable
//! after construction and can be queried from many threads at once.

pub mod connect;
pub mod elevation;
pub mod field;
pub mod points;
pub mod refine;
pub mod segments;
pub mod subdivide;

pub use connect::SubSegmentSet;
pub use field::Overlays;
pub use points::{Neighborhood, PointCache, PointGenerator, CACHE_SIZE};
pub use refine::Quadrant;
pub use segments::SegmentSet;
pub use subdivide::Subdivision;

use crate::control::ControlFunction;
use crate::geometry::Point2D;
use crate::params::{ConfigError, NoiseParams};

use elevation::ElevationSampler;

/// Everything built around one query point
#[derive(Clone, Debug, PartialEq)]
pub struct LocalContext {
    /// Integer cell holding the query
    pub cell: (i64, i64),
    /// Level-1 points centered on `cell`
    pub points: Neighborhood<7>,
    /// Elevations of `points`, same layout
    pub elevations: [[f64; 7]; 7],
    /// Level-1 steepest-descent segments
    pub segments: SegmentSet,
    /// Level-1 halves and midpoints
    pub subdivision: Subdivision,
    /// Level-2 points around the query's quadrant
    pub sub_points: Neighborhood<5>,
    /// Level-2 segments
    pub sub_segments: SubSegmentSet,
}

/// The noise engine
pub struct BranchNoise {
    params: NoiseParams,
    overlays: Overlays,
    cache: PointCache,
    sampler: ElevationSampler,
}

impl BranchNoise {
    /// Build an engine with the control function selected in `params`
    pub fn new(params: NoiseParams) -> Result<Self, ConfigError> {
        let control = params.control.build();
        Self::with_control(params, control)
    }

    /// Build an engine around a caller-supplied control function.
    ///
    /// `params.control` is ignored.
    pub fn with_control(params: NoiseParams, control: Box<dyn ControlFunction>) -> Result<Self, ConfigError> {
        params.validate()?;

        let cache = PointCache::new(PointGenerator::new(params.seed, params.eps));
        log::debug!(
            "point cache filled: {0}x{0} cells, seed {1}, eps {2}",
            CACHE_SIZE,
            params.seed,
            params.eps
        );

        let sampler = ElevationSampler::new(params.noise_rect, params.control_rect, control);
        let overlays = Overlays {
            points: params.display_points,
            segments: params.display_segments,
            grid: params.display_grid,
        };

        Ok(Self {
            params,
            overlays,
            cache,
            sampler,
        })
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// The level-1 point of cell (i, j)
    pub fn point(&self, i: i64, j: i64) -> Point2D {
        self.cache.get(i, j)
    }

    /// Elevation of a noise-space point
    pub fn elevation(&self, p: Point2D) -> f64 {
        self.sampler.sample(p)
    }

    /// Build the local network around (x, y)
    pub fn evaluate_context(&self, x: f64, y: f64) -> LocalContext {
        let cell = (x.floor() as i64, y.floor() as i64);

        let points: Neighborhood<7> = self.cache.neighborhood(cell.0, cell.1);
        let elevations = self.sampler.sample_neighborhood(&points);
        let segments = segments::build_segments(&points, &elevations);
        let subdivision = subdivide::subdivide(&segments);

        let sub_points = refine::refine_points(&self.cache, cell, Point2D::new(x, y), &points);
        let sub_segments = connect::connect_sub_segments(&sub_points, &subdivision);

        LocalContext {
            cell,
            points,
            elevations,
            segments,
            subdivision,
            sub_points,
            sub_segments,
        }
    }

    /// Field value at (x, y)
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let ctx = self.evaluate_context(x, y);
        field::reduce(Point2D::new(x, y), &ctx, self.overlays)
    }
}
