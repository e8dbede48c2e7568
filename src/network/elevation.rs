//! Elevation lookup: noise space → control-function space → control function.

use crate::control::ControlFunction;
use crate::geometry::{remap, Point2D};
use crate::params::Rect;

use super::points::Neighborhood;

/// Remaps points into control-function space and queries the control function
pub struct ElevationSampler {
    noise_rect: Rect,
    control_rect: Rect,
    control: Box<dyn ControlFunction>,
}

impl ElevationSampler {
    pub fn new(noise_rect: Rect, control_rect: Rect, control: Box<dyn ControlFunction>) -> Self {
        Self {
            noise_rect,
            control_rect,
            control,
        }
    }

    /// Map a noise-space point into control-function space, axis by axis
    pub fn to_control_space(&self, p: Point2D) -> Point2D {
        let (n, c) = (&self.noise_rect, &self.control_rect);
        Point2D::new(
            remap(p.x, n.top_left.x, n.bottom_right.x, c.top_left.x, c.bottom_right.x),
            remap(p.y, n.top_left.y, n.bottom_right.y, c.top_left.y, c.bottom_right.y),
        )
    }

    pub fn sample(&self, p: Point2D) -> f64 {
        let q = self.to_control_space(p);
        self.control.evaluate(q.x, q.y)
    }

    /// Elevation of every point of a neighborhood, same layout
    pub fn sample_neighborhood<const N: usize>(&self, points: &Neighborhood<N>) -> [[f64; N]; N] {
        std::array::from_fn(|row| std::array::from_fn(|col| self.sample(points.get(row, col))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> ElevationSampler {
        ElevationSampler::new(
            Rect::new(Point2D::new(0.0, 0.0), Point2D::new(4.0, 4.0)),
            Rect::new(Point2D::new(-1.0, 10.0), Point2D::new(1.0, 20.0)),
            Box::new(|x: f64, y: f64| x + y),
        )
    }

    #[test]
    fn test_remap_into_control_space() {
        let s = sampler();

        assert_eq!(s.to_control_space(Point2D::new(0.0, 0.0)), Point2D::new(-1.0, 10.0));
        assert_eq!(s.to_control_space(Point2D::new(4.0, 4.0)), Point2D::new(1.0, 20.0));
        let mid = s.to_control_space(Point2D::new(2.0, 1.0));
        assert!((mid.x - 0.0).abs() < 1e-12);
        assert!((mid.y - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_sample_calls_control_function() {
        let s = sampler();

        assert!((s.sample(Point2D::new(2.0, 1.0)) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_sample_neighborhood_keeps_layout() {
        let s = sampler();
        let points = Neighborhood::<3>::from_fn(|row, col| Point2D::new(col as f64, row as f64));
        let elevations = s.sample_neighborhood(&points);

        assert_eq!(elevations[1][2], s.sample(Point2D::new(2.0, 1.0)));
        assert_eq!(elevations[2][0], s.sample(Point2D::new(0.0, 2.0)));
    }
}
