//! Control functions: the elevation sources that steer the branching network.
//!
//! The engine only sees the [`ControlFunction`] trait. Concrete variants are
//! chosen once, at construction, through [`ControlFunctionKind`].

use noise::{NoiseFn, Perlin, Seedable};
use serde::{Deserialize, Serialize};

/// Elevation source queried in control-function space.
///
/// Implementations must be pure and deterministic over the whole plane, and
/// safe to call from many threads at once. Returned values are expected to
/// lie in [0, 1].
pub trait ControlFunction: Send + Sync {
    fn evaluate(&self, x: f64, y: f64) -> f64;
}

impl<F> ControlFunction for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

// =============================================================================
// VARIANTS
// =============================================================================

/// Perlin noise remapped from [-1, 1] to [0, 1]
pub struct PerlinControl {
    noise: Perlin,
}

impl PerlinControl {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(1).set_seed(seed),
        }
    }
}

impl ControlFunction for PerlinControl {
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        ((self.noise.get([x, y]) + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

/// Tilted plane `0.5 + dx*x + dy*y`, clamped to [0, 1].
///
/// Every branch drains down the slope, which makes the network easy to
/// reason about in tests.
pub struct PlaneControl {
    pub dx: f64,
    pub dy: f64,
}

impl ControlFunction for PlaneControl {
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        (0.5 + self.dx * x + self.dy * y).clamp(0.0, 1.0)
    }
}

/// Radial well centered on the control-space origin.
///
/// The network converges on the center like a discharge figure. A faint
/// Perlin perturbation breaks the radial symmetry so branches fork.
pub struct LichtenbergControl {
    noise: Perlin,
}

/// Amplitude of the perturbation added to the radial well
const LICHTENBERG_PERTURBATION: f64 = 0.05;
/// Frequency of the perturbation
const LICHTENBERG_FREQUENCY: f64 = 4.0;

impl LichtenbergControl {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(1).set_seed(seed),
        }
    }
}

impl ControlFunction for LichtenbergControl {
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        let radius = (x * x + y * y).sqrt() / std::f64::consts::SQRT_2;
        let wobble = self.noise.get([x * LICHTENBERG_FREQUENCY, y * LICHTENBERG_FREQUENCY]);
        (radius + LICHTENBERG_PERTURBATION * wobble).clamp(0.0, 1.0)
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// Which control function an engine is built with
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlFunctionKind {
    Perlin { seed: u32 },
    Plane { dx: f64, dy: f64 },
    Lichtenberg { seed: u32 },
}

impl Default for ControlFunctionKind {
    fn default() -> Self {
        Self::Perlin { seed: 0 }
    }
}

impl ControlFunctionKind {
    /// Instantiate the selected variant
    pub fn build(&self) -> Box<dyn ControlFunction> {
        match *self {
            Self::Perlin { seed } => Box::new(PerlinControl::new(seed)),
            Self::Plane { dx, dy } => Box::new(PlaneControl { dx, dy }),
            Self::Lichtenberg { seed } => Box::new(LichtenbergControl::new(seed)),
        }
    }
}

impl std::fmt::Display for ControlFunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perlin { seed } => write!(f, "perlin (seed {})", seed),
            Self::Plane { dx, dy } => write!(f, "plane ({}, {})", dx, dy),
            Self::Lichtenberg { seed } => write!(f, "lichtenberg (seed {})", seed),
        }
    }
}
