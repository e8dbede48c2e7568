//! Noise engine parameters, presets and validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::ControlFunctionKind;
use crate::geometry::Point2D;

/// Errors raised when an engine is built from invalid parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("jitter margin eps must lie in (0, 0.5), got {0}")]
    InvalidEps(f64),
    #[error("{name} rectangle is degenerate: top-left {top_left:?}, bottom-right {bottom_right:?}")]
    DegenerateRect {
        name: &'static str,
        top_left: Point2D,
        bottom_right: Point2D,
    },
}

/// Axis-aligned rectangle given by its top-left and bottom-right corners
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top_left: Point2D,
    pub bottom_right: Point2D,
}

impl Rect {
    pub const fn new(top_left: Point2D, bottom_right: Point2D) -> Self {
        Self { top_left, bottom_right }
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// Corners are finite and strictly ordered on both axes
    pub fn is_well_formed(&self) -> bool {
        let corners = [self.top_left.x, self.top_left.y, self.bottom_right.x, self.bottom_right.y];
        corners.iter().all(|c| c.is_finite())
            && self.top_left.x < self.bottom_right.x
            && self.top_left.y < self.bottom_right.y
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.is_well_formed() {
            Ok(())
        } else {
            Err(ConfigError::DegenerateRect {
                name,
                top_left: self.top_left,
                bottom_right: self.bottom_right,
            })
        }
    }
}

// =============================================================================
// PRESETS
// =============================================================================

/// Reference configurations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NoisePreset {
    /// Drainage network over Perlin terrain
    #[default]
    Terrain,
    /// Discharge figure converging on the center
    Lichtenberg,
}

impl NoisePreset {
    pub fn all() -> &'static [Self] {
        &[Self::Terrain, Self::Lichtenberg]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Terrain => "River network over Perlin terrain",
            Self::Lichtenberg => "Branching discharge towards the center",
        }
    }
}

impl std::fmt::Display for NoisePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terrain => write!(f, "terrain"),
            Self::Lichtenberg => write!(f, "lichtenberg"),
        }
    }
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Engine configuration, immutable once the engine is built
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Query-space rectangle, mapped onto `control_rect`
    pub noise_rect: Rect,
    /// Control-function-space rectangle
    pub control_rect: Rect,
    /// Global seed mixed into every cell's point
    pub seed: u64,
    /// Minimum distance between a jittered point and its cell edges, in (0, 0.5)
    pub eps: f64,
    /// Overlay generator points and midpoints
    pub display_points: bool,
    /// Overlay segment centerlines
    pub display_segments: bool,
    /// Overlay the cell grid
    pub display_grid: bool,
    /// Elevation source
    pub control: ControlFunctionKind,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self::from_preset(NoisePreset::Terrain)
    }
}

impl NoiseParams {
    pub fn from_preset(preset: NoisePreset) -> Self {
        match preset {
            NoisePreset::Terrain => Self {
                noise_rect: Rect::new(Point2D::new(0.0, 0.0), Point2D::new(4.0, 4.0)),
                control_rect: Rect::new(Point2D::new(0.0, 0.0), Point2D::new(0.5, 0.5)),
                seed: 0,
                eps: 0.15,
                display_points: false,
                display_segments: false,
                display_grid: false,
                control: ControlFunctionKind::Perlin { seed: 0 },
            },
            NoisePreset::Lichtenberg => Self {
                noise_rect: Rect::new(Point2D::new(-2.0, -2.0), Point2D::new(2.0, 2.0)),
                control_rect: Rect::new(Point2D::new(-1.0, -1.0), Point2D::new(1.0, 1.0)),
                seed: 0,
                eps: 0.1,
                display_points: false,
                display_segments: true,
                display_grid: false,
                control: ControlFunctionKind::Lichtenberg { seed: 0 },
            },
        }
    }

    /// Check eps and both rectangles
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.eps > 0.0 && self.eps < 0.5) {
            return Err(ConfigError::InvalidEps(self.eps));
        }
        self.noise_rect.validate("noise")?;
        self.control_rect.validate("control function")?;
        Ok(())
    }
}
