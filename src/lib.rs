//! Branching network noise
//!
//! Deterministic fractal drainage and discharge patterns evaluated as a scalar
//! field over the plane. Re-exports modules for use by the binary and tools.

pub mod control;
pub mod geometry;
pub mod network;
pub mod params;
pub mod raster;

pub use control::{ControlFunction, ControlFunctionKind};
pub use network::{BranchNoise, LocalContext};
pub use params::{ConfigError, NoiseParams, NoisePreset, Rect};
