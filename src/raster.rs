//! Raster driver: evaluates the engine once per pixel and writes 16-bit images.
//!
//! Rows are evaluated in parallel with rayon. The engine is read-only, so no
//! synchronization is needed beyond the split of the output buffer.

use std::path::Path;

use image::{ImageBuffer, Luma};
use rayon::prelude::*;
use thiserror::Error;

use crate::geometry::{remap, remap_clamp};
use crate::network::BranchNoise;
use crate::params::{ConfigError, NoiseParams, Rect};

/// Errors that can occur while rendering or loading a render job
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid parameters file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Empty raster: {width}x{height}")]
    EmptyRaster { width: u32, height: u32 },
}

/// Output size and the query-space region it covers
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    pub width: u32,
    pub height: u32,
    /// Query-space rectangle spanned by the image
    pub region: Rect,
    /// Clamp mapped coordinates into `region`
    pub clamp: bool,
}

impl RasterOptions {
    /// Cover the engine's noise rectangle
    pub fn for_params(params: &NoiseParams, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            region: params.noise_rect,
            clamp: true,
        }
    }

    /// Query-space coordinate of pixel (col, row)
    pub fn pixel_to_query(&self, col: u32, row: u32) -> (f64, f64) {
        let map = if self.clamp { remap_clamp } else { remap };
        let r = &self.region;
        (
            map(col as f64, 0.0, self.width as f64, r.top_left.x, r.bottom_right.x),
            map(row as f64, 0.0, self.height as f64, r.top_left.y, r.bottom_right.y),
        )
    }
}

/// Row-major grid of raw engine values
#[derive(Clone, Debug, PartialEq)]
pub struct ValueGrid {
    pub width: u32,
    pub height: u32,
    values: Vec<f64>,
}

impl ValueGrid {
    pub fn get(&self, col: u32, row: u32) -> f64 {
        self.values[self.index(col, row)]
    }

    fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Smallest and largest value
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Normalize min..max onto 0..65535. A flat grid maps to 0.
    pub fn to_image16(&self) -> ImageBuffer<Luma<u16>, Vec<u16>> {
        let (lo, hi) = self.range();
        let span = hi - lo;

        ImageBuffer::from_fn(self.width, self.height, |col, row| {
            let v = self.get(col, row);
            let level = if span > 0.0 {
                remap_clamp(v, lo, hi, 0.0, u16::MAX as f64)
            } else {
                0.0
            };
            Luma([level as u16])
        })
    }
}

/// Evaluate the engine at every pixel
pub fn evaluate_grid(engine: &BranchNoise, opts: &RasterOptions) -> Result<ValueGrid, RasterError> {
    if opts.width == 0 || opts.height == 0 {
        return Err(RasterError::EmptyRaster {
            width: opts.width,
            height: opts.height,
        });
    }

    let mut values = vec![0.0f64; opts.width as usize * opts.height as usize];
    values
        .par_chunks_mut(opts.width as usize)
        .enumerate()
        .for_each(|(row, line)| {
            for (col, value) in line.iter_mut().enumerate() {
                let (x, y) = opts.pixel_to_query(col as u32, row as u32);
                *value = engine.evaluate(x, y);
            }
        });

    Ok(ValueGrid {
        width: opts.width,
        height: opts.height,
        values,
    })
}

/// Normalize and save as a 16-bit grayscale image; format follows the extension
pub fn write_png(grid: &ValueGrid, path: impl AsRef<Path>) -> Result<(), RasterError> {
    grid.to_image16().save(path)?;
    Ok(())
}

/// Load engine parameters from a JSON file. Missing fields take defaults.
pub fn load_params(path: impl AsRef<Path>) -> Result<NoiseParams, RasterError> {
    let text = std::fs::read_to_string(path)?;
    let params: NoiseParams = serde_json::from_str(&text)?;
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2D;
    use crate::params::NoisePreset;

    fn small_engine() -> BranchNoise {
        BranchNoise::new(NoiseParams::from_preset(NoisePreset::Terrain)).unwrap()
    }

    #[test]
    fn test_pixel_mapping() {
        let params = NoiseParams::from_preset(NoisePreset::Terrain);
        let opts = RasterOptions::for_params(&params, 512, 256);

        assert_eq!(opts.pixel_to_query(0, 0), (0.0, 0.0));
        assert_eq!(opts.pixel_to_query(256, 128), (2.0, 2.0));

        let loose = RasterOptions {
            clamp: false,
            region: Rect::new(Point2D::new(-1.0, -1.0), Point2D::new(1.0, 1.0)),
            ..opts
        };
        assert_eq!(loose.pixel_to_query(1024, 0), (3.0, -1.0));
    }

    #[test]
    fn test_grid_matches_direct_evaluation() {
        let engine = small_engine();
        let opts = RasterOptions::for_params(engine.params(), 16, 12);
        let grid = evaluate_grid(&engine, &opts).unwrap();

        for &(col, row) in &[(0, 0), (15, 11), (7, 3), (2, 10)] {
            let (x, y) = opts.pixel_to_query(col, row);
            assert_eq!(grid.get(col, row).to_bits(), engine.evaluate(x, y).to_bits());
        }
    }

    #[test]
    fn test_empty_raster_rejected() {
        let engine = small_engine();
        let opts = RasterOptions::for_params(engine.params(), 0, 8);

        assert!(matches!(evaluate_grid(&engine, &opts), Err(RasterError::EmptyRaster { .. })));
    }

    #[test]
    fn test_normalization_spans_full_range() {
        let grid = ValueGrid {
            width: 3,
            height: 1,
            values: vec![0.25, 0.5, 0.75],
        };
        let img = grid.to_image16();

        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(2, 0)[0], u16::MAX);
        assert!(img.get_pixel(1, 0)[0] > 30000 && img.get_pixel(1, 0)[0] < 35000);

        let flat = ValueGrid {
            width: 2,
            height: 2,
            values: vec![0.4; 4],
        };
        assert!(flat.to_image16().pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_index_past_u32_range() {
        // 70000 x 70000 pixels overflow u32; indexing only, nothing allocated
        let grid = ValueGrid {
            width: 70_000,
            height: 70_000,
            values: Vec::new(),
        };
        assert_eq!(grid.index(69_999, 69_999), 69_999usize * 70_000 + 69_999);
        assert!(grid.index(69_999, 69_999) > u32::MAX as usize);
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.png");
        let engine = small_engine();
        let grid = evaluate_grid(&engine, &RasterOptions::for_params(engine.params(), 8, 8)).unwrap();

        write_png(&grid, &path).unwrap();
        let loaded = image::open(&path).unwrap().into_luma16();
        assert_eq!(loaded.dimensions(), (8, 8));
        assert_eq!(loaded, grid.to_image16());
    }

    #[test]
    fn test_load_params_validates() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, r#"{ "seed": 9, "control": { "kind": "plane", "dx": 0.1, "dy": 0.0 } }"#).unwrap();
        std::fs::write(&bad, r#"{ "eps": 0.9 }"#).unwrap();

        let params = load_params(&good).unwrap();
        assert_eq!(params.seed, 9);
        assert!(matches!(load_params(&bad), Err(RasterError::Config(ConfigError::InvalidEps(_)))));
        assert!(matches!(load_params(dir.path().join("missing.json")), Err(RasterError::Io(_))));
    }
}
