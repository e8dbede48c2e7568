use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use branch_noise::raster::{self, RasterOptions, RasterError};
use branch_noise::{BranchNoise, NoiseParams, NoisePreset};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// River network over Perlin terrain
    Terrain,
    /// Branching discharge towards the center
    Lichtenberg,
}

impl From<Preset> for NoisePreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Terrain => NoisePreset::Terrain,
            Preset::Lichtenberg => NoisePreset::Lichtenberg,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "branch_noise")]
#[command(about = "Render branching network noise to a 16-bit grayscale image")]
struct Args {
    /// Reference configuration to start from
    #[arg(value_enum, default_value = "terrain")]
    preset: Preset,

    /// Load engine parameters from a JSON file instead of the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width of the image in pixels
    #[arg(short = 'W', long, default_value = "512")]
    width: u32,

    /// Height of the image in pixels
    #[arg(short = 'H', long, default_value = "512")]
    height: u32,

    /// Global seed (overrides preset/config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Jitter margin in (0, 0.5) (overrides preset/config)
    #[arg(long)]
    eps: Option<f64>,

    /// Overlay generator points
    #[arg(long)]
    points: bool,

    /// Overlay segment centerlines
    #[arg(long)]
    segments: bool,

    /// Overlay the cell grid
    #[arg(long)]
    grid: bool,

    /// Output path (defaults to "<preset>.png")
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn build_params(args: &Args) -> Result<NoiseParams, RasterError> {
    let mut params = match &args.config {
        Some(path) => raster::load_params(path)?,
        None => NoiseParams::from_preset(args.preset.into()),
    };

    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(eps) = args.eps {
        params.eps = eps;
    }
    params.display_points |= args.points;
    params.display_segments |= args.segments;
    params.display_grid |= args.grid;

    Ok(params)
}

fn run(args: Args) -> Result<(), RasterError> {
    let preset: NoisePreset = args.preset.into();
    let params = build_params(&args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", preset)));

    println!("Rendering {} ({})", preset, preset.description());
    println!("Image size: {}x{}", args.width, args.height);
    println!("Seed: {}, eps: {}, control: {}", params.seed, params.eps, params.control);

    let start = Instant::now();
    let engine = BranchNoise::new(params)?;
    println!("Engine ready: {:?}", start.elapsed());

    let start = Instant::now();
    let opts = RasterOptions::for_params(engine.params(), args.width, args.height);
    let grid = raster::evaluate_grid(&engine, &opts)?;
    let (lo, hi) = grid.range();
    println!("Evaluated {} pixels in {:?}", args.width as u64 * args.height as u64, start.elapsed());
    println!("Value range: {:.4} to {:.4}", lo, hi);

    raster::write_png(&grid, &output)?;
    println!("Saved {}", output.display());

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
