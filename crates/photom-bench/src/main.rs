//! photom-bench: CLI tool for scan-pattern parameter experimentation and
//! diagnostics.
//!
//! Loads one or more ROI boundaries from a JSON file, applies a pattern
//! with configurable parameters, and prints per-shape diagnostics.
//! Useful for:
//!
//! - Comparing traversal strategies (`raster` vs `lattice-bfs`)
//! - Tuning spacing, point counts and the minimum gap
//! - Seeing which warnings a parameter set triggers
//! - Previewing the result as SVG, or dry-running the mirror path
//!
//! The boundary file holds either one boundary or a list of them, each a
//! list of `{"x": .., "y": ..}` points.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin photom-bench -- [OPTIONS] <BOUNDARY_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::convert::Infallible;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use photom_pattern::{
    AffineTransform, Axis, BidirectionalParams, BidirectionalStrategy, EngineConfig,
    MirrorActuator, PatternSpec, Point, RunOptions, ShapeCollection, SpiralParams,
    SpiralSampling, ThreadPacer, Warnings,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Scan-pattern parameter experimentation and diagnostics for photom.
///
/// Applies a bidirectional or spiral pattern to every boundary in the
/// input file and prints point counts, generator metrics and warnings.
#[derive(Parser)]
#[command(name = "photom-bench", version)]
struct Cli {
    /// Path to the boundary JSON file.
    boundary_path: PathBuf,

    /// Pattern to apply.
    #[arg(long, value_enum, default_value_t = Pattern::Bidirectional)]
    pattern: Pattern,

    /// Horizontal lattice spacing in pixels (bidirectional only).
    ///
    /// Taken as text, like the GUI field: anything but a positive integer
    /// falls back to the minimum gap with a warning.
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    horizontal_spacing: String,

    /// Vertical lattice spacing in pixels (bidirectional only).
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    vertical_spacing: String,

    /// Target number of ablation points. Empty means no limit.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    points: String,

    /// Lattice traversal strategy.
    #[arg(long, value_enum, default_value_t = Strategy::Raster)]
    strategy: Strategy,

    /// Spiral sampling mode.
    #[arg(long, value_enum, default_value_t = Sampling::Resampled)]
    sampling: Sampling,

    /// Minimum distance between scan points in pixels.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_MINIMUM_GAP)]
    minimum_gap: f64,

    /// Lower bound on spiral turns.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_INITIAL_TURNS)]
    initial_turns: u32,

    /// Parametric samples along the spiral.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_SPIRAL_SAMPLES)]
    spiral_samples: usize,

    /// Full engine config as a JSON string.
    ///
    /// When provided, `--strategy`, `--sampling`, `--minimum-gap`,
    /// `--initial-turns` and `--spiral-samples` are ignored. Missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Write an SVG preview to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// SVG canvas width in pixels (defaults to fit the shapes).
    #[arg(long)]
    width: Option<u32>,

    /// SVG canvas height in pixels (defaults to fit the shapes).
    #[arg(long)]
    height: Option<u32>,

    /// Dry-run the mirror path, logging every target.
    #[arg(long)]
    simulate: bool,

    /// Pause between mirror moves in seconds when simulating.
    #[arg(long, default_value_t = RunOptions::DEFAULT_DELAY_SECS)]
    delay: f64,

    /// Pixel-to-mirror affine matrix `a,b,tx,c,d,ty` used when simulating.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    affine: Option<Vec<f64>>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output pattern results as JSON instead of human-readable reports.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (`-v` debug, `-vv` trace). `RUST_LOG`
    /// takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Pattern selection.
#[derive(Clone, Copy, ValueEnum)]
enum Pattern {
    /// Rectangular lattice fill.
    Bidirectional,
    /// Archimedean spiral.
    Spiral,
}

/// Lattice traversal selection.
#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Row-by-row snake sweep.
    Raster,
    /// Breadth-first expansion from the centre.
    LatticeBfs,
}

/// Spiral sampling selection.
#[derive(Clone, Copy, ValueEnum)]
enum Sampling {
    /// Arc-length resampling to the requested count.
    Resampled,
    /// Every in-polygon sample.
    AllInPolygon,
}

/// Boundary file contents.
#[derive(Deserialize)]
#[serde(untagged)]
enum BoundaryFile {
    One(Vec<Point>),
    Many(Vec<Vec<Point>>),
}

impl BoundaryFile {
    fn into_boundaries(self) -> Vec<Vec<Point>> {
        match self {
            Self::One(points) => vec![points],
            Self::Many(shapes) => shapes,
        }
    }
}

/// Install the `tracing` subscriber on stderr.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build an [`EngineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual config flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<EngineConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        EngineConfig {
            minimum_gap: cli.minimum_gap,
            initial_turns: cli.initial_turns,
            spiral_samples: cli.spiral_samples,
            bidirectional_strategy: match cli.strategy {
                Strategy::Raster => BidirectionalStrategy::Raster,
                Strategy::LatticeBfs => BidirectionalStrategy::LatticeBfs,
            },
            spiral_sampling: match cli.sampling {
                Sampling::Resampled => SpiralSampling::Resampled,
                Sampling::AllInPolygon => SpiralSampling::AllInPolygon,
            },
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Build the [`PatternSpec`] from the text parameters.
///
/// Input problems are reported on stderr and replaced, never fatal.
fn spec_from_cli(cli: &Cli, config: &EngineConfig) -> PatternSpec {
    let mut warnings = Warnings::new();
    let target_point_count = photom_pattern::parse_point_count(&cli.points, &mut warnings);
    let spec = match cli.pattern {
        Pattern::Bidirectional => PatternSpec::Bidirectional(BidirectionalParams {
            horizontal_spacing: photom_pattern::parse_spacing(
                &cli.horizontal_spacing,
                Axis::Horizontal,
                config,
                &mut warnings,
            ),
            vertical_spacing: photom_pattern::parse_spacing(
                &cli.vertical_spacing,
                Axis::Vertical,
                config,
                &mut warnings,
            ),
            target_point_count,
        }),
        Pattern::Spiral => PatternSpec::Spiral(SpiralParams { target_point_count }),
    };
    for w in warnings.as_slice() {
        eprintln!("Input: {w}");
    }
    spec
}

/// Smallest canvas holding every shape, with a small margin.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_canvas(shapes: &ShapeCollection) -> photom_export::Dimensions {
    let (w, h) = shapes
        .iter()
        .map(|t| t.polygon().bounding_box())
        .fold((0.0_f64, 0.0_f64), |(w, h), b| (w.max(b.max_x), h.max(b.max_y)));
    photom_export::Dimensions {
        width: (w + 10.0).ceil().max(1.0) as u32,
        height: (h + 10.0).ceil().max(1.0) as u32,
    }
}

/// Mirror stand-in that logs each target.
struct LogMirror;

impl MirrorActuator for LogMirror {
    type Error = Infallible;

    fn move_to(&mut self, target: Point) -> Result<(), Infallible> {
        tracing::info!(x = target.x, y = target.y, "mirror");
        Ok(())
    }
}

#[allow(clippy::too_many_lines)]
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let text = match std::fs::read_to_string(&cli.boundary_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.boundary_path.display());
            return ExitCode::FAILURE;
        }
    };
    let boundaries = match serde_json::from_str::<BoundaryFile>(&text) {
        Ok(file) => file.into_boundaries(),
        Err(e) => {
            eprintln!("Error parsing {}: {e}", cli.boundary_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut shapes = ShapeCollection::new();
    for (i, boundary) in boundaries.into_iter().enumerate() {
        if let Err(e) = shapes.insert(boundary) {
            eprintln!("Boundary {i}: {e}");
            return ExitCode::FAILURE;
        }
    }

    let spec = spec_from_cli(&cli, &config);

    eprintln!(
        "Boundaries: {} ({} shapes)",
        cli.boundary_path.display(),
        shapes.len(),
    );
    eprintln!("Pattern: {spec:?}");
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut durations = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        let start = Instant::now();
        for trace in shapes.iter_mut() {
            if let Err(e) = trace.apply_pattern(&spec, &config) {
                eprintln!("Pattern error on shape {}: {e}", trace.id());
                return ExitCode::FAILURE;
            }
        }
        durations.push(start.elapsed());

        // Report on the first run only.
        if run > 0 {
            continue;
        }
        if cli.json {
            let results: Vec<_> = shapes
                .iter()
                .map(|t| serde_json::json!({ "shape": t.id().0, "output": t.output() }))
                .collect();
            match serde_json::to_string_pretty(&results) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing results: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            for trace in &shapes {
                if let Some(output) = trace.output() {
                    println!("Shape {}", trace.id());
                    println!("{}", output.report());
                    println!();
                }
            }
        }
    }

    if let Some(ref svg_path) = cli.svg {
        let fitted = fit_canvas(&shapes);
        let dimensions = photom_export::Dimensions {
            width: cli.width.unwrap_or(fitted.width),
            height: cli.height.unwrap_or(fitted.height),
        };
        let title = cli
            .boundary_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("bench");
        let desc = format!("{spec:?}");
        let config_json = serde_json::to_string(&config).ok();
        let metadata = photom_export::SvgMetadata {
            title: Some(title),
            description: Some(&desc),
            config_json: config_json.as_deref(),
        };
        let svg = photom_export::to_svg(&shapes, dimensions, &metadata);
        match std::fs::write(svg_path, &svg) {
            Ok(()) => {
                eprintln!(
                    "SVG written to {} ({} bytes)",
                    svg_path.display(),
                    svg.len(),
                );
            }
            Err(e) => {
                eprintln!("Error writing SVG to {}: {e}", svg_path.display());
            }
        }
    }

    if cli.simulate {
        let options = match RunOptions::from_secs(cli.delay) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        };
        let transform = match cli.affine.as_deref() {
            None => AffineTransform::IDENTITY,
            Some(&[a, b, tx, c, d, ty]) => AffineTransform::new([[a, b, tx], [c, d, ty]]),
            Some(other) => {
                eprintln!("--affine needs 6 values, got {}", other.len());
                return ExitCode::FAILURE;
            }
        };
        for trace in &shapes {
            eprintln!(
                "Simulating shape {} ({} points)",
                trace.id(),
                trace.ablation_points().len(),
            );
            if let Err(e) = photom_pattern::run_trace(
                trace.ablation_points(),
                &transform,
                &mut LogMirror,
                &mut ThreadPacer,
                options,
            ) {
                eprintln!("Simulation error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&durations);
    }

    ExitCode::SUCCESS
}

/// Print aggregated timing across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(durations: &[Duration]) {
    debug_assert!(!durations.is_empty(), "no durations to summarize");

    println!();
    println!("Summary ({} runs)\n{}", durations.len(), "=".repeat(60));

    let ms: Vec<f64> = durations
        .iter()
        .map(|d| d.as_secs_f64() * 1000.0)
        .collect();

    let min = ms.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = ms.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = ms.iter().sum::<f64>() / ms.len().max(1) as f64;

    println!("Generation: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");
}
