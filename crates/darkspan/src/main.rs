//! darkspan: measure the thickness of dark bands in an image.
//!
//! Loads an image and measures every dark region crossed by a straight
//! line between two points, in pixels and in a physical unit. Two modes:
//!
//! - **One-shot**: `--from X,Y --to X,Y` measures a single segment.
//! - **Clicks**: without `--from`/`--to`, click coordinates are read from
//!   stdin, one `X Y` (or `X,Y`) per line. Every second accepted click
//!   completes a segment and prints its measurement.
//!
//! # Usage
//!
//! ```text
//! darkspan [OPTIONS] <IMAGE_PATH>
//! RUST_LOG=debug darkspan section.png --from 10,40 --to 90,40
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod input;
mod report;

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use darkspan_core::decode::decode_normalized;
use darkspan_core::{
    ClickOutcome, ClickSession, IgnoreReason, MeasureConfig, MeasureReport, OpenRegionPolicy,
    Point, PointerEvent, Rgba32FImage,
};

// Bounds of `--samples`, checked again by `MeasureConfig::validate`.
#[allow(clippy::cast_possible_truncation)]
const MIN_SAMPLES: u64 = MeasureConfig::MIN_SAMPLE_COUNT as u64;
#[allow(clippy::cast_possible_truncation)]
const MAX_SAMPLES: u64 = MeasureConfig::MAX_SAMPLE_COUNT as u64;

/// Measure dark bands along a line in an image.
///
/// Samples the segment between two points, finds each contiguous dark
/// region on it, and reports its length in pixels and physical units.
#[derive(Parser)]
#[command(name = "darkspan", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Segment start as `X,Y` in pixels. Requires `--to`.
    #[arg(long, value_parser = input::parse_point, requires = "to", allow_hyphen_values = true)]
    from: Option<Point>,

    /// Segment end as `X,Y` in pixels. Requires `--from`.
    #[arg(long, value_parser = input::parse_point, requires = "from", allow_hyphen_values = true)]
    to: Option<Point>,

    /// Number of samples along the segment, including both endpoints.
    #[arg(
        long,
        default_value_t = MeasureConfig::DEFAULT_SAMPLE_COUNT,
        value_parser = RangedU64ValueParser::<usize>::new().range(MIN_SAMPLES..=MAX_SAMPLES),
    )]
    samples: usize,

    /// Darkness threshold: a pixel is dark when red, green and blue are
    /// all below this normalized intensity (0.0-1.0).
    #[arg(long, default_value_t = MeasureConfig::DEFAULT_DARKNESS_THRESHOLD)]
    threshold: f32,

    /// Physical units per pixel.
    #[arg(long, default_value_t = MeasureConfig::DEFAULT_UNIT_SCALE)]
    unit_scale: f64,

    /// Name of the physical unit, used in text output.
    #[arg(long, default_value = "micrometers")]
    unit: String,

    /// What to do with a dark region that reaches the end point.
    #[arg(long, value_enum, default_value_t = OpenRegions::Drop)]
    open_regions: OpenRegions,

    /// Full measurement config as a JSON string.
    ///
    /// When provided, `--samples`, `--threshold`, `--unit-scale` and
    /// `--open-regions` are ignored. Missing fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Print reports as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Trailing-region policy selection.
#[derive(Clone, Copy, ValueEnum)]
enum OpenRegions {
    /// Ignore a dark region that is still open at the end point.
    Drop,
    /// Report it separately, measured one sample spacing past the end point.
    Report,
}

/// Build a [`MeasureConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<MeasureConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        MeasureConfig {
            sample_count: cli.samples,
            darkness_threshold: cli.threshold,
            unit_scale: cli.unit_scale,
            open_region: match cli.open_regions {
                OpenRegions::Drop => OpenRegionPolicy::Drop,
                OpenRegions::Report => OpenRegionPolicy::Report,
            },
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let image = match decode_normalized(&image_bytes) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error decoding {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "image {} ({}x{}, {} bytes)",
        cli.image_path.display(),
        image.width(),
        image.height(),
        image_bytes.len(),
    );
    log::info!("config: {config:?}");

    match (cli.from, cli.to) {
        (Some(from), Some(to)) => run_once(&image, from, to, &config, &cli),
        _ => run_clicks(&image, config, &cli),
    }
}

/// Measure a single segment given on the command line.
fn run_once(
    image: &Rgba32FImage,
    from: Point,
    to: Point,
    config: &MeasureConfig,
    cli: &Cli,
) -> ExitCode {
    match darkspan_core::measure(image, from, to, config) {
        Ok(report) => match print_report(&report, cli, true) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Measurement error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Drive a [`ClickSession`] from click coordinates on stdin.
fn run_clicks(image: &Rgba32FImage, config: MeasureConfig, cli: &Cli) -> ExitCode {
    eprintln!(
        "Reading clicks from stdin (one \"X Y\" per line). \
         Every two clicks measure the dark area between them."
    );

    let mut session = ClickSession::new(image, config);
    let stdin = std::io::stdin();

    for (index, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading stdin: {e}");
                return ExitCode::FAILURE;
            }
        };
        let position = match input::parse_click_line(&line) {
            None => continue,
            Some(Ok(point)) => point,
            Some(Err(msg)) => {
                eprintln!("line {}: {msg}", index + 1);
                continue;
            }
        };

        match session.handle(PointerEvent::primary(position)) {
            ClickOutcome::Ignored(IgnoreReason::OutsideImage) => {
                eprintln!(
                    "line {}: ({}, {}) is outside the {}x{} image, ignored",
                    index + 1,
                    position.x,
                    position.y,
                    image.width(),
                    image.height(),
                );
            }
            ClickOutcome::Ignored(reason) => {
                log::debug!("line {}: ignored ({reason:?})", index + 1);
            }
            ClickOutcome::Armed { first } => {
                eprintln!("First point at ({}, {}).", first.x, first.y);
            }
            ClickOutcome::Measured { result, .. } => match result {
                Ok(report) => {
                    if let Err(e) = print_report(&report, cli, false) {
                        eprintln!("Error serializing report: {e}");
                        return ExitCode::FAILURE;
                    }
                }
                Err(e) => eprintln!("Measurement error: {e}"),
            },
        }
    }

    if let darkspan_core::ClickPhase::AwaitingSecond { first } = session.phase() {
        eprintln!(
            "Input ended with an unpaired point at ({}, {}).",
            first.x, first.y
        );
    }

    ExitCode::SUCCESS
}

/// Print one report to stdout as text or JSON.
///
/// Click mode prints compact JSON so every report stays on one line.
fn print_report(report: &MeasureReport, cli: &Cli, pretty: bool) -> Result<(), serde_json::Error> {
    log::info!(
        "({}, {}) -> ({}, {}): {} of {} samples dark",
        report.from.x,
        report.from.y,
        report.to.x,
        report.to.y,
        report.dark_samples,
        report.sample_count,
    );
    if cli.json {
        let json = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        println!("{json}");
    } else {
        println!("{}", report::render(report, &cli.unit));
    }
    Ok(())
}
