//! chizu-bench: CLI tool for stylization parameter experimentation and
//! diagnostics.
//!
//! Runs the pixel-art pipeline on a given image file with configurable
//! parameters, printing detailed per-stage diagnostics. Useful for:
//!
//! - Comparing themes and dither/edge/tone settings on real captures
//! - Measuring per-stage durations to identify bottlenecks
//! - Producing reference outputs (`--out`) while tuning
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin chizu-bench -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use chizu_pipeline::diagnostics::{PipelineDiagnostics, process_with_diagnostics};
use chizu_pipeline::{EdgeMode, ProcessingOptions};

/// Stylization parameter experimentation and diagnostics for chizu.
///
/// Runs the pixel-art pipeline on a given image with configurable
/// parameters and prints detailed per-stage timing and count
/// diagnostics.
#[derive(Parser)]
#[command(name = "chizu-bench", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    #[arg(required_unless_present = "list_presets")]
    image_path: Option<PathBuf>,

    /// Theme id (see chizu-themes; unknown ids list the registry).
    #[arg(long, default_value = chizu_themes::DEFAULT_THEME_ID)]
    theme: String,

    /// Low-resolution width in pixels.
    #[arg(long, default_value_t = ProcessingOptions::DEFAULT_PIXELATION_SIZE, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    pixelation_size: u32,

    /// Output width in pixels.
    #[arg(long, default_value_t = ProcessingOptions::DEFAULT_OUTPUT_RESOLUTION, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    output_resolution: u32,

    /// Crop aspect ratio (width / height).
    #[arg(long, default_value_t = ProcessingOptions::DEFAULT_ASPECT_RATIO)]
    aspect_ratio: f64,

    /// Ordered-dither strength (0.0 - 1.0).
    #[arg(long, default_value_t = ProcessingOptions::DEFAULT_DITHER_INTENSITY)]
    dither: f32,

    /// Edge darkening mode.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_EDGE)]
    edge: Edge,

    /// Contrast multiplier (1.0 = unchanged).
    #[arg(long, default_value_t = ProcessingOptions::DEFAULT_CONTRAST)]
    contrast: f32,

    /// Saturation multiplier (1.0 = unchanged, 0.0 = grayscale).
    #[arg(long, default_value_t = ProcessingOptions::DEFAULT_SATURATION)]
    saturation: f32,

    /// Write the themed PNG to this path (first run only).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Run only the crop + pixelation stage, skipping theming.
    #[arg(long)]
    pixelate_only: bool,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Full options as a JSON string.
    ///
    /// When provided, the individual parameter flags are ignored. The
    /// JSON must be a valid `ProcessingOptions` serialization.
    #[arg(long)]
    options_json: Option<String>,

    /// Print the app's preset value tables and exit.
    #[arg(long)]
    list_presets: bool,
}

/// Edge darkening mode selection.
#[derive(Clone, Copy, ValueEnum)]
enum Edge {
    /// No edge enhancement.
    None,
    /// Subtle edge definition.
    Soft,
    /// Bold outlines.
    Strong,
    /// Adaptive edge detection.
    Selective,
}

/// Maps a pipeline [`EdgeMode`] to the local CLI [`Edge`] enum.
const fn edge_from_pipeline(mode: EdgeMode) -> Edge {
    match mode {
        EdgeMode::None => Edge::None,
        EdgeMode::Soft => Edge::Soft,
        EdgeMode::Strong => Edge::Strong,
        EdgeMode::Selective => Edge::Selective,
    }
}

/// The CLI default edge mode, derived from
/// [`ProcessingOptions::DEFAULT_EDGE_MODE`] so the two cannot silently
/// diverge.
const CLI_DEFAULT_EDGE: Edge = edge_from_pipeline(ProcessingOptions::DEFAULT_EDGE_MODE);

/// Build [`ProcessingOptions`] from CLI arguments.
///
/// If `--options-json` is provided, the JSON is parsed directly and
/// all individual parameter flags are ignored.
fn options_from_cli(cli: &Cli) -> Result<ProcessingOptions, String> {
    if let Some(ref json) = cli.options_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --options-json: {e}"));
    }

    Ok(ProcessingOptions {
        pixelation_size: cli.pixelation_size,
        output_resolution: cli.output_resolution,
        aspect_ratio: cli.aspect_ratio,
        dither_intensity: cli.dither,
        edge_mode: match cli.edge {
            Edge::None => EdgeMode::None,
            Edge::Soft => EdgeMode::Soft,
            Edge::Strong => EdgeMode::Strong,
            Edge::Selective => EdgeMode::Selective,
        },
        contrast: cli.contrast,
        saturation: cli.saturation,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_presets {
        print_presets();
        return ExitCode::SUCCESS;
    }

    let options = match options_from_cli(&cli) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let Some(theme) = chizu_themes::theme_by_id(&cli.theme) else {
        eprintln!("Unknown theme {:?}. Available themes:", cli.theme);
        for theme in chizu_themes::all_themes() {
            eprintln!(
                "  {:<14} {} ({} colors)",
                theme.id,
                theme.description,
                theme.palette.len(),
            );
        }
        return ExitCode::FAILURE;
    };

    // required_unless_present guarantees the path whenever we get here.
    let Some(ref image_path) = cli.image_path else {
        eprintln!("Missing <IMAGE_PATH>");
        return ExitCode::FAILURE;
    };
    let image_bytes = match std::fs::read(image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", image_path.display());
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Image: {} ({} bytes)",
        image_path.display(),
        image_bytes.len(),
    );
    eprintln!("Theme: {} ({} colors)", theme.name, theme.palette.len());
    eprintln!("Options: {options:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    if cli.pixelate_only {
        return run_pixelate_only(&cli, &image_bytes, &options);
    }

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        match process_with_diagnostics(&image_bytes, &theme.palette, &options) {
            Ok((encoded, diagnostics)) => {
                if cli.json {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", diagnostics.report());
                }

                // Write output on the first run only.
                if run == 0
                    && let Some(ref out_path) = cli.out
                    && let Err(e) = write_output(out_path, &encoded)
                {
                    eprintln!("{e}");
                }

                all_diagnostics.push(diagnostics);
            }
            Err(e) => {
                eprintln!("Pipeline error: {e}");
                return ExitCode::FAILURE;
            }
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// The `--pixelate-only` path: geometry stage without theming.
fn run_pixelate_only(cli: &Cli, image_bytes: &[u8], options: &ProcessingOptions) -> ExitCode {
    let start = std::time::Instant::now();
    match chizu_pipeline::pixelate(
        image_bytes,
        options.pixelation_size,
        options.output_resolution,
        options.aspect_ratio,
    ) {
        Ok(encoded) => {
            println!(
                "Pixelated in {:.3}ms ({} bytes)",
                start.elapsed().as_secs_f64() * 1000.0,
                encoded.len(),
            );
            if let Some(ref out_path) = cli.out
                && let Err(e) = write_output(out_path, &encoded)
            {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Write encoded output bytes, reporting the path and size.
fn write_output(path: &Path, encoded: &[u8]) -> Result<(), String> {
    std::fs::write(path, encoded)
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    eprintln!("Output written to {} ({} bytes)", path.display(), encoded.len());
    Ok(())
}

/// Print the preset value tables the capture app offers.
fn print_presets() {
    use chizu_pipeline::presets;

    println!("Aspect ratios:");
    for (label, ratio) in presets::ASPECT_RATIOS {
        println!("  {label:<6} {ratio:.4}");
    }
    println!("Pixelation sizes:   {:?}", presets::PIXELATION_SIZES);
    println!("Output resolutions: {:?}", presets::OUTPUT_RESOLUTIONS);
    println!("Dither intensities: {:?}", presets::DITHER_INTENSITIES);
    println!("Contrast levels:    {:?}", presets::CONTRAST_LEVELS);
    println!("Saturation levels:  {:?}", presets::SATURATION_LEVELS);
    println!();
    println!("Themes:");
    for theme in chizu_themes::all_themes() {
        println!(
            "  {:<14} {} ({} colors)",
            theme.id,
            theme.description,
            theme.palette.len(),
        );
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&PipelineDiagnostics) -> Option<std::time::Duration>;

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[PipelineDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    println!();
    println!("{:<16} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(30));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Decode", |d| Some(d.decode.duration)),
        ("Pixelate", |d| Some(d.pixelate.duration)),
        ("Tone", |d| d.tone.as_ref().map(|s| s.duration)),
        ("Edge", |d| d.edge.as_ref().map(|s| s.duration)),
        ("Posterize", |d| Some(d.posterize.duration)),
        ("Extract", |d| Some(d.extract.duration)),
        ("Map", |d| Some(d.map.duration)),
        ("Encode", |d| Some(d.encode.duration)),
    ];

    for (name, extractor) in stage_extractors {
        let stage_durations: Vec<f64> = all_diagnostics
            .iter()
            .filter_map(extractor)
            .map(|dur| dur.as_secs_f64() * 1000.0)
            .collect();

        if stage_durations.is_empty() {
            continue;
        }

        let stage_mean = stage_durations.iter().sum::<f64>() / stage_durations.len() as f64;
        println!("{name:<16} {stage_mean:>10.3}ms");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_pipeline_defaults() {
        let cli = Cli::parse_from(["chizu-bench", "capture.png"]);
        let options = options_from_cli(&cli).unwrap();
        assert_eq!(options, ProcessingOptions::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "chizu-bench",
            "capture.png",
            "--pixelation-size",
            "64",
            "--dither",
            "0.7",
            "--edge",
            "strong",
            "--saturation",
            "0",
        ]);
        let options = options_from_cli(&cli).unwrap();
        assert_eq!(options.pixelation_size, 64);
        assert!((options.dither_intensity - 0.7).abs() < f32::EPSILON);
        assert_eq!(options.edge_mode, EdgeMode::Strong);
        assert!((options.saturation - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn options_json_overrides_flags() {
        let json = serde_json::to_string(&ProcessingOptions {
            pixelation_size: 16,
            ..ProcessingOptions::default()
        })
        .unwrap();
        let cli = Cli::parse_from([
            "chizu-bench",
            "capture.png",
            "--pixelation-size",
            "64",
            "--options-json",
            &json,
        ]);
        let options = options_from_cli(&cli).unwrap();
        assert_eq!(options.pixelation_size, 16);
    }

    #[test]
    fn bad_options_json_is_an_error() {
        let cli = Cli::parse_from(["chizu-bench", "capture.png", "--options-json", "{nope"]);
        assert!(options_from_cli(&cli).is_err());
    }

    #[test]
    fn zero_pixelation_size_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from(["chizu-bench", "capture.png", "--pixelation-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn list_presets_needs_no_image_path() {
        let cli = Cli::try_parse_from(["chizu-bench", "--list-presets"]).unwrap();
        assert!(cli.list_presets);
        assert!(cli.image_path.is_none());

        let missing_path = Cli::try_parse_from(["chizu-bench"]);
        assert!(missing_path.is_err());
    }
}
