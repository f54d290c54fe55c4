//! Pipeline diagnostics: timing, counts, and per-stage metrics.
//!
//! Permanent instrumentation for parameter experimentation: every call
//! to [`process_with_diagnostics`] collects metrics alongside the
//! encoded result. The bench CLI prints these as a table or JSON.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::map::ColorMapping;
use crate::types::{Palette, PipelineError, ProcessingOptions};
use crate::{codec, crop, edge, map, palette, posterize, tone};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
///
/// Conditionally skipped stages (tone at identity parameters, edge at
/// `EdgeMode::None`) have `Option` fields that are `None` when the
/// stage did not execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 1: image decoding.
    pub decode: StageDiagnostics,
    /// Stage 2: centered crop + pixelating resize pair.
    pub pixelate: StageDiagnostics,
    /// Stage 3: tone adjustment (only when not at identity).
    pub tone: Option<StageDiagnostics>,
    /// Stage 4: edge darkening (only when a mode is selected).
    pub edge: Option<StageDiagnostics>,
    /// Stage 5: ordered-dither posterization.
    pub posterize: StageDiagnostics,
    /// Stage 6: palette extraction.
    pub extract: StageDiagnostics,
    /// Stage 7: nearest-color mapping.
    pub map: StageDiagnostics,
    /// Stage 8: PNG encoding.
    pub encode: StageDiagnostics,
    /// Total wall-clock duration of the entire run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across the run.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Image decoding metrics.
    Decode {
        /// Size of the input image bytes.
        input_bytes: usize,
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },
    /// Crop + pixelation metrics.
    Pixelate {
        /// Crop rectangle left edge.
        crop_x: u32,
        /// Crop rectangle top edge.
        crop_y: u32,
        /// Crop rectangle width.
        crop_width: u32,
        /// Crop rectangle height.
        crop_height: u32,
        /// Low-resolution target width.
        pixelation_size: u32,
        /// Final output width.
        output_width: u32,
        /// Final output height.
        output_height: u32,
    },
    /// Tone adjustment metrics.
    Tone {
        /// Contrast multiplier.
        contrast: f32,
        /// Saturation multiplier.
        saturation: f32,
    },
    /// Edge darkening metrics.
    Edge {
        /// Selected mode name.
        mode: String,
        /// Gradient scaling strength for the mode.
        strength: f32,
    },
    /// Posterization metrics.
    Posterize {
        /// Dither strength.
        dither_intensity: f32,
        /// Quantization levels per channel.
        levels: f32,
    },
    /// Palette extraction metrics.
    Extract {
        /// Number of distinct colors collected.
        distinct_colors: usize,
        /// Whether the extraction cap was reached.
        capped: bool,
    },
    /// Palette mapping metrics.
    Map {
        /// Theme palette size.
        palette_size: usize,
        /// Number of mapping entries built.
        mapping_entries: usize,
    },
    /// PNG encoding metrics.
    Encode {
        /// Size of the encoded output.
        output_bytes: usize,
    },
}

/// High-level summary counts for the entire run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Source image width in pixels.
    pub source_width: u32,
    /// Source image height in pixels.
    pub source_height: u32,
    /// Output image width in pixels.
    pub output_width: u32,
    /// Output image height in pixels.
    pub output_height: u32,
    /// Distinct posterized colors that reached the mapper.
    pub extracted_colors: usize,
    /// Theme palette size.
    pub palette_size: usize,
    /// Encoded output size in bytes.
    pub output_bytes: usize,
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Source: {}x{}  Output: {}x{} ({} bytes)",
            self.summary.source_width,
            self.summary.source_height,
            self.summary.output_width,
            self.summary.output_height,
            self.summary.output_bytes,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);

        let stages: Vec<(&str, &StageDiagnostics)> = {
            let mut s = vec![("Decode", &self.decode), ("Pixelate", &self.pixelate)];
            if let Some(ref t) = self.tone {
                s.push(("Tone", t));
            }
            if let Some(ref e) = self.edge {
                s.push(("Edge", e));
            }
            s.push(("Posterize", &self.posterize));
            s.push(("Extract", &self.extract));
            s.push(("Map", &self.map));
            s.push(("Encode", &self.encode));
            s
        };

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Extracted colors: {}  |  Palette size: {}",
            self.summary.extracted_colors, self.summary.palette_size,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            width,
            height,
        } => format!("{input_bytes} bytes -> {width}x{height}"),
        StageMetrics::Pixelate {
            crop_x,
            crop_y,
            crop_width,
            crop_height,
            pixelation_size,
            output_width,
            output_height,
        } => format!(
            "crop {crop_width}x{crop_height}+{crop_x}+{crop_y} -> {pixelation_size}w -> {output_width}x{output_height}",
        ),
        StageMetrics::Tone {
            contrast,
            saturation,
        } => format!("contrast={contrast:.2} saturation={saturation:.2}"),
        StageMetrics::Edge { mode, strength } => {
            format!("mode={mode} strength={strength:.1}")
        }
        StageMetrics::Posterize {
            dither_intensity,
            levels,
        } => format!("levels={levels:.0} dither={dither_intensity:.2}"),
        StageMetrics::Extract {
            distinct_colors,
            capped,
        } => {
            if *capped {
                format!("{distinct_colors} colors (capped)")
            } else {
                format!("{distinct_colors} colors")
            }
        }
        StageMetrics::Map {
            palette_size,
            mapping_entries,
        } => format!("{mapping_entries} entries -> {palette_size}-color palette"),
        StageMetrics::Encode { output_bytes } => format!("{output_bytes} bytes"),
    }
}

/// Run the full pipeline with per-stage timing.
///
/// Functionally identical to [`crate::process`]; the extra return
/// value carries the metrics.
///
/// # Errors
///
/// Returns every error [`crate::process`] can produce.
#[allow(clippy::too_many_lines)]
pub fn process_with_diagnostics(
    image: &[u8],
    theme: &Palette,
    options: &ProcessingOptions,
) -> Result<(Vec<u8>, PipelineDiagnostics), PipelineError> {
    options.validate()?;
    if theme.is_empty() {
        return Err(PipelineError::Parameter(
            "theme palette must not be empty".to_string(),
        ));
    }

    let total_start = Instant::now();

    let start = Instant::now();
    let decoded = codec::decode(image)?;
    let decode = StageDiagnostics {
        duration: start.elapsed(),
        metrics: StageMetrics::Decode {
            input_bytes: image.len(),
            width: decoded.width(),
            height: decoded.height(),
        },
    };
    let (source_width, source_height) = decoded.dimensions();

    let start = Instant::now();
    let region = crop::crop_region(
        crate::types::Dimensions::of(&decoded),
        options.aspect_ratio,
    )?;
    let pixelated = crop::crop_and_pixelate(
        &decoded,
        options.pixelation_size,
        options.output_resolution,
        options.aspect_ratio,
    )?;
    let pixelate = StageDiagnostics {
        duration: start.elapsed(),
        metrics: StageMetrics::Pixelate {
            crop_x: region.x,
            crop_y: region.y,
            crop_width: region.width,
            crop_height: region.height,
            pixelation_size: options.pixelation_size,
            output_width: pixelated.width(),
            output_height: pixelated.height(),
        },
    };
    drop(decoded);

    let start = Instant::now();
    let (toned, tone_diag) = if tone::is_identity(options.contrast, options.saturation) {
        (pixelated, None)
    } else {
        let toned = tone::adjust_tone(&pixelated, options.contrast, options.saturation);
        (
            toned,
            Some(StageDiagnostics {
                duration: start.elapsed(),
                metrics: StageMetrics::Tone {
                    contrast: options.contrast,
                    saturation: options.saturation,
                },
            }),
        )
    };

    let start = Instant::now();
    let (outlined, edge_diag) = if options.edge_mode.is_enabled() {
        let outlined = edge::enhance_edges(&toned, options.edge_mode);
        (
            outlined,
            Some(StageDiagnostics {
                duration: start.elapsed(),
                metrics: StageMetrics::Edge {
                    mode: options.edge_mode.to_string(),
                    strength: options.edge_mode.strength(),
                },
            }),
        )
    } else {
        (toned, None)
    };

    let start = Instant::now();
    let posterized = posterize::posterize(&outlined, options.dither_intensity);
    let posterize_diag = StageDiagnostics {
        duration: start.elapsed(),
        metrics: StageMetrics::Posterize {
            dither_intensity: options.dither_intensity,
            levels: posterize::LEVELS,
        },
    };
    drop(outlined);

    let start = Instant::now();
    let extracted = palette::extract_palette(&posterized);
    let extract = StageDiagnostics {
        duration: start.elapsed(),
        metrics: StageMetrics::Extract {
            distinct_colors: extracted.len(),
            capped: extracted.len() == palette::MAX_EXTRACTED_COLORS,
        },
    };

    let start = Instant::now();
    let mapping = ColorMapping::build(&extracted, theme);
    let themed = map::apply_mapping(&posterized, &mapping);
    let map_diag = StageDiagnostics {
        duration: start.elapsed(),
        metrics: StageMetrics::Map {
            palette_size: theme.len(),
            mapping_entries: mapping.len(),
        },
    };
    drop(posterized);

    let start = Instant::now();
    let encoded = codec::encode_png(&themed)?;
    let encode = StageDiagnostics {
        duration: start.elapsed(),
        metrics: StageMetrics::Encode {
            output_bytes: encoded.len(),
        },
    };

    let diagnostics = PipelineDiagnostics {
        decode,
        pixelate,
        tone: tone_diag,
        edge: edge_diag,
        posterize: posterize_diag,
        extract,
        map: map_diag,
        summary: PipelineSummary {
            source_width,
            source_height,
            output_width: themed.width(),
            output_height: themed.height(),
            extracted_colors: extracted.len(),
            palette_size: theme.len(),
            output_bytes: encoded.len(),
        },
        encode,
        total_duration: total_start.elapsed(),
    };

    Ok((encoded, diagnostics))
}
