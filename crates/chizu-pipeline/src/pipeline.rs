//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate buffer before continuing.
//!
//! Unlike [`crate::process`] which runs everything in one call,
//! [`Pipeline`] lets the caller drive execution a stage at a time:
//!
//! ```rust
//! # use chizu_pipeline::{Palette, Pipeline, PipelineError, ProcessingOptions, Rgb};
//! # fn run(png: Vec<u8>) -> Result<(), PipelineError> {
//! let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]);
//! let themed = Pipeline::new(png, palette, ProcessingOptions::default())
//!     .decode()?
//!     .pixelate()?
//!     .adjust_tone()
//!     .enhance_edges()
//!     .posterize()
//!     .map_palette();
//! let bytes = themed.encode()?;
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next state (or
//! `Result` for fallible stages), making it a compile-time error to
//! run stages out of order. Each state owns its output buffer
//! exclusively; the predecessor's buffer is dropped as soon as the
//! next stage finishes reading it.
//!
//! Stage boundaries are also the cancellation points: a caller that
//! wants to abandon a superseded preview request simply stops
//! advancing and drops the current state. A stage itself is not
//! decomposed into cancellable sub-units.

use image::RgbaImage;

use crate::crop::CropRegion;
use crate::map::ColorMapping;
use crate::types::{Dimensions, Palette, PipelineError, ProcessingOptions, Rgb};

/// Incremental stylization pipeline.
///
/// Created via [`Pipeline::new`], which stores the source bytes,
/// palette, and options without doing any processing.
pub struct Pipeline;

impl Pipeline {
    /// Create a new pipeline from source bytes, a theme palette, and
    /// options.
    ///
    /// No processing or validation happens here; call
    /// [`decode`](Pending::decode) to begin.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(
        image_bytes: Vec<u8>,
        palette: Palette,
        options: ProcessingOptions,
    ) -> Pending {
        Pending {
            source: image_bytes,
            palette,
            options,
        }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
#[must_use = "pipeline stages are consumed by advancing — call .decode() to continue"]
pub struct Pending {
    source: Vec<u8>,
    palette: Palette,
    options: ProcessingOptions,
}

impl Pending {
    /// The raw source image bytes.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Validate the inputs and decode the source image.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Parameter`] for out-of-range options or
    /// an empty palette, [`PipelineError::EmptyInput`] for empty
    /// bytes, and [`PipelineError::Decode`] for undecodable data.
    pub fn decode(self) -> Result<Decoded, PipelineError> {
        self.options.validate()?;
        if self.palette.is_empty() {
            return Err(PipelineError::Parameter(
                "theme palette must not be empty".to_string(),
            ));
        }
        let image = crate::codec::decode(&self.source)?;
        Ok(Decoded {
            palette: self.palette,
            options: self.options,
            image,
        })
    }
}

// ───────────────────────── Stage 1: Decoded ──────────────────────────

/// Pipeline state after decoding.
#[must_use = "pipeline stages are consumed by advancing — call .pixelate() to continue"]
pub struct Decoded {
    palette: Palette,
    options: ProcessingOptions,
    image: RgbaImage,
}

impl Decoded {
    /// The decoded RGBA buffer.
    #[must_use]
    pub const fn decoded(&self) -> &RgbaImage {
        &self.image
    }

    /// Crop to the target aspect ratio and run the pixelating resize
    /// pair.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Parameter`] if the crop collapses to
    /// zero extent and [`PipelineError::Allocation`] if a resize
    /// target is not representable.
    pub fn pixelate(self) -> Result<Pixelated, PipelineError> {
        let region =
            crate::crop::crop_region(Dimensions::of(&self.image), self.options.aspect_ratio)?;
        let image = crate::crop::crop_and_pixelate(
            &self.image,
            self.options.pixelation_size,
            self.options.output_resolution,
            self.options.aspect_ratio,
        )?;
        Ok(Pixelated {
            palette: self.palette,
            options: self.options,
            region,
            image,
        })
    }
}

// ───────────────────────── Stage 2: Pixelated ────────────────────────

/// Pipeline state after crop and pixelation.
#[must_use = "pipeline stages are consumed by advancing — call .adjust_tone() to continue"]
pub struct Pixelated {
    palette: Palette,
    options: ProcessingOptions,
    region: CropRegion,
    image: RgbaImage,
}

impl Pixelated {
    /// The pixelated buffer at output resolution.
    #[must_use]
    pub const fn pixelated(&self) -> &RgbaImage {
        &self.image
    }

    /// The crop rectangle that was applied to the source.
    #[must_use]
    pub const fn crop_region(&self) -> CropRegion {
        self.region
    }

    /// Apply contrast and saturation.
    ///
    /// Skipped (the buffer moves through untouched) when both
    /// parameters are 1.0.
    pub fn adjust_tone(self) -> Toned {
        let applied = !crate::tone::is_identity(self.options.contrast, self.options.saturation);
        let image = if applied {
            crate::tone::adjust_tone(&self.image, self.options.contrast, self.options.saturation)
        } else {
            self.image
        };
        Toned {
            palette: self.palette,
            options: self.options,
            image,
            applied,
        }
    }
}

// ───────────────────────── Stage 3: Toned ────────────────────────────

/// Pipeline state after tone adjustment.
#[must_use = "pipeline stages are consumed by advancing — call .enhance_edges() to continue"]
pub struct Toned {
    palette: Palette,
    options: ProcessingOptions,
    image: RgbaImage,
    applied: bool,
}

impl Toned {
    /// The tone-adjusted buffer.
    #[must_use]
    pub const fn toned(&self) -> &RgbaImage {
        &self.image
    }

    /// Whether the stage did any work (false at identity parameters).
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.applied
    }

    /// Darken edges by Sobel gradient magnitude.
    ///
    /// Skipped (the buffer moves through untouched) for
    /// [`EdgeMode::None`](crate::EdgeMode::None).
    pub fn enhance_edges(self) -> Outlined {
        let applied = self.options.edge_mode.is_enabled();
        let image = if applied {
            crate::edge::enhance_edges(&self.image, self.options.edge_mode)
        } else {
            self.image
        };
        Outlined {
            palette: self.palette,
            options: self.options,
            image,
            applied,
        }
    }
}

// ───────────────────────── Stage 4: Outlined ─────────────────────────

/// Pipeline state after edge enhancement.
#[must_use = "pipeline stages are consumed by advancing — call .posterize() to continue"]
pub struct Outlined {
    palette: Palette,
    options: ProcessingOptions,
    image: RgbaImage,
    applied: bool,
}

impl Outlined {
    /// The edge-darkened buffer.
    #[must_use]
    pub const fn outlined(&self) -> &RgbaImage {
        &self.image
    }

    /// Whether the stage did any work (false for `EdgeMode::None`).
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.applied
    }

    /// Quantize to 4 levels per channel with ordered dithering.
    pub fn posterize(self) -> Posterized {
        let image = crate::posterize::posterize(&self.image, self.options.dither_intensity);
        Posterized {
            palette: self.palette,
            image,
        }
    }
}

// ───────────────────────── Stage 5: Posterized ───────────────────────

/// Pipeline state after posterization.
#[must_use = "pipeline stages are consumed by advancing — call .map_palette() to continue"]
pub struct Posterized {
    palette: Palette,
    image: RgbaImage,
}

impl Posterized {
    /// The posterized buffer.
    #[must_use]
    pub const fn posterized(&self) -> &RgbaImage {
        &self.image
    }

    /// Extract the distinct posterized colors and recolor every pixel
    /// through the nearest-theme-color mapping -- the final transform.
    pub fn map_palette(self) -> Themed {
        let extracted = crate::palette::extract_palette(&self.image);
        let mapping = ColorMapping::build(&extracted, &self.palette);
        let image = crate::map::apply_mapping(&self.image, &mapping);
        Themed {
            image,
            extracted,
            mapping,
        }
    }
}

// ───────────────────────── Stage 6: Themed ───────────────────────────

/// Final pipeline state: every pixel belongs to the theme palette.
#[must_use = "call .encode() or .into_image() to extract the result"]
pub struct Themed {
    image: RgbaImage,
    extracted: Vec<Rgb>,
    mapping: ColorMapping,
}

impl Themed {
    /// The final themed buffer.
    #[must_use]
    pub const fn themed(&self) -> &RgbaImage {
        &self.image
    }

    /// The posterized colors that were extracted, in raster order.
    #[must_use]
    pub fn extracted(&self) -> &[Rgb] {
        &self.extracted
    }

    /// The source-to-theme color mapping that was applied.
    #[must_use]
    pub const fn mapping(&self) -> &ColorMapping {
        &self.mapping
    }

    /// Encode the themed buffer as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Encode`] if serialization fails.
    pub fn encode(self) -> Result<Vec<u8>, PipelineError> {
        crate::codec::encode_png(&self.image)
    }

    /// Consume the pipeline and take the themed buffer.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::EdgeMode;

    fn test_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 99, 255])
        });
        crate::codec::encode_png(&img).unwrap()
    }

    fn bw_palette() -> Palette {
        Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)])
    }

    fn small_options() -> ProcessingOptions {
        ProcessingOptions {
            pixelation_size: 8,
            output_resolution: 32,
            aspect_ratio: 1.0,
            ..ProcessingOptions::default()
        }
    }

    #[test]
    fn pending_exposes_source() {
        let png = test_png(16, 16);
        let len = png.len();
        let pending = Pipeline::new(png, bw_palette(), small_options());
        assert_eq!(pending.source().len(), len);
    }

    #[test]
    fn decode_rejects_empty_bytes() {
        let result = Pipeline::new(vec![], bw_palette(), small_options()).decode();
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn decode_rejects_empty_palette() {
        let result =
            Pipeline::new(test_png(8, 8), Palette::new(vec![]), small_options()).decode();
        assert!(matches!(result, Err(PipelineError::Parameter(_))));
    }

    #[test]
    fn decode_rejects_invalid_options() {
        let options = ProcessingOptions {
            contrast: -1.0,
            ..small_options()
        };
        let result = Pipeline::new(test_png(8, 8), bw_palette(), options).decode();
        assert!(matches!(result, Err(PipelineError::Parameter(_))));
    }

    #[test]
    fn stages_expose_their_buffers() {
        let pixelated = Pipeline::new(test_png(64, 48), bw_palette(), small_options())
            .decode()
            .unwrap()
            .pixelate()
            .unwrap();
        assert_eq!(pixelated.pixelated().width(), 32);
        assert_eq!(pixelated.crop_region().width, 48);

        let toned = pixelated.adjust_tone();
        assert!(!toned.applied(), "identity tone should be skipped");

        let outlined = toned.enhance_edges();
        assert!(!outlined.applied(), "EdgeMode::None should be skipped");

        let themed = outlined.posterize().map_palette();
        assert!(!themed.extracted().is_empty());
        assert!(!themed.mapping().is_empty());
        assert_eq!(themed.themed().width(), 32);
    }

    #[test]
    fn non_identity_parameters_mark_stages_applied() {
        let options = ProcessingOptions {
            contrast: 1.3,
            edge_mode: EdgeMode::Soft,
            ..small_options()
        };
        let toned = Pipeline::new(test_png(32, 32), bw_palette(), options)
            .decode()
            .unwrap()
            .pixelate()
            .unwrap()
            .adjust_tone();
        assert!(toned.applied());
        let outlined = toned.enhance_edges();
        assert!(outlined.applied());
    }

    #[test]
    fn chained_pipeline_matches_process() {
        let png = test_png(64, 64);
        let options = ProcessingOptions {
            dither_intensity: 0.4,
            edge_mode: EdgeMode::Selective,
            contrast: 1.15,
            saturation: 0.7,
            ..small_options()
        };
        let palette = bw_palette();

        let one_shot = crate::process(&png, &palette, &options).unwrap();
        let chained = Pipeline::new(png, palette, options)
            .decode()
            .unwrap()
            .pixelate()
            .unwrap()
            .adjust_tone()
            .enhance_edges()
            .posterize()
            .map_palette()
            .encode()
            .unwrap();
        assert_eq!(one_shot, chained);
    }

    #[test]
    fn themed_pixels_are_palette_members() {
        let palette = bw_palette();
        let themed = Pipeline::new(test_png(40, 40), palette.clone(), small_options())
            .decode()
            .unwrap()
            .pixelate()
            .unwrap()
            .adjust_tone()
            .enhance_edges()
            .posterize()
            .map_palette();
        for pixel in themed.themed().pixels() {
            let [r, g, b, _] = pixel.0;
            assert!(palette.contains(Rgb::new(r, g, b)));
        }
    }

    #[test]
    fn extraction_cap_applies_end_to_end() {
        // 25 distinct colors built from posterization fixed points
        // (level values survive posterization unchanged), so the
        // extractor sees more colors than its cap and keeps the first
        // 16 in raster order.
        const LEVEL_VALUES: [u8; 5] = [0, 64, 128, 191, 255];
        let img = RgbaImage::from_fn(5, 5, |x, y| {
            image::Rgba([
                LEVEL_VALUES[x as usize],
                LEVEL_VALUES[y as usize],
                0,
                255,
            ])
        });
        let png = crate::codec::encode_png(&img).unwrap();
        let options = ProcessingOptions {
            pixelation_size: 5,
            output_resolution: 5,
            aspect_ratio: 1.0,
            dither_intensity: 0.0,
            ..ProcessingOptions::default()
        };
        let themed = Pipeline::new(png, bw_palette(), options)
            .decode()
            .unwrap()
            .pixelate()
            .unwrap()
            .adjust_tone()
            .enhance_edges()
            .posterize()
            .map_palette();
        assert_eq!(themed.extracted().len(), 16);
        // First extracted color is the top-left pixel; the 16th is the
        // first pixel of the fourth row.
        assert_eq!(themed.extracted()[0], Rgb::new(0, 0, 0));
        assert_eq!(themed.extracted()[15], Rgb::new(0, 191, 0));
    }

    #[test]
    fn into_image_returns_final_buffer() {
        let themed = Pipeline::new(test_png(16, 16), bw_palette(), small_options())
            .decode()
            .unwrap()
            .pixelate()
            .unwrap()
            .adjust_tone()
            .enhance_edges()
            .posterize()
            .map_palette();
        let img = themed.into_image();
        assert_eq!(img.width(), 32);
    }
}
