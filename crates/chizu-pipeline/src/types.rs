//! Shared types for the chizu stylization pipeline.

use serde::{Deserialize, Serialize};

use crate::edge::EdgeMode;

/// Re-export `RgbaImage` so downstream crates can reference pipeline
/// buffers without depending on `image` directly.
pub use image::RgbaImage;

/// Errors that can occur during a pipeline invocation.
///
/// Every variant is fatal to the single invocation: no stage is
/// retried and no partially processed buffer is ever returned to the
/// caller.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input byte slice was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The input bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// A parameter was outside its documented range.
    #[error("invalid parameter: {0}")]
    Parameter(String),

    /// A working buffer of the requested dimensions cannot be created.
    #[error("cannot allocate a {width}x{height} working buffer")]
    Allocation {
        /// Requested buffer width.
        width: u32,
        /// Requested buffer height.
        height: u32,
    },

    /// The final buffer could not be serialized.
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
}

/// An 8-bit RGB color.
///
/// The pipeline stores colors as 8-bit channels throughout; the
/// normalized-float form used by the tone, edge, and posterize math is
/// derived on the fly (`v / 255` in, `round(clamp(v, 0, 1) * 255)` out).
/// Equality is exact channel comparison, which is what palette
/// membership tests rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance to another color, in 8-bit channel
    /// units.
    ///
    /// Scale-equivalent to Euclidean distance between the normalized
    /// `[0, 1]` forms (the factor is `255²`), so nearest-color
    /// selection and exact ties are identical in either space. Integer
    /// arithmetic keeps tie comparisons exact.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn distance_squared(self, other: Self) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// The color as normalized `[0, 1]` channels.
    #[must_use]
    pub fn to_unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Build a color from normalized channels, clamping to `[0, 1]`
    /// and rounding half-up to 8 bits.
    #[must_use]
    pub fn from_unit(channels: [f32; 3]) -> Self {
        Self {
            r: unit_to_byte(channels[0]),
            g: unit_to_byte(channels[1]),
            b: unit_to_byte(channels[2]),
        }
    }
}

/// Clamp a normalized channel to `[0, 1]` and round to 8 bits.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// An ordered color palette.
///
/// Order matters: it is the deterministic tie-break when two palette
/// entries are equidistant from a source color (lowest index wins).
/// The pipeline requires at least one entry and rejects an empty
/// palette with [`PipelineError::Parameter`](crate::PipelineError) at
/// the entry points; the type itself does not enforce non-emptiness so
/// that palettes can be assembled incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    /// Create a palette from an ordered list of colors.
    #[must_use]
    pub const fn new(colors: Vec<Rgb>) -> Self {
        Self(colors)
    }

    /// Returns `true` if the palette has no colors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of colors in the palette.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// All colors, in palette order.
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }

    /// Returns `true` if `color` is an exact member of the palette.
    #[must_use]
    pub fn contains(&self, color: Rgb) -> bool {
        self.0.contains(&color)
    }
}

impl From<Vec<Rgb>> for Palette {
    fn from(colors: Vec<Rgb>) -> Self {
        Self::new(colors)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an image buffer.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Parameters for a pipeline invocation.
///
/// Defaults match the original export defaults of the app this pipeline
/// serves (see [`crate::presets`] for the full selectable value
/// tables). Values are validated, never clamped: an out-of-range value
/// fails the invocation with [`PipelineError::Parameter`].
///
/// `pixelation_size > output_resolution` is unusual but accepted -- the
/// down/up resize pair simply runs with the given targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Width of the low-resolution intermediate, in pixels. Smaller
    /// values produce larger visible blocks.
    pub pixelation_size: u32,

    /// Width of the final output, in pixels.
    pub output_resolution: u32,

    /// Target width/height ratio for the centered crop.
    pub aspect_ratio: f64,

    /// Ordered-dither strength in `[0, 1]`. Zero disables the dither
    /// bias, leaving plain 4-level posterization.
    pub dither_intensity: f32,

    /// Edge darkening mode.
    pub edge_mode: EdgeMode,

    /// Contrast multiplier (> 0). `1.0` is the identity.
    pub contrast: f32,

    /// Saturation multiplier (>= 0). `1.0` is the identity, `0.0`
    /// produces grayscale.
    pub saturation: f32,
}

impl ProcessingOptions {
    /// Default low-resolution width.
    pub const DEFAULT_PIXELATION_SIZE: u32 = 32;
    /// Default output width.
    pub const DEFAULT_OUTPUT_RESOLUTION: u32 = 1024;
    /// Default crop aspect ratio (square).
    pub const DEFAULT_ASPECT_RATIO: f64 = 1.0;
    /// Default dither strength.
    pub const DEFAULT_DITHER_INTENSITY: f32 = 0.4;
    /// Default edge mode.
    pub const DEFAULT_EDGE_MODE: EdgeMode = EdgeMode::None;
    /// Default contrast multiplier.
    pub const DEFAULT_CONTRAST: f32 = 1.0;
    /// Default saturation multiplier.
    pub const DEFAULT_SATURATION: f32 = 1.0;

    /// Check every parameter range, failing fast on the first
    /// violation.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Parameter`] if a size is zero, the
    /// aspect ratio is non-positive or non-finite, the dither
    /// intensity is outside `[0, 1]`, the contrast is not positive, or
    /// the saturation is negative.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.pixelation_size == 0 {
            return Err(PipelineError::Parameter(
                "pixelation_size must be positive".to_string(),
            ));
        }
        if self.output_resolution == 0 {
            return Err(PipelineError::Parameter(
                "output_resolution must be positive".to_string(),
            ));
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(PipelineError::Parameter(format!(
                "aspect_ratio must be positive and finite, got {}",
                self.aspect_ratio,
            )));
        }
        if !(0.0..=1.0).contains(&self.dither_intensity) {
            return Err(PipelineError::Parameter(format!(
                "dither_intensity must be in [0, 1], got {}",
                self.dither_intensity,
            )));
        }
        if !self.contrast.is_finite() || self.contrast <= 0.0 {
            return Err(PipelineError::Parameter(format!(
                "contrast must be positive, got {}",
                self.contrast,
            )));
        }
        if !self.saturation.is_finite() || self.saturation < 0.0 {
            return Err(PipelineError::Parameter(format!(
                "saturation must be non-negative, got {}",
                self.saturation,
            )));
        }
        Ok(())
    }
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            pixelation_size: Self::DEFAULT_PIXELATION_SIZE,
            output_resolution: Self::DEFAULT_OUTPUT_RESOLUTION,
            aspect_ratio: Self::DEFAULT_ASPECT_RATIO,
            dither_intensity: Self::DEFAULT_DITHER_INTENSITY,
            edge_mode: Self::DEFAULT_EDGE_MODE,
            contrast: Self::DEFAULT_CONTRAST,
            saturation: Self::DEFAULT_SATURATION,
        }
    }
}
