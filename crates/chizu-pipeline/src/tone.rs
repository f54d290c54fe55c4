//! Per-pixel contrast and saturation adjustment.
//!
//! Operates in normalized `[0, 1]` space: contrast scales each channel
//! around the 0.5 midpoint, saturation blends between the luma
//! grayscale of the adjusted color and the adjusted color itself. A
//! saturation of 0 therefore yields grayscale, and 1.0 leaves the
//! (contrast-adjusted) color unchanged.

use image::RgbaImage;

use crate::types::unit_to_byte;

/// Rec. 601 luma weights, also used by the palette-mapping docs and
/// the original capture app.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Whether the given parameters make this stage a no-op.
///
/// The pipeline skips the stage entirely in that case, so the output
/// buffer is bit-identical to the input (no float round-trip).
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_identity(contrast: f32, saturation: f32) -> bool {
    contrast == 1.0 && saturation == 1.0
}

/// Apply contrast and saturation to every pixel.
///
/// Per channel: `adjusted = (c - 0.5) * contrast + 0.5`; then the
/// result is `gray + (adjusted - gray) * saturation` where `gray` is
/// the luma of the adjusted color; finally clamped to `[0, 1]`. Alpha
/// is untouched.
#[must_use = "returns the adjusted buffer"]
pub fn adjust_tone(image: &RgbaImage, contrast: f32, saturation: f32) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;

        let adjusted = [
            (f32::from(r) / 255.0 - 0.5).mul_add(contrast, 0.5),
            (f32::from(g) / 255.0 - 0.5).mul_add(contrast, 0.5),
            (f32::from(b) / 255.0 - 0.5).mul_add(contrast, 0.5),
        ];
        let gray = LUMA_WEIGHTS[0] * adjusted[0]
            + LUMA_WEIGHTS[1] * adjusted[1]
            + LUMA_WEIGHTS[2] * adjusted[2];

        image::Rgba([
            unit_to_byte((adjusted[0] - gray).mul_add(saturation, gray)),
            unit_to_byte((adjusted[1] - gray).mul_add(saturation, gray)),
            unit_to_byte((adjusted[2] - gray).mul_add(saturation, gray)),
            a,
        ])
    })
}
