//! Ordered-dither posterization: quantize each channel to a fixed
//! number of levels, with an optional 4x4 Bayer bias.
//!
//! The level count is a constant of the pipeline, not a function of
//! the theme: posterization always reduces the image to at most
//! `(LEVELS + 1)^3` distinct colors before palette extraction, however
//! large the target palette is. The Bayer bias trades flat banding for
//! a patterned mix of adjacent levels; at zero intensity the stage
//! degenerates to plain posterization and is fully deterministic.

use image::RgbaImage;

use crate::types::unit_to_byte;

/// Quantization levels per channel axis.
pub const LEVELS: f32 = 4.0;

/// The standard 4x4 ordered-dither matrix, in units of 1/16.
const BAYER_4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Quantize every channel to [`LEVELS`] levels with Bayer dithering.
///
/// Per pixel and channel:
///
/// ```text
/// d = (bayer4[y % 4][x % 4] / 16 - 0.5) * dither_intensity
/// q = clamp(floor((c + d) * LEVELS + 0.5) / LEVELS, 0, 1)
/// ```
///
/// Alpha is untouched. The bias `d` is negative for low matrix cells
/// and positive for high ones, so a mid-tone flat region quantizes to
/// a checkered mix of its two nearest levels instead of a hard band.
#[must_use = "returns the posterized buffer"]
pub fn posterize(image: &RgbaImage, dither_intensity: f32) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let threshold = f32::from(BAYER_4[(y % 4) as usize][(x % 4) as usize]) / 16.0;
        let d = (threshold - 0.5) * dither_intensity;

        let [r, g, b, a] = image.get_pixel(x, y).0;
        image::Rgba([
            quantize_channel(r, d),
            quantize_channel(g, d),
            quantize_channel(b, d),
            a,
        ])
    })
}

/// Quantize one 8-bit channel with the given dither bias.
fn quantize_channel(value: u8, d: f32) -> u8 {
    let c = f32::from(value) / 255.0;
    let q = ((c + d) * LEVELS + 0.5).floor() / LEVELS;
    unit_to_byte(q)
}
