//! Palette extraction: collect the distinct colors of a posterized
//! buffer.
//!
//! The scan runs in raster order and keeps colors in the order they
//! are first seen, stopping at [`MAX_EXTRACTED_COLORS`]. Scan-order
//! selection (rather than frequency ranking) is part of the output
//! contract: when an image holds more distinct posterized colors than
//! the cap, which ones participate in palette mapping depends on where
//! they first appear, and downstream results must reproduce that
//! exactly.

use image::RgbaImage;

use crate::types::Rgb;

/// Upper bound on extracted colors.
///
/// A fidelity constraint, not a tunable: raising it changes which
/// colors reach the palette mapper and therefore the final image.
pub const MAX_EXTRACTED_COLORS: usize = 16;

/// Collect distinct RGB triples (alpha ignored) in first-encountered
/// raster order, capped at [`MAX_EXTRACTED_COLORS`].
#[must_use]
pub fn extract_palette(image: &RgbaImage) -> Vec<Rgb> {
    let mut colors: Vec<Rgb> = Vec::new();
    for pixel in image.pixels() {
        let [r, g, b, _] = pixel.0;
        let color = Rgb::new(r, g, b);
        if !colors.contains(&color) {
            colors.push(color);
            if colors.len() == MAX_EXTRACTED_COLORS {
                break;
            }
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_yields_one_color() {
        let img = RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 255]));
        let colors = extract_palette(&img);
        assert_eq!(colors, vec![Rgb::new(10, 20, 30)]);
    }

    #[test]
    fn colors_appear_in_raster_order() {
        // Row 0: A A B B / row 1: C C A A
        let img = RgbaImage::from_fn(4, 2, |x, y| match (y, x < 2) {
            (0, true) => image::Rgba([1, 0, 0, 255]),
            (0, false) => image::Rgba([2, 0, 0, 255]),
            (_, true) => image::Rgba([3, 0, 0, 255]),
            (_, false) => image::Rgba([1, 0, 0, 255]),
        });
        let colors = extract_palette(&img);
        assert_eq!(
            colors,
            vec![Rgb::new(1, 0, 0), Rgb::new(2, 0, 0), Rgb::new(3, 0, 0)],
        );
    }

    #[test]
    fn alpha_does_not_distinguish_colors() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgba([5, 5, 5, 255])
            } else {
                image::Rgba([5, 5, 5, 0])
            }
        });
        let colors = extract_palette(&img);
        assert_eq!(colors, vec![Rgb::new(5, 5, 5)]);
    }

    #[test]
    fn extraction_caps_at_sixteen() {
        // 32 distinct colors in one row; only the first 16 survive.
        let img = RgbaImage::from_fn(32, 1, |x, _| image::Rgba([x as u8, 0, 0, 255]));
        let colors = extract_palette(&img);
        assert_eq!(colors.len(), MAX_EXTRACTED_COLORS);
        let expected: Vec<Rgb> = (0..16).map(|i| Rgb::new(i as u8, 0, 0)).collect();
        assert_eq!(colors, expected);
    }

    #[test]
    fn cap_respects_raster_order_across_rows() {
        // 5x5 with a distinct color per pixel: the cap lands partway
        // through row 4 (16th distinct color is pixel (0, 3)).
        let img = RgbaImage::from_fn(5, 5, |x, y| image::Rgba([(y * 5 + x) as u8, 7, 7, 255]));
        let colors = extract_palette(&img);
        assert_eq!(colors.len(), 16);
        assert_eq!(colors[0], Rgb::new(0, 7, 7));
        assert_eq!(colors[15], Rgb::new(15, 7, 7));
    }

    #[test]
    fn empty_buffer_yields_no_colors() {
        let img = RgbaImage::new(0, 0);
        assert!(extract_palette(&img).is_empty());
    }
}
