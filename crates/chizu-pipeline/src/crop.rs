//! Centered aspect-ratio crop and the pixelating resize pair.
//!
//! The blocky pixel-art look comes from resizing twice with
//! nearest-neighbor filtering: down to a small `pixelation_size`-wide
//! buffer, then back up to `output_resolution`. Each low-res pixel
//! becomes one visible block in the output.
//!
//! All dimension arithmetic floors to integers -- crop extents, crop
//! origins, and derived resize heights alike -- so the crop and resize
//! stages can never disagree about a rectangle by one pixel.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::codec::ensure_allocatable;
use crate::types::{Dimensions, PipelineError};

/// A crop rectangle inside a source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    /// Left edge of the rectangle.
    pub x: u32,
    /// Top edge of the rectangle.
    pub y: u32,
    /// Rectangle width.
    pub width: u32,
    /// Rectangle height.
    pub height: u32,
}

/// Compute the centered crop rectangle for a target aspect ratio.
///
/// When the source is wider than the target ratio, the full height is
/// kept and the width is cropped (`width = floor(height * ratio)`,
/// centered horizontally). Otherwise the full width is kept and the
/// height is cropped (`height = floor(width / ratio)`, centered
/// vertically). Centering uses integer halving, i.e.
/// `x = floor((source_width - width) / 2)`.
///
/// # Errors
///
/// Returns [`PipelineError::Parameter`] if `aspect_ratio` is
/// non-positive or non-finite, or if the computed crop extent rounds
/// down to zero.
pub fn crop_region(source: Dimensions, aspect_ratio: f64) -> Result<CropRegion, PipelineError> {
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return Err(PipelineError::Parameter(format!(
            "aspect_ratio must be positive and finite, got {aspect_ratio}",
        )));
    }
    if source.width == 0 || source.height == 0 {
        return Err(PipelineError::Parameter(format!(
            "source image has zero extent ({}x{})",
            source.width, source.height,
        )));
    }

    let source_ratio = f64::from(source.width) / f64::from(source.height);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let region = if source_ratio > aspect_ratio {
        // Source is wider than the target: crop the width.
        let width = (f64::from(source.height) * aspect_ratio).floor() as u32;
        CropRegion {
            x: (source.width - width) / 2,
            y: 0,
            width,
            height: source.height,
        }
    } else {
        // Source is taller (or an exact match): crop the height.
        let height = (f64::from(source.width) / aspect_ratio).floor() as u32;
        CropRegion {
            x: 0,
            y: (source.height - height) / 2,
            width: source.width,
            height,
        }
    };

    if region.width == 0 || region.height == 0 {
        return Err(PipelineError::Parameter(format!(
            "crop to ratio {aspect_ratio} of a {}x{} image has zero extent",
            source.width, source.height,
        )));
    }
    Ok(region)
}

/// Crop an image to the centered rectangle for `aspect_ratio`.
///
/// # Errors
///
/// Returns [`PipelineError::Parameter`] for the conditions listed on
/// [`crop_region`].
pub fn crop_to_aspect(image: &RgbaImage, aspect_ratio: f64) -> Result<RgbaImage, PipelineError> {
    let region = crop_region(Dimensions::of(image), aspect_ratio)?;
    Ok(imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image())
}

/// Resize down to `pixelation_size` wide and back up to
/// `output_resolution` wide, nearest-neighbor both ways.
///
/// Each derived height preserves the current buffer's proportions,
/// floored: `h = floor(height * target_width / width)`, with a minimum
/// of 1. Targets are taken as given; `pixelation_size` larger than the
/// input (or than `output_resolution`) is executed, not clamped.
///
/// # Errors
///
/// Returns [`PipelineError::Parameter`] if either target width is
/// zero, or [`PipelineError::Allocation`] if a target buffer is not
/// representable.
pub fn resize_pixelated(
    image: &RgbaImage,
    pixelation_size: u32,
    output_resolution: u32,
) -> Result<RgbaImage, PipelineError> {
    if pixelation_size == 0 {
        return Err(PipelineError::Parameter(
            "pixelation_size must be positive".to_string(),
        ));
    }
    if output_resolution == 0 {
        return Err(PipelineError::Parameter(
            "output_resolution must be positive".to_string(),
        ));
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::Parameter(format!(
            "source image has zero extent ({}x{})",
            image.width(),
            image.height(),
        )));
    }

    let small_height = scaled_height(Dimensions::of(image), pixelation_size);
    ensure_allocatable(pixelation_size, small_height)?;
    let small = imageops::resize(image, pixelation_size, small_height, FilterType::Nearest);

    let output_height = scaled_height(Dimensions::of(&small), output_resolution);
    ensure_allocatable(output_resolution, output_height)?;
    Ok(imageops::resize(
        &small,
        output_resolution,
        output_height,
        FilterType::Nearest,
    ))
}

/// Crop to `aspect_ratio`, then apply the pixelating resize pair.
///
/// # Errors
///
/// Propagates the errors of [`crop_to_aspect`] and
/// [`resize_pixelated`].
pub fn crop_and_pixelate(
    image: &RgbaImage,
    pixelation_size: u32,
    output_resolution: u32,
    aspect_ratio: f64,
) -> Result<RgbaImage, PipelineError> {
    let cropped = crop_to_aspect(image, aspect_ratio)?;
    resize_pixelated(&cropped, pixelation_size, output_resolution)
}

/// Height proportional to a new width, floored, at least 1.
#[allow(clippy::cast_possible_truncation)]
fn scaled_height(source: Dimensions, target_width: u32) -> u32 {
    let scaled = u64::from(source.height) * u64::from(target_width) / u64::from(source.width);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn flat_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([128, 64, 32, 255]))
    }

    // --- crop_region tests ---

    #[test]
    fn wider_source_crops_width() {
        // 200x100 at ratio 1: crop to 100x100, centered horizontally.
        let region = crop_region(dims(200, 100), 1.0).unwrap();
        assert_eq!(
            region,
            CropRegion {
                x: 50,
                y: 0,
                width: 100,
                height: 100,
            },
        );
    }

    #[test]
    fn taller_source_crops_height() {
        // 100x200 at ratio 1: crop to 100x100, centered vertically.
        let region = crop_region(dims(100, 200), 1.0).unwrap();
        assert_eq!(
            region,
            CropRegion {
                x: 0,
                y: 50,
                width: 100,
                height: 100,
            },
        );
    }

    #[test]
    fn exact_ratio_keeps_full_image() {
        let region = crop_region(dims(160, 90), 16.0 / 9.0).unwrap();
        assert_eq!(
            region,
            CropRegion {
                x: 0,
                y: 0,
                width: 160,
                height: 90,
            },
        );
    }

    #[test]
    fn crop_extents_are_floored() {
        // 100x30 at ratio 1: crop width = floor(30 * 1.0) = 30,
        // x = floor((100 - 30) / 2) = 35.
        let region = crop_region(dims(100, 30), 1.0).unwrap();
        assert_eq!(region.width, 30);
        assert_eq!(region.x, 35);

        // Odd leftover: 101x30 -> x = floor(71 / 2) = 35.
        let region = crop_region(dims(101, 30), 1.0).unwrap();
        assert_eq!(region.x, 35);
    }

    #[test]
    fn crop_ratio_approximates_target() {
        // The achieved ratio is within 1e-3 of the request for
        // reasonably sized sources.
        for (w, h, ratio) in [
            (1920, 1080, 1.0),
            (1080, 1920, 16.0 / 9.0),
            (1000, 1000, 10.0 / 9.0),
            (777, 1234, 9.0 / 16.0),
        ] {
            let region = crop_region(dims(w, h), ratio).unwrap();
            let achieved = f64::from(region.width) / f64::from(region.height);
            assert!(
                (achieved - ratio).abs() < 1e-3,
                "{w}x{h} at {ratio}: achieved {achieved}",
            );
        }
    }

    #[test]
    fn non_positive_ratio_is_rejected() {
        for ratio in [0.0, -2.0, f64::NAN] {
            assert!(matches!(
                crop_region(dims(100, 100), ratio),
                Err(PipelineError::Parameter(_)),
            ));
        }
    }

    #[test]
    fn degenerate_crop_is_rejected() {
        // 1 * 0.001 floors to width 0.
        assert!(matches!(
            crop_region(dims(100, 1), 0.001),
            Err(PipelineError::Parameter(_)),
        ));
    }

    // --- resize tests ---

    #[test]
    fn resize_produces_requested_widths() {
        let img = flat_image(100, 100);
        let result = resize_pixelated(&img, 10, 50).unwrap();
        assert_eq!(result.width(), 50);
        assert_eq!(result.height(), 50);
    }

    #[test]
    fn resize_heights_are_floored_proportionally() {
        // 100x75 down to width 16: height = floor(75 * 16 / 100) = 12,
        // then up to width 64: height = floor(12 * 64 / 16) = 48.
        let img = flat_image(100, 75);
        let result = resize_pixelated(&img, 16, 64).unwrap();
        assert_eq!(result.width(), 64);
        assert_eq!(result.height(), 48);
    }

    #[test]
    fn resize_height_never_reaches_zero() {
        // 100x2 down to width 8 would floor to height 0; it is held at 1.
        let img = flat_image(100, 2);
        let result = resize_pixelated(&img, 8, 16).unwrap();
        assert_eq!(result.height(), 2);
    }

    #[test]
    fn zero_targets_are_rejected() {
        let img = flat_image(10, 10);
        assert!(matches!(
            resize_pixelated(&img, 0, 10),
            Err(PipelineError::Parameter(_)),
        ));
        assert!(matches!(
            resize_pixelated(&img, 10, 0),
            Err(PipelineError::Parameter(_)),
        ));
    }

    #[test]
    fn upscale_only_targets_run_as_given() {
        // pixelation_size above the output resolution is not clamped.
        let img = flat_image(64, 64);
        let result = resize_pixelated(&img, 128, 32).unwrap();
        assert_eq!(result.width(), 32);
        assert_eq!(result.height(), 32);
    }

    #[test]
    fn pixelation_makes_blocks() {
        // A 4x4 image with distinct quadrant colors, pixelated through
        // a 2-wide intermediate back to 4 wide: each quadrant becomes
        // one flat 2x2 block.
        let img = RgbaImage::from_fn(4, 4, |x, y| match (x < 2, y < 2) {
            (true, true) => image::Rgba([255, 0, 0, 255]),
            (false, true) => image::Rgba([0, 255, 0, 255]),
            (true, false) => image::Rgba([0, 0, 255, 255]),
            (false, false) => image::Rgba([255, 255, 0, 255]),
        });
        let result = resize_pixelated(&img, 2, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let expected = *result.get_pixel(x / 2 * 2, y / 2 * 2);
                assert_eq!(*result.get_pixel(x, y), expected, "block at ({x}, {y})");
            }
        }
    }

    #[test]
    fn crop_and_pixelate_composes() {
        let img = flat_image(200, 100);
        let result = crop_and_pixelate(&img, 10, 40, 1.0).unwrap();
        assert_eq!(result.width(), 40);
        assert_eq!(result.height(), 40);
    }
}
