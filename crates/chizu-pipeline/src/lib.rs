//! chizu-pipeline: pure pixel-art stylization pipeline (sans-IO).
//!
//! Turns a captured map screenshot into a limited-palette pixel-art
//! image through a fixed chain of per-pixel and per-neighborhood
//! transforms:
//!
//! decode -> crop/pixelate -> tone -> edge darkening ->
//! posterize (ordered dither) -> palette extraction ->
//! nearest-color mapping -> encode.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns encoded bytes or structured errors. Screen
//! capture, theme storage, and file persistence are the caller's
//! business.
//!
//! Every stage allocates a fresh output buffer and never mutates its
//! input; stage N+1 starts only after stage N's buffer is complete.
//! Given identical inputs and options the output is byte-identical --
//! the dither bias is a fixed spatial pattern, not randomness.

pub mod codec;
pub mod crop;
pub mod diagnostics;
pub mod edge;
pub mod map;
pub mod palette;
pub mod pipeline;
pub mod posterize;
pub mod presets;
pub mod tone;
pub mod types;

pub use edge::EdgeMode;
pub use map::ColorMapping;
pub use pipeline::Pipeline;
pub use types::{Dimensions, Palette, PipelineError, ProcessingOptions, Rgb, RgbaImage};

/// Crop to the target aspect ratio and pixelate, returning PNG bytes.
///
/// Runs decode -> centered crop -> down/up nearest-neighbor resize ->
/// encode. This is the raw capture-to-pixelation step used before
/// theming; no tone, edge, or palette work happens here.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] or [`PipelineError::Decode`]
/// for unusable input bytes, [`PipelineError::Parameter`] for
/// non-positive sizes or aspect ratio (or a crop that collapses to
/// zero extent), [`PipelineError::Allocation`] if a working buffer is
/// not representable, and [`PipelineError::Encode`] if PNG
/// serialization fails.
pub fn pixelate(
    image: &[u8],
    pixelation_size: u32,
    output_resolution: u32,
    aspect_ratio: f64,
) -> Result<Vec<u8>, PipelineError> {
    let decoded = codec::decode(image)?;
    let pixelated = crop::crop_and_pixelate(
        &decoded,
        pixelation_size,
        output_resolution,
        aspect_ratio,
    )?;
    codec::encode_png(&pixelated)
}

/// Apply tone, edge, posterization, and palette mapping to an already
/// pixelated image, returning PNG bytes.
///
/// Runs decode -> tone (skipped at identity parameters) -> edge
/// darkening (skipped for [`EdgeMode::None`]) -> ordered-dither
/// posterization -> palette extraction -> nearest-color mapping ->
/// encode. The geometry fields of `options` are not used here; see
/// [`process`] for the full chain.
///
/// Every pixel of the output is an exact member of `palette`.
///
/// # Errors
///
/// Returns [`PipelineError::Parameter`] for an empty palette or
/// out-of-range options, plus the decode/encode errors of
/// [`pixelate`].
pub fn apply_theme(
    image: &[u8],
    palette: &Palette,
    options: &ProcessingOptions,
) -> Result<Vec<u8>, PipelineError> {
    options.validate()?;
    if palette.is_empty() {
        return Err(PipelineError::Parameter(
            "theme palette must not be empty".to_string(),
        ));
    }

    let decoded = codec::decode(image)?;
    let themed = stylize(&decoded, palette, options);
    codec::encode_png(&themed)
}

/// Run the full capture-to-export chain: pixelate, then theme, with a
/// single decode and encode.
///
/// # Errors
///
/// Returns every error [`pixelate`] and [`apply_theme`] can produce.
pub fn process(
    image: &[u8],
    palette: &Palette,
    options: &ProcessingOptions,
) -> Result<Vec<u8>, PipelineError> {
    options.validate()?;
    if palette.is_empty() {
        return Err(PipelineError::Parameter(
            "theme palette must not be empty".to_string(),
        ));
    }

    let decoded = codec::decode(image)?;
    let pixelated = crop::crop_and_pixelate(
        &decoded,
        options.pixelation_size,
        options.output_resolution,
        options.aspect_ratio,
    )?;
    let themed = stylize(&pixelated, palette, options);
    codec::encode_png(&themed)
}

/// Stages 3-7 over a decoded buffer: tone, edge, posterize, extract,
/// map.
fn stylize(image: &RgbaImage, palette: &Palette, options: &ProcessingOptions) -> RgbaImage {
    let toned = if tone::is_identity(options.contrast, options.saturation) {
        image.clone()
    } else {
        tone::adjust_tone(image, options.contrast, options.saturation)
    };
    let outlined = enhance_if_enabled(&toned, options.edge_mode);
    let posterized = posterize::posterize(&outlined, options.dither_intensity);
    let extracted = palette::extract_palette(&posterized);
    let mapping = ColorMapping::build(&extracted, palette);
    map::apply_mapping(&posterized, &mapping)
}

/// Edge stage with the `None` skip folded in.
fn enhance_if_enabled(image: &RgbaImage, mode: EdgeMode) -> RgbaImage {
    if mode.is_enabled() {
        edge::enhance_edges(image, mode)
    } else {
        image.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Encode an RGBA image as an in-memory PNG.
    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        codec::encode_png(img).unwrap()
    }

    /// A 2x2 image whose top row is white and bottom row black.
    fn quadrant_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(2, 2, |_, y| {
            if y == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        });
        png_bytes(&img)
    }

    fn bw_palette() -> Palette {
        Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)])
    }

    /// Options with every optional stage at its identity value.
    fn plain_options() -> ProcessingOptions {
        ProcessingOptions {
            pixelation_size: 1,
            output_resolution: 2,
            aspect_ratio: 1.0,
            dither_intensity: 0.0,
            edge_mode: EdgeMode::None,
            contrast: 1.0,
            saturation: 1.0,
        }
    }

    // --- pixelate ---

    #[test]
    fn pixelate_produces_requested_output_size() {
        let img = RgbaImage::from_pixel(100, 80, image::Rgba([90, 120, 150, 255]));
        let result = pixelate(&png_bytes(&img), 16, 64, 1.0).unwrap();
        let decoded = codec::decode(&result).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 64);
    }

    #[test]
    fn pixelate_rejects_empty_input() {
        assert!(matches!(
            pixelate(&[], 16, 64, 1.0),
            Err(PipelineError::EmptyInput),
        ));
    }

    #[test]
    fn pixelate_rejects_zero_sizes() {
        let img = RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 0, 255]));
        let bytes = png_bytes(&img);
        assert!(matches!(
            pixelate(&bytes, 0, 64, 1.0),
            Err(PipelineError::Parameter(_)),
        ));
        assert!(matches!(
            pixelate(&bytes, 16, 0, 1.0),
            Err(PipelineError::Parameter(_)),
        ));
        assert!(matches!(
            pixelate(&bytes, 16, 64, -1.0),
            Err(PipelineError::Parameter(_)),
        ));
    }

    // --- apply_theme ---

    #[test]
    fn quadrants_resolve_to_matching_luminance() {
        // White quadrants map to the white palette entry and black to
        // black, with every optional stage at identity.
        let result = apply_theme(&quadrant_png(), &bw_palette(), &plain_options()).unwrap();
        let decoded = codec::decode(&result).unwrap();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(decoded.get_pixel(1, 0).0, [255, 255, 255, 255]);
        assert_eq!(decoded.get_pixel(0, 1).0, [0, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn output_colors_are_palette_members() {
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            image::Rgba([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 255])
        });
        let palette = Palette::new(vec![
            Rgb::new(15, 56, 15),
            Rgb::new(48, 98, 48),
            Rgb::new(139, 172, 15),
            Rgb::new(155, 188, 15),
        ]);
        let options = ProcessingOptions {
            dither_intensity: 0.7,
            edge_mode: EdgeMode::Soft,
            contrast: 1.15,
            saturation: 1.2,
            ..ProcessingOptions::default()
        };
        let result = apply_theme(&png_bytes(&img), &palette, &options).unwrap();
        let decoded = codec::decode(&result).unwrap();
        for pixel in decoded.pixels() {
            let [r, g, b, _] = pixel.0;
            assert!(
                palette.contains(Rgb::new(r, g, b)),
                "pixel {:?} is not in the palette",
                pixel.0,
            );
        }
    }

    #[test]
    fn zero_dither_output_is_byte_identical_across_runs() {
        let img = RgbaImage::from_fn(12, 12, |x, y| {
            image::Rgba([(x * 20) as u8, (y * 20) as u8, 77, 255])
        });
        let bytes = png_bytes(&img);
        let options = ProcessingOptions {
            dither_intensity: 0.0,
            ..ProcessingOptions::default()
        };
        let palette = bw_palette();
        let first = apply_theme(&bytes, &palette, &options).unwrap();
        let second = apply_theme(&bytes, &palette, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn apply_theme_rejects_empty_palette() {
        let result = apply_theme(&quadrant_png(), &Palette::new(vec![]), &plain_options());
        assert!(matches!(result, Err(PipelineError::Parameter(_))));
    }

    #[test]
    fn apply_theme_rejects_invalid_options() {
        let options = ProcessingOptions {
            dither_intensity: 2.0,
            ..plain_options()
        };
        let result = apply_theme(&quadrant_png(), &bw_palette(), &options);
        assert!(matches!(result, Err(PipelineError::Parameter(_))));
    }

    #[test]
    fn apply_theme_rejects_corrupt_bytes() {
        let result = apply_theme(&[0xBA, 0xD0], &bw_palette(), &plain_options());
        assert!(matches!(result, Err(PipelineError::Decode(_))));
    }

    #[test]
    fn single_color_palette_floods_the_image() {
        let palette = Palette::new(vec![Rgb::new(155, 188, 15)]);
        let result = apply_theme(&quadrant_png(), &palette, &plain_options()).unwrap();
        let decoded = codec::decode(&result).unwrap();
        for pixel in decoded.pixels() {
            assert_eq!(pixel.0, [155, 188, 15, 255]);
        }
    }

    // --- process ---

    #[test]
    fn process_crops_resizes_and_themes() {
        let img = RgbaImage::from_fn(120, 60, |x, _| {
            if x < 60 {
                image::Rgba([250, 250, 250, 255])
            } else {
                image::Rgba([5, 5, 5, 255])
            }
        });
        let options = ProcessingOptions {
            pixelation_size: 4,
            output_resolution: 16,
            aspect_ratio: 1.0,
            dither_intensity: 0.0,
            edge_mode: EdgeMode::None,
            contrast: 1.0,
            saturation: 1.0,
        };
        let result = process(&png_bytes(&img), &bw_palette(), &options).unwrap();
        let decoded = codec::decode(&result).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 16);
        for pixel in decoded.pixels() {
            let [r, g, b, _] = pixel.0;
            assert!(bw_palette().contains(Rgb::new(r, g, b)));
        }
    }

    #[test]
    fn process_matches_pixelate_then_apply_theme() {
        let img = RgbaImage::from_fn(64, 64, |x, y| {
            image::Rgba([(x * 4) as u8, (y * 4) as u8, 130, 255])
        });
        let bytes = png_bytes(&img);
        let options = ProcessingOptions {
            pixelation_size: 8,
            output_resolution: 32,
            aspect_ratio: 1.0,
            dither_intensity: 0.4,
            edge_mode: EdgeMode::Selective,
            contrast: 1.15,
            saturation: 0.7,
        };
        let palette = bw_palette();

        let direct = process(&bytes, &palette, &options).unwrap();
        let pixelated = pixelate(
            &bytes,
            options.pixelation_size,
            options.output_resolution,
            options.aspect_ratio,
        )
        .unwrap();
        let two_step = apply_theme(&pixelated, &palette, &options).unwrap();
        assert_eq!(direct, two_step);
    }
}
