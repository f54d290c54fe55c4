//! Image decoding and encoding at the pipeline boundary.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an RGBA
//! buffer; serializes the final buffer back to PNG. These are the only
//! two places where encoded bytes exist -- every stage in between works
//! on in-memory `RgbaImage` buffers.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::types::PipelineError;

/// Decode raw image bytes into an RGBA buffer.
///
/// Supports whatever formats the `image` crate is compiled with
/// (PNG, JPEG, BMP, WebP here).
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::Decode`] if the image format is
/// unrecognized or the data is corrupt.
#[must_use = "returns the decoded RGBA buffer"]
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

/// Encode an RGBA buffer as PNG bytes.
///
/// # Errors
///
/// Returns [`PipelineError::Encode`] if PNG serialization fails.
#[must_use = "returns the encoded PNG bytes"]
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(PipelineError::Encode)?;
    Ok(buf)
}

/// Check that an RGBA buffer of the given dimensions is representable
/// before asking `image` to allocate it.
///
/// The RGBA byte count is `width * height * 4`; if that exceeds
/// `usize::MAX` the buffer cannot exist on this target.
///
/// # Errors
///
/// Returns [`PipelineError::Allocation`] when the byte count
/// overflows.
pub fn ensure_allocatable(width: u32, height: u32) -> Result<(), PipelineError> {
    let bytes = u64::from(width) * u64::from(height) * 4;
    if usize::try_from(bytes).is_err() {
        return Err(PipelineError::Allocation { width, height });
    }
    Ok(())
}
