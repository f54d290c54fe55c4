//! Selectable parameter values offered by the capture app.
//!
//! The pipeline itself accepts any value that passes
//! [`ProcessingOptions::validate`](crate::ProcessingOptions::validate);
//! these tables are the curated steps surfaced to users, kept here so
//! tooling (the bench CLI, future frontends) agrees on them.

/// Viewport aspect ratios: square, wide, portrait, and the 10:9 of
/// classic handheld screens.
pub const ASPECT_RATIOS: [(&str, f64); 4] = [
    ("1:1", 1.0),
    ("16:9", 16.0 / 9.0),
    ("9:16", 9.0 / 16.0),
    ("10:9", 10.0 / 9.0),
];

/// Low-resolution widths, from chunky 16-pixel blocks to fine 192.
pub const PIXELATION_SIZES: [u32; 10] = [16, 24, 32, 48, 64, 80, 96, 128, 160, 192];

/// Output widths.
pub const OUTPUT_RESOLUTIONS: [u32; 4] = [512, 1024, 2048, 4096];

/// Dither strengths, none to maximum.
pub const DITHER_INTENSITIES: [f32; 5] = [0.0, 0.2, 0.4, 0.7, 1.0];

/// Contrast multipliers.
pub const CONTRAST_LEVELS: [f32; 6] = [0.7, 0.85, 1.0, 1.15, 1.3, 1.5];

/// Saturation multipliers (0 is black & white).
pub const SATURATION_LEVELS: [f32; 6] = [0.0, 0.5, 0.7, 1.0, 1.2, 1.5];
