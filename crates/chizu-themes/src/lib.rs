//! chizu-themes: named color themes for pixel-art exports.
//!
//! A theme is an ordered palette plus display metadata. The pipeline
//! only cares about the palette (and its order, which breaks
//! nearest-color ties); the id/name/description exist for registries
//! and UIs. Built-in themes live in [`builtin`]; user-supplied themes
//! can be assembled from hex strings via [`palette_from_hex`].

pub mod builtin;

use serde::{Deserialize, Serialize};

use chizu_pipeline::{Palette, Rgb};

pub use builtin::{DEFAULT_THEME_ID, all_themes, default_theme, theme_by_id, theme_or_default};

/// A named, ordered color palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Stable identifier used for lookup and persistence
    /// (e.g. `"gameboy"`).
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// One-line description for selection UIs.
    pub description: String,
    /// The ordered palette; order is the nearest-color tie-break.
    pub palette: Palette,
}

/// Errors from assembling themes out of user-supplied data.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// A color string was not a 6-digit hex triplet.
    #[error("invalid hex color {0:?}: expected 6 hex digits, with or without a leading '#'")]
    InvalidHex(String),

    /// A theme was defined with no colors at all.
    #[error("theme palette must contain at least one color")]
    EmptyPalette,
}

/// Parse a `#rrggbb` hex color (leading `#` optional, case-insensitive).
///
/// # Errors
///
/// Returns [`ThemeError::InvalidHex`] for anything that is not exactly
/// six hex digits after the optional `#`.
pub fn parse_hex(hex: &str) -> Result<Rgb, ThemeError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ThemeError::InvalidHex(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ThemeError::InvalidHex(hex.to_string()))
    };
    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Build a palette from hex color strings, preserving order.
///
/// # Errors
///
/// Returns [`ThemeError::EmptyPalette`] for an empty list and
/// [`ThemeError::InvalidHex`] for the first unparsable entry.
pub fn palette_from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Palette, ThemeError> {
    if colors.is_empty() {
        return Err(ThemeError::EmptyPalette);
    }
    let colors = colors
        .iter()
        .map(|hex| parse_hex(hex.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Palette::new(colors))
}
