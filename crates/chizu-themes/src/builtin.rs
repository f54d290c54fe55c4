//! The built-in theme registry.
//!
//! Five shipped themes, from the 4-color Game Boy green ramp up to a
//! 64-color indie palette. Palettes are const data (no runtime hex
//! parsing) and entry order is load-bearing: it decides nearest-color
//! ties, so reordering a palette changes exported images.

use chizu_pipeline::Rgb;

use crate::Theme;

/// Shorthand for palette tables.
const fn c(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}

/// 16-bit era vibrant colors: green, blue, and earth ramps plus
/// grayscale.
#[rustfmt::skip]
const CLASSIC_JRPG: [Rgb; 32] = [
    c(0x0f, 0x38, 0x0f), c(0x1a, 0x4d, 0x1a), c(0x2d, 0x6b, 0x2d), c(0x4a, 0x9d, 0x4a),
    c(0x6b, 0xc9, 0x6b), c(0x8a, 0xe6, 0x8a), c(0xa8, 0xff, 0xa8), c(0xc0, 0xff, 0xc0),
    c(0x1a, 0x4d, 0x9d), c(0x2d, 0x6b, 0xc9), c(0x4a, 0x9d, 0xff), c(0x6b, 0xc9, 0xff),
    c(0x8a, 0xe6, 0xff), c(0xc0, 0xf0, 0xff), c(0x8b, 0x45, 0x13), c(0xa0, 0x52, 0x2d),
    c(0xcd, 0x85, 0x3f), c(0xda, 0xa5, 0x20), c(0xf4, 0xa4, 0x60), c(0xff, 0xd7, 0x00),
    c(0xff, 0x63, 0x47), c(0xff, 0x45, 0x00), c(0xdc, 0x14, 0x3c), c(0xb2, 0x22, 0x22),
    c(0xff, 0xff, 0xff), c(0xd3, 0xd3, 0xd3), c(0xa9, 0xa9, 0xa9), c(0x69, 0x69, 0x69),
    c(0x40, 0x40, 0x40), c(0x2f, 0x2f, 0x2f), c(0x1a, 0x1a, 0x1a), c(0x00, 0x00, 0x00),
];

/// 4-color green monochrome, darkest to lightest.
const GAMEBOY: [Rgb; 4] = [
    c(0x0f, 0x38, 0x0f),
    c(0x30, 0x62, 0x30),
    c(0x8b, 0xac, 0x0f),
    c(0x9b, 0xbc, 0x0f),
];

/// 8-bit limited palette.
#[rustfmt::skip]
const NES_ADVENTURE: [Rgb; 16] = [
    c(0x00, 0x00, 0x00), c(0xfc, 0xfc, 0xfc), c(0xf8, 0xf8, 0xf8), c(0xbc, 0xbc, 0xbc),
    c(0x7c, 0x7c, 0x7c), c(0xa4, 0xe4, 0xfc), c(0x3c, 0xbc, 0xfc), c(0x00, 0x78, 0xf8),
    c(0x00, 0x00, 0xfc), c(0x00, 0xb8, 0x00), c(0x00, 0xa8, 0x00), c(0x00, 0xd8, 0x00),
    c(0x58, 0xf8, 0x98), c(0xa4, 0xa4, 0xa4), c(0xd8, 0xb0, 0x40), c(0xfc, 0xfc, 0x00),
];

/// Indie game expanded palette. Contains a handful of deliberate
/// duplicates; the lower index wins nearest-color ties, so they are
/// harmless but must stay where they are.
#[rustfmt::skip]
const MODERN_PIXEL: [Rgb; 56] = [
    c(0x14, 0x0c, 0x1c), c(0x44, 0x24, 0x34), c(0x30, 0x34, 0x6d), c(0x4e, 0x4a, 0x4e),
    c(0x85, 0x4c, 0x30), c(0x34, 0x65, 0x24), c(0xd0, 0x46, 0x48), c(0x75, 0x71, 0x61),
    c(0x59, 0x7d, 0xce), c(0xd2, 0x7d, 0x2c), c(0x85, 0x95, 0xa1), c(0x6d, 0xaa, 0x2c),
    c(0xd2, 0xaa, 0x99), c(0x6d, 0xc2, 0xca), c(0xda, 0xd4, 0x5e), c(0xde, 0xee, 0xd6),
    c(0x2e, 0x1f, 0x27), c(0x3a, 0x44, 0x66), c(0x4e, 0x9f, 0x64), c(0x8c, 0xd6, 0x12),
    c(0xe4, 0x94, 0x3a), c(0x9e, 0x45, 0x39), c(0xcd, 0x68, 0x3d), c(0xe6, 0xc2, 0xa2),
    c(0x5a, 0x39, 0x21), c(0x8b, 0x6d, 0x46), c(0xc0, 0x94, 0x73), c(0xdd, 0xc9, 0xa3),
    c(0x4d, 0x9b, 0xe6), c(0x8a, 0xd2, 0xe6), c(0xb4, 0xe6, 0xf0), c(0xf0, 0xfc, 0xfc),
    c(0x3e, 0x21, 0x37), c(0x73, 0x46, 0x4c), c(0xa5, 0x30, 0x30), c(0xe0, 0x3c, 0x28),
    c(0xe0, 0x70, 0x40), c(0xff, 0xa0, 0x40), c(0xff, 0xe7, 0x62), c(0xcf, 0xe2, 0xf2),
    c(0x8b, 0x9b, 0xb4), c(0x5a, 0x69, 0x88), c(0x3a, 0x44, 0x66), c(0x26, 0x2b, 0x44),
    c(0x18, 0x14, 0x25), c(0xb8, 0x6f, 0x50), c(0xf2, 0xa6, 0x5a), c(0xff, 0xe4, 0x78),
    c(0xcf, 0xe2, 0xf2), c(0x8b, 0x9b, 0xb4), c(0x5a, 0x69, 0x88), c(0x3a, 0x44, 0x66),
    c(0x4d, 0x9b, 0xe6), c(0x22, 0xd5, 0xde), c(0x66, 0xff, 0xd4), c(0xe0, 0xfe, 0xff),
];

/// 8-color pastel flat design tuned for map features: tan land, blue
/// water, gray roads, off-white buildings.
const MINIMAL_RETRO: [Rgb; 8] = [
    c(0xe6, 0xd6, 0x90),
    c(0x93, 0xb7, 0xbe),
    c(0x5b, 0x60, 0x57),
    c(0xf2, 0xe5, 0xd5),
    c(0xd4, 0xa5, 0x9a),
    c(0xa6, 0xc4, 0x8a),
    c(0x4a, 0x58, 0x59),
    c(0xff, 0xff, 0xff),
];

/// Id of the theme [`theme_or_default`] falls back to.
pub const DEFAULT_THEME_ID: &str = "classic-jrpg";

/// Registry rows: id, name, description, palette.
const REGISTRY: [(&str, &str, &str, &[Rgb]); 5] = [
    (
        "classic-jrpg",
        "Classic JRPG",
        "16-bit era vibrant colors",
        &CLASSIC_JRPG,
    ),
    (
        "gameboy",
        "Game Boy Classic",
        "4-color green monochrome",
        &GAMEBOY,
    ),
    (
        "nes-adventure",
        "NES Adventure",
        "8-bit limited palette",
        &NES_ADVENTURE,
    ),
    (
        "modern-pixel",
        "Modern Pixel",
        "Indie game expanded palette",
        &MODERN_PIXEL,
    ),
    (
        "minimal-retro",
        "Minimal Retro",
        "8-color pastel flat design",
        &MINIMAL_RETRO,
    ),
];

/// All built-in themes, in registry order.
#[must_use]
pub fn all_themes() -> Vec<Theme> {
    REGISTRY.iter().map(|row| theme_from_row(*row)).collect()
}

/// Look up a built-in theme by id.
#[must_use]
pub fn theme_by_id(id: &str) -> Option<Theme> {
    REGISTRY
        .iter()
        .find(|(theme_id, ..)| *theme_id == id)
        .map(|row| theme_from_row(*row))
}

/// Look up a built-in theme by id, falling back to
/// [`DEFAULT_THEME_ID`] for unknown ids.
#[must_use]
pub fn theme_or_default(id: &str) -> Theme {
    theme_by_id(id).unwrap_or_else(default_theme)
}

/// The default theme ([`DEFAULT_THEME_ID`]).
#[must_use]
pub fn default_theme() -> Theme {
    theme_from_row(REGISTRY[0])
}

fn theme_from_row((id, name, description, palette): (&str, &str, &str, &[Rgb])) -> Theme {
    Theme {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        palette: chizu_pipeline::Palette::new(palette.to_vec()),
    }
}
