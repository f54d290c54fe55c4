//! Nearest-color palette mapping.
//!
//! Two levels of nearest-neighbor search, both by Euclidean RGB
//! distance with a strict `<` scan (first minimum wins, so lower
//! indices break ties):
//!
//! 1. Each extracted posterized color is mapped to its nearest theme
//!    palette entry, producing a [`ColorMapping`].
//! 2. Each pixel is mapped to the nearest *mapping entry* and recolored
//!    to that entry's target.
//!
//! The second search deliberately goes through the mapping rather than
//! straight to the theme: a pixel whose exact value is somehow absent
//! from the extracted set still resolves by distance instead of
//! failing, and pixels beyond the extraction cap inherit the mapping
//! of the nearest captured color.

use image::RgbaImage;

use crate::types::{Palette, Rgb};

/// An ordered list of source-to-target color pairs, built once per
/// invocation and applied to every pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMapping(Vec<(Rgb, Rgb)>);

impl ColorMapping {
    /// Map each extracted color to its nearest palette entry.
    ///
    /// Entry order follows the extraction order, which makes the
    /// per-pixel tie-break deterministic as well.
    #[must_use]
    pub fn build(extracted: &[Rgb], palette: &Palette) -> Self {
        Self(
            extracted
                .iter()
                .map(|&source| (source, nearest(palette.colors(), source).unwrap_or(source)))
                .collect(),
        )
    }

    /// The `(source, target)` pairs in order.
    #[must_use]
    pub fn entries(&self) -> &[(Rgb, Rgb)] {
        &self.0
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The target color of the entry whose source is nearest to
    /// `color`, or `None` for an empty mapping.
    ///
    /// Strict `<` scan: on exact ties the earliest entry wins.
    #[must_use]
    pub fn nearest_target(&self, color: Rgb) -> Option<Rgb> {
        let mut best: Option<(Rgb, u32)> = None;
        for &(source, target) in &self.0 {
            let distance = source.distance_squared(color);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((target, distance));
            }
        }
        best.map(|(target, _)| target)
    }
}

/// Recolor every pixel through the mapping, preserving alpha.
///
/// An empty mapping (only possible for an empty input buffer, since
/// extraction always yields at least one color otherwise) returns the
/// buffer unchanged.
#[must_use = "returns the recolored buffer"]
pub fn apply_mapping(image: &RgbaImage, mapping: &ColorMapping) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let target = mapping
            .nearest_target(Rgb::new(r, g, b))
            .unwrap_or(Rgb::new(r, g, b));
        image::Rgba([target.r, target.g, target.b, a])
    })
}

/// Linear nearest-color scan with strict `<` comparison.
///
/// The first color achieving the minimum distance is kept, so on exact
/// ties the lowest index wins. Returns `None` only for an empty slice.
fn nearest(candidates: &[Rgb], color: Rgb) -> Option<Rgb> {
    let mut best: Option<(Rgb, u32)> = None;
    for &candidate in candidates {
        let distance = candidate.distance_squared(color);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(candidate, _)| candidate)
}
