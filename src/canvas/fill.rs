//! 4-connected flood fill.
//!
//! Uses an explicit stack instead of recursion. The buffer's own colors act as the visited
//! set: a recolored pixel never matches the target again, which is only true because a fill
//! whose target already equals the fill color returns before the loop starts.

use super::{Color, PixelBuffer, Point};

/// What a call to [`flood_fill`] changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillReport {
    /// Number of pixels recolored. Zero for an out-of-bounds seed or a same-color fill.
    pub pixels_filled: usize,
}

impl FillReport {
    pub fn is_noop(&self) -> bool {
        self.pixels_filled == 0
    }
}

/// Recolors the region of pixels 4-connected to `seed` that share its RGB value.
///
/// Matching is exact on RGB and ignores alpha, so the fill stops at anti-aliased edges.
/// Written pixels get `fill` with alpha 255.
pub fn flood_fill(buffer: &mut PixelBuffer, seed: Point, fill: Color) -> FillReport {
    let Some(target) = buffer.rgb_at(seed) else {
        return FillReport::default();
    };

    // Required for termination, see module docs.
    if target == fill {
        return FillReport::default();
    }

    let mut stack = vec![seed];
    let mut pixels_filled = 0;

    while let Some(point) = stack.pop() {
        // Bounds are checked here rather than at push time.
        if buffer.rgb_at(point) != Some(target) {
            continue;
        }
        buffer.set_opaque(point, fill);
        pixels_filled += 1;
        stack.extend(point.neighbors());
    }

    log::debug!(
        "Flood fill at ({}, {}) recolored {} pixels to {}",
        seed.x,
        seed.y,
        pixels_filled,
        fill.to_hex()
    );

    FillReport { pixels_filled }
}
