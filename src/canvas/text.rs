use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};

use super::{Color, PixelBuffer, Point};
use crate::error::{PaintError, PaintResult};

/// Rasterizes text onto a buffer with an optionally loaded font.
///
/// Text sits on its alphabetic baseline at the given y coordinate, so glyphs extend
/// upwards from `origin`.
#[derive(Default)]
pub struct TextStamper {
    font: Option<FontVec>,
}

impl TextStamper {
    /// A stamper with no font. Stamping fails with [`PaintError::FontUnavailable`].
    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> PaintResult<Self> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| PaintError::Font(e.to_string()))?;
        Ok(Self { font: Some(font) })
    }

    pub fn from_path(path: &Path) -> PaintResult<Self> {
        log::info!("Loading text tool font from {}", path.display());
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draws `text` in `color` at `size_px`, baseline-left at `origin`.
    pub fn stamp(
        &self,
        buffer: &mut PixelBuffer,
        origin: Point,
        text: &str,
        color: Color,
        size_px: f32,
    ) -> PaintResult<()> {
        let font = self.font.as_ref().ok_or(PaintError::FontUnavailable)?;
        let scale = PxScale::from(size_px.max(1.0));
        let scaled = font.as_scaled(scale);

        let mut caret = point(origin.x as f32, origin.y as f32);
        let mut previous: Option<GlyphId> = None;

        for c in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                caret.x += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let at = Point::new(bounds.min.x as i32 + gx as i32, bounds.min.y as i32 + gy as i32);
                    buffer.blend(at, color, coverage);
                });
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for TextStamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStamper")
            .field("font", &self.font.as_ref().map(|_| "<font>"))
            .finish()
    }
}
