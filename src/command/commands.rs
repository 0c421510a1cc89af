use image::RgbaImage;

use crate::canvas::{Color, PixelBuffer, Point, TextStamper, flood_fill, raster};
use crate::error::PaintResult;

/// A mutating action on the canvas.
///
/// Every command is applied to the live buffer once; undo works on snapshots taken
/// before the command ran, so commands have no inverse.
#[derive(Clone)]
pub enum Command {
    /// One segment of a brush or eraser stroke
    Segment {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    Rect {
        corner: Point,
        opposite: Point,
        color: Color,
        width: f32,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Color,
        width: f32,
    },
    Fill {
        seed: Point,
        color: Color,
    },
    Text {
        origin: Point,
        text: String,
        color: Color,
        size_px: f32,
    },
    /// Every pixel to transparent
    Clear,
    /// An imported image stretched over the canvas
    DrawBackground {
        image: RgbaImage,
    },
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Segment { from, to, width, .. } => f
                .debug_struct("Segment")
                .field("from", from)
                .field("to", to)
                .field("width", width)
                .finish(),
            Command::Line { from, to, width, .. } => f
                .debug_struct("Line")
                .field("from", from)
                .field("to", to)
                .field("width", width)
                .finish(),
            Command::Rect { corner, opposite, .. } => f
                .debug_struct("Rect")
                .field("corner", corner)
                .field("opposite", opposite)
                .finish(),
            Command::Circle { center, radius, .. } => f
                .debug_struct("Circle")
                .field("center", center)
                .field("radius", radius)
                .finish(),
            Command::Fill { seed, color } => f
                .debug_struct("Fill")
                .field("seed", seed)
                .field("color", &color.to_hex())
                .finish(),
            Command::Text { origin, text, .. } => f
                .debug_struct("Text")
                .field("origin", origin)
                .field("text", text)
                .finish(),
            Command::Clear => f.write_str("Clear"),
            Command::DrawBackground { image } => f
                .debug_struct("DrawBackground")
                .field("size", &image.dimensions())
                .finish(),
        }
    }
}

impl Command {
    /// Short display name for the history panel and logs
    pub fn label(&self) -> &'static str {
        match self {
            Command::Segment { .. } => "Stroke",
            Command::Line { .. } => "Line",
            Command::Rect { .. } => "Rectangle",
            Command::Circle { .. } => "Circle",
            Command::Fill { .. } => "Fill",
            Command::Text { .. } => "Text",
            Command::Clear => "Clear",
            Command::DrawBackground { .. } => "Background",
        }
    }

    /// Applies the command to `buffer`.
    ///
    /// Only text can fail, when no font is loaded, and then the buffer is untouched.
    pub fn apply(&self, buffer: &mut PixelBuffer, text: &TextStamper) -> PaintResult<()> {
        match self {
            Command::Segment { from, to, color, width } | Command::Line { from, to, color, width } => {
                raster::draw_segment(buffer, *from, *to, *color, *width);
            }
            Command::Rect { corner, opposite, color, width } => {
                raster::draw_rect_outline(buffer, *corner, *opposite, *color, *width);
            }
            Command::Circle { center, radius, color, width } => {
                raster::draw_circle_outline(buffer, *center, *radius, *color, *width);
            }
            Command::Fill { seed, color } => {
                flood_fill(buffer, *seed, *color);
            }
            Command::Text { origin, text: content, color, size_px } => {
                text.stamp(buffer, *origin, content, *color, *size_px)?;
            }
            Command::Clear => buffer.clear(),
            Command::DrawBackground { image } => buffer.draw_image_scaled(image),
        }
        Ok(())
    }
}
