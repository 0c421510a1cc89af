//! Hard-edged rasterisers for the stroke and shape tools.
//!
//! Points name pixel centers. A pixel is painted when its center lies within half the
//! stroke width of the shape's path, so a width of 1 yields a one pixel wide path.

use super::{Color, PixelBuffer, Point};

/// Thinnest path we draw, so that widths below 1 still leave a mark
const MIN_HALF_WIDTH: f32 = 0.5;

fn half_width(width: f32) -> f32 {
    (width / 2.0).max(MIN_HALF_WIDTH)
}

/// Paints every in-bounds pixel of the box `min..=max` for which `inside` holds.
fn paint_where(
    buffer: &mut PixelBuffer,
    min: (f32, f32),
    max: (f32, f32),
    color: Color,
    inside: impl Fn(f32, f32) -> bool,
) {
    if buffer.width() == 0 || buffer.height() == 0 {
        return;
    }
    let x0 = min.0.floor().max(0.0) as i32;
    let y0 = min.1.floor().max(0.0) as i32;
    let x1 = max.0.ceil().min(buffer.width() as f32 - 1.0) as i32;
    let y1 = max.1.ceil().min(buffer.height() as f32 - 1.0) as i32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            if inside(x as f32, y as f32) {
                buffer.set_opaque(Point::new(x, y), color);
            }
        }
    }
}

fn distance_to_segment(px: f32, py: f32, from: Point, to: Point) -> f32 {
    let (ax, ay) = (from.x as f32, from.y as f32);
    let (bx, by) = (to.x as f32, to.y as f32);
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// A straight segment with round caps. A zero-length segment draws a dot.
pub fn draw_segment(buffer: &mut PixelBuffer, from: Point, to: Point, color: Color, width: f32) {
    let half = half_width(width);
    let min = (from.x.min(to.x) as f32 - half, from.y.min(to.y) as f32 - half);
    let max = (from.x.max(to.x) as f32 + half, from.y.max(to.y) as f32 + half);
    paint_where(buffer, min, max, color, |x, y| {
        distance_to_segment(x, y, from, to) <= half
    });
}

/// Outline of the axis-aligned rectangle spanned by two opposite corners.
pub fn draw_rect_outline(
    buffer: &mut PixelBuffer,
    corner: Point,
    opposite: Point,
    color: Color,
    width: f32,
) {
    let half = half_width(width);
    let (left, right) = (corner.x.min(opposite.x) as f32, corner.x.max(opposite.x) as f32);
    let (top, bottom) = (corner.y.min(opposite.y) as f32, corner.y.max(opposite.y) as f32);

    paint_where(
        buffer,
        (left - half, top - half),
        (right + half, bottom + half),
        color,
        |x, y| {
            let outer = x >= left - half && x <= right + half && y >= top - half && y <= bottom + half;
            let interior = x > left + half && x < right - half && y > top + half && y < bottom - half;
            outer && !interior
        },
    );
}

/// Outline of a circle. A radius of zero draws a dot.
pub fn draw_circle_outline(
    buffer: &mut PixelBuffer,
    center: Point,
    radius: f32,
    color: Color,
    width: f32,
) {
    let half = half_width(width);
    let radius = radius.max(0.0);
    let reach = radius + half;
    let (cx, cy) = (center.x as f32, center.y as f32);

    paint_where(
        buffer,
        (cx - reach, cy - reach),
        (cx + reach, cy + reach),
        color,
        |x, y| {
            let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            (distance - radius).abs() <= half
        },
    );
}
