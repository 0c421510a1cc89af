//! The pixel canvas: an RGBA grid plus the algorithms that paint onto it.
//!
//! Coordinates are signed so that neighbours of edge pixels can be expressed and
//! rejected by a bounds check instead of wrapping.

pub mod fill;
pub mod raster;
pub mod text;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{PaintError, PaintResult};

pub use fill::{FillReport, flood_fill};
pub use text::TextStamper;

/// An opaque 8-bit RGB color. Alpha is forced to 255 whenever it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` color as produced by an HTML color input.
    pub fn from_hex(hex: &str) -> PaintResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(PaintError::InvalidColor(hex.to_owned()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| PaintError::InvalidColor(hex.to_owned()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgb(color.r, color.g, color.b)
    }
}

impl From<egui::Color32> for Color {
    fn from(color: egui::Color32) -> Self {
        Color::rgb(color.r(), color.g(), color.b())
    }
}

/// An integer position in buffer space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 4-connected neighbours: east, west, south, north.
    pub fn neighbors(self) -> [Point; 4] {
        [
            Point::new(self.x + 1, self.y),
            Point::new(self.x - 1, self.y),
            Point::new(self.x, self.y + 1),
            Point::new(self.x, self.y - 1),
        ]
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A mutable width x height grid of RGBA pixels, row-major with the origin top-left.
#[derive(Clone)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Creates a buffer with every pixel set to `color`, fully opaque.
    pub fn new(width: u32, height: u32, color: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color.to_rgba()),
        }
    }

    /// Creates a fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Number of RGBA bytes a `width` x `height` buffer holds, `None` on overflow.
    pub fn byte_len(width: u32, height: u32) -> Option<usize> {
        (width as usize).checked_mul(height as usize)?.checked_mul(4)
    }

    /// Wraps raw RGBA bytes. Returns `None` unless the length matches the size exactly.
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        if Self::byte_len(width, height) != Some(bytes.len()) {
            return None;
        }
        RgbaImage::from_raw(width, height, bytes).map(Self::from_image)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width() as usize, self.height() as usize]
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as u32) < self.width()
            && (point.y as u32) < self.height()
    }

    /// The RGB value at `point`, ignoring alpha. `None` outside the buffer.
    pub fn rgb_at(&self, point: Point) -> Option<Color> {
        self.rgba_at(point).map(|[r, g, b, _]| Color::rgb(r, g, b))
    }

    pub fn rgba_at(&self, point: Point) -> Option<[u8; 4]> {
        if !self.contains(point) {
            return None;
        }
        Some(self.image.get_pixel(point.x as u32, point.y as u32).0)
    }

    /// Writes `color` with alpha forced to 255. Out-of-bounds writes are ignored.
    pub fn set_opaque(&mut self, point: Point, color: Color) {
        if self.contains(point) {
            self.image
                .put_pixel(point.x as u32, point.y as u32, color.to_rgba());
        }
    }

    /// Source-over blend of `color` at `coverage` (0.0..=1.0).
    pub fn blend(&mut self, point: Point, color: Color, coverage: f32) {
        if !self.contains(point) {
            return;
        }
        let coverage = coverage.clamp(0.0, 1.0);
        if coverage <= 0.0 {
            return;
        }
        let pixel = self.image.get_pixel_mut(point.x as u32, point.y as u32);
        blend_pixel(pixel, [color.r, color.g, color.b], coverage);
    }

    /// Sets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.image.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
    }

    /// Draws `image` stretched over the whole buffer, compositing by its alpha.
    pub fn draw_image_scaled(&mut self, image: &RgbaImage) {
        let scaled;
        let source = if image.dimensions() == self.image.dimensions() {
            image
        } else {
            scaled = image::imageops::resize(
                image,
                self.width(),
                self.height(),
                image::imageops::FilterType::Triangle,
            );
            &scaled
        };
        for (dst, src) in self.image.pixels_mut().zip(source.pixels()) {
            let [r, g, b, a] = src.0;
            blend_pixel(dst, [r, g, b], a as f32 / 255.0);
        }
    }

    /// Replaces the contents with `other`. Pixels outside `other` are left as they are
    /// when the sizes differ.
    pub fn copy_from(&mut self, other: &PixelBuffer) {
        if other.image.dimensions() == self.image.dimensions() {
            self.image.clone_from(&other.image);
            return;
        }
        let width = self.width().min(other.width());
        let height = self.height().min(other.height());
        for y in 0..height {
            for x in 0..width {
                self.image.put_pixel(x, y, *other.image.get_pixel(x, y));
            }
        }
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.image.dimensions() == other.image.dimensions()
            && self.image.as_raw() == other.image.as_raw()
    }
}

impl Eq for PixelBuffer {}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

fn blend_pixel(pixel: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let dst_alpha = pixel.0[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for channel in 0..3 {
        let src = rgb[channel] as f32;
        let dst = pixel.0[channel] as f32;
        let value = (src * alpha + dst * dst_alpha * (1.0 - alpha)) / out_alpha;
        pixel.0[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    pixel.0[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}
