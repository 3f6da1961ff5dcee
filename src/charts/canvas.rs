//! Minimal raster drawing surface for report charts.
//!
//! Charts carry their captions (title, legend, annotation) as metadata for
//! the template. Axis labels are part of the raster and use the 8x8 bitmap
//! glyphs of `font8x8`, so rendering never depends on fonts installed on
//! the host.

use crate::core::format_number;
use crate::errors::Result;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const AXIS: Rgb<u8> = Rgb([64, 64, 64]);
pub const GRID: Rgb<u8> = Rgb([225, 225, 225]);

/// Side of one glyph cell at scale 1, in pixels.
pub const GLYPH: u32 = 8;
/// Gap between an axis and its labels.
const LABEL_GAP: f64 = 8.0;

fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
}

/// Pixel width of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: u32) -> f64 {
    (text.chars().count() as u32 * GLYPH * scale.max(1)) as f64
}

/// Pixel rectangle that holds the plotted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl PlotArea {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Horizontal center of slot `index` out of `slots` equal slots.
    pub fn slot_center(&self, index: usize, slots: usize) -> f64 {
        let slot = self.width as f64 / slots.max(1) as f64;
        self.left as f64 + slot * (index as f64 + 0.5)
    }

    pub fn slot_width(&self, slots: usize) -> f64 {
        self.width as f64 / slots.max(1) as f64
    }
}

/// Linear mapping from data values to pixel rows, zero-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    max: f64,
}

impl ValueScale {
    /// Scale covering `[0, max]` with a little headroom. Negative and
    /// non-finite inputs are ignored.
    pub fn covering(values: impl IntoIterator<Item = f64>) -> Self {
        let max = values
            .into_iter()
            .filter(|v| v.is_finite() && *v > 0.0)
            .fold(0.0_f64, f64::max);
        Self {
            max: if max > 0.0 { max * 1.1 } else { 1.0 },
        }
    }

    /// Scale covering `[0, max]` exactly. Non-positive maxima fall back to 1.
    pub fn fixed(max: f64) -> Self {
        Self {
            max: if max.is_finite() && max > 0.0 { max } else { 1.0 },
        }
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn y(&self, value: f64, area: &PlotArea) -> f64 {
        let ratio = (value / self.max).clamp(0.0, 1.0);
        area.bottom() as f64 - ratio * area.height as f64
    }
}

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill the rectangle spanning the two corners, clipped to the canvas.
    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
        let (left, right) = (x0.min(x1).round() as i64, x0.max(x1).round() as i64);
        let (top, bottom) = (y0.min(y1).round() as i64, y0.max(y1).round() as i64);
        for y in top..bottom {
            for x in left..right {
                self.put(x, y, color);
            }
        }
    }

    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>, thickness: u32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as i64;
        let half = thickness as i64 / 2;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = (x0 + (x1 - x0) * t).round() as i64;
            let y = (y0 + (y1 - y0) * t).round() as i64;
            for dy in -half..=half {
                for dx in -half..=half {
                    self.put(x + dx, y + dy, color);
                }
            }
        }
    }

    pub fn hline(&mut self, area: &PlotArea, y: f64, color: Rgb<u8>, thickness: u32) {
        self.line(area.left as f64, y, area.right() as f64, y, color, thickness);
    }

    pub fn dashed_hline(&mut self, area: &PlotArea, y: f64, color: Rgb<u8>, thickness: u32) {
        const DASH: u32 = 12;
        let mut x = area.left;
        while x < area.right() {
            let end = (x + DASH).min(area.right());
            self.line(x as f64, y, end as f64, y, color, thickness);
            x += DASH * 2;
        }
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], color: Rgb<u8>, thickness: u32) {
        for pair in points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            self.line(x0, y0, x1, y1, color, thickness);
        }
    }

    pub fn marker(&mut self, x: f64, y: f64, color: Rgb<u8>) {
        const SIZE: f64 = 5.0;
        self.fill_rect(x - SIZE, y - SIZE, x + SIZE, y + SIZE, color);
    }

    /// Axes and horizontal grid lines of a plot area.
    pub fn frame(&mut self, area: &PlotArea) {
        for step in 1..=4 {
            let y = area.bottom() as f64 - area.height as f64 * step as f64 / 4.0;
            self.hline(area, y, GRID, 1);
        }
        let (left, top, bottom) = (area.left as f64, area.top as f64, area.bottom() as f64);
        self.line(left, top, left, bottom, AXIS, 2);
        self.hline(area, bottom, AXIS, 2);
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Characters outside
    /// Basic Latin and Latin-1 are drawn as `?`.
    pub fn text(&mut self, x: f64, y: f64, text: &str, color: Rgb<u8>, scale: u32) {
        let scale = scale.max(1) as i64;
        let (x, y) = (x.round() as i64, y.round() as i64);
        for (index, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else {
                continue;
            };
            let origin = x + index as i64 * GLYPH as i64 * scale;
            for (row, bits) in rows.iter().enumerate() {
                for column in 0..GLYPH as i64 {
                    if bits & (1u8 << column) == 0 {
                        continue;
                    }
                    let (px, py) = (origin + column * scale, y + row as i64 * scale);
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.put(px + dx, py + dy, color);
                        }
                    }
                }
            }
        }
    }

    /// One label per slot, centered under the x axis. Labels shrink to
    /// scale 1 when any of them is wider than its slot at scale 2.
    pub fn x_labels<S: AsRef<str>>(&mut self, area: &PlotArea, labels: &[S]) {
        let slots = labels.len();
        let fits = labels
            .iter()
            .all(|l| text_width(l.as_ref(), 2) <= area.slot_width(slots));
        let scale = if fits { 2 } else { 1 };
        let y = area.bottom() as f64 + LABEL_GAP;
        for (index, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let x = area.slot_center(index, slots) - text_width(label, scale) / 2.0;
            self.text(x, y, label, AXIS, scale);
        }
    }

    /// Values of the four grid lines and the origin, right-aligned left of
    /// the y axis.
    pub fn y_labels(&mut self, area: &PlotArea, scale: &ValueScale) {
        for step in 0..=4 {
            let value = scale.max() * step as f64 / 4.0;
            let label = format_number((value * 1e4).round() / 1e4);
            let x = area.left as f64 - LABEL_GAP - text_width(&label, 1);
            let y = scale.y(value, area) - GLYPH as f64 / 2.0;
            self.text(x, y, &label, AXIS, 1);
        }
    }

    pub fn encode_png(self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(self.image)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(buffer)
    }
}
