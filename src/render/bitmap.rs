//! Offscreen rendering to RGBA pixels and PNG.
//!
//! [`PixelSurface`] measures text with fixed per-glyph metrics and paints
//! each glyph as a solid box. It needs no fonts, so results are the same on
//! every platform; hosts wanting real glyphs render through their own
//! [`DrawContext`].

use std::io::Write;
use std::path::Path;

use super::{paint, DrawContext, Font, OffscreenSurface, Rgb};
use crate::config::Configuration;
use crate::error::{MathviewError, Result};
use crate::layout::{self, BASE_INDENT};
use crate::types::{Point, Rect, Size};
use crate::worksheet::Worksheet;

/// Line-break width used for bitmaps: effectively unlimited.
const BITMAP_BREAK_WIDTH: i32 = 100_000;

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn to_u32(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}

/// An in-memory RGBA surface.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    /// Device pixels per worksheet pixel.
    scale: i32,
    pixels: Vec<u8>,
    font: Option<Font>,
    color: Rgb,
    region: Option<Rect>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_scale(width, height, 1)
    }

    /// A surface `width` x `height` worksheet pixels, `scale` times the resolution.
    pub fn with_scale(width: u32, height: u32, scale: i32) -> Self {
        let scale = scale.max(1);
        let mut surface = Self {
            width: 0,
            height: 0,
            scale,
            pixels: Vec::new(),
            font: None,
            color: Rgb::default(),
            region: None,
        };
        surface.resize(width, height);
        surface
    }

    /// Limit painting to `region`.
    pub fn set_update_region(&mut self, region: Option<Rect>) {
        self.region = region;
    }

    /// RGBA of one device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = usize::try_from((u64::from(y) * u64::from(self.width) + u64::from(x)) * 4).ok()?;
        let px = self.pixels.get(i..i + 4)?;
        let mut out = [0u8; 4];
        out.copy_from_slice(px);
        Some(out)
    }

    fn glyph_advance(font: &Font) -> i32 {
        (font.size * 6 / 10).max(1)
    }

    fn line_height(font: &Font) -> i32 {
        (font.size * 12 / 10).max(1)
    }

    /// Fill a rectangle given in worksheet pixels.
    fn fill(&mut self, rect: Rect, color: Rgb) {
        let s = self.scale;
        let (w, h) = (to_i32(self.width), to_i32(self.height));
        let x0 = rect.x.saturating_mul(s).clamp(0, w);
        let x1 = rect.right().saturating_mul(s).clamp(0, w);
        let y0 = rect.y.saturating_mul(s).clamp(0, h);
        let y1 = rect.bottom().saturating_mul(s).clamp(0, h);
        let rgba = color.to_rgba();
        let stride = usize::try_from(self.width).unwrap_or(0) * 4;
        for y in y0..y1 {
            let row = usize::try_from(y).unwrap_or(0) * stride;
            let start = row + usize::try_from(x0).unwrap_or(0) * 4;
            let end = row + usize::try_from(x1).unwrap_or(0) * 4;
            if let Some(span) = self.pixels.get_mut(start..end) {
                for px in span.chunks_exact_mut(4) {
                    px.copy_from_slice(&rgba);
                }
            }
        }
    }
}

impl DrawContext for PixelSurface {
    fn text_extent(&self, text: &str, font: &Font) -> Size {
        let glyphs = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        Size::new(
            glyphs.saturating_mul(Self::glyph_advance(font)),
            Self::line_height(font),
        )
    }

    fn set_font(&mut self, font: &Font) {
        self.font = Some(font.clone());
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        let Some(font) = self.font.clone() else {
            return;
        };
        let advance = Self::glyph_advance(&font);
        let height = Self::line_height(&font);
        let color = self.color;
        let mut pen = x;
        for c in text.chars() {
            if !c.is_whitespace() {
                let glyph = Rect::new(pen, y + height / 4, (advance - 1).max(1), (height / 2).max(1));
                self.fill(glyph, color);
            }
            pen += advance;
        }
        if font.underlined {
            self.fill(Rect::new(x, y + height - 1, pen - x, 1), color);
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb) {
        // Bresenham.
        let (dx, dy) = ((to.x - from.x).abs(), -(to.y - from.y).abs());
        let (sx, sy) = (if from.x < to.x { 1 } else { -1 }, if from.y < to.y { 1 } else { -1 });
        let (mut x, mut y, mut err) = (from.x, from.y, dx + dy);
        loop {
            self.fill(Rect::new(x, y, 1, 1), color);
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Rgb, filled: bool) {
        if filled {
            self.fill(rect, color);
            return;
        }
        self.fill(Rect::new(rect.x, rect.y, rect.width, 1), color);
        self.fill(Rect::new(rect.x, rect.bottom() - 1, rect.width, 1), color);
        self.fill(Rect::new(rect.x, rect.y, 1, rect.height), color);
        self.fill(Rect::new(rect.right() - 1, rect.y, 1, rect.height), color);
    }

    fn update_region(&self) -> Option<Rect> {
        self.region
    }

    fn clear(&mut self, color: Rgb) {
        let rgba = color.to_rgba();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }
}

impl OffscreenSurface for PixelSurface {
    fn resize(&mut self, width: u32, height: u32) {
        let scale = to_u32(self.scale).max(1);
        self.width = width.saturating_mul(scale);
        self.height = height.saturating_mul(scale);
        let len = usize::try_from(u64::from(self.width) * u64::from(self.height) * 4).unwrap_or(0);
        self.pixels = vec![0; len];
    }

    fn rgba(&self) -> &[u8] {
        &self.pixels
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Renders a list of cells to a bitmap, for HTML export and clipboard images.
#[derive(Debug)]
pub struct BitmapOut {
    scale: i32,
    surface: Option<PixelSurface>,
}

impl BitmapOut {
    /// `scale` multiplies the resolution; values below 1 mean 1.
    pub fn new(scale: i32) -> Self {
        Self {
            scale: scale.max(1),
            surface: None,
        }
    }

    /// Lay out and paint `ws`. Returns false if the result would exceed
    /// `max_size` device pixels, or if there is nothing to draw.
    pub fn set_data(&mut self, mut ws: Worksheet, config: &Configuration, max_size: Option<u64>) -> bool {
        self.surface = None;
        if ws.is_empty() {
            return false;
        }
        let mut surface = PixelSurface::with_scale(1, 1, self.scale);
        layout::recalculate_widths(&mut ws, None, config, &surface);
        layout::break_lines(&mut ws, None, BITMAP_BREAK_WIDTH);
        layout::recalculate_heights(&mut ws, None, config);
        layout::place(&mut ws);

        let extent = layout::max_point(&ws);
        let (width, height) = (to_u32(extent.width), to_u32(extent.height + BASE_INDENT));
        let scale = u64::from(to_u32(self.scale));
        let area = u64::from(width) * scale * u64::from(height) * scale;
        if max_size.is_some_and(|max| area > max) {
            tracing::warn!(area, ?max_size, "bitmap too large");
            return false;
        }
        surface.resize(width, height);
        paint(&ws, config, &mut surface, None);
        tracing::debug!(width, height, scale = self.scale, "rendered bitmap");
        self.surface = Some(surface);
        true
    }

    /// The rendered surface, if [`BitmapOut::set_data`] succeeded.
    pub fn surface(&self) -> Option<&PixelSurface> {
        self.surface.as_ref()
    }

    /// Pixel size of the rendered bitmap.
    pub fn size(&self) -> Size {
        self.surface.as_ref().map_or(Size::INVALID, |s| {
            Size::new(to_i32(s.width()), to_i32(s.height()))
        })
    }

    /// Encode the bitmap as PNG into `out`.
    pub fn write_png<W: Write>(&self, out: W) -> Result<()> {
        let surface = self
            .surface
            .as_ref()
            .ok_or_else(|| MathviewError::Export("no bitmap rendered".into()))?;
        let mut encoder = png::Encoder::new(out, surface.width(), surface.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(surface.rgba())?;
        writer.finish()?;
        Ok(())
    }

    /// PNG bytes of the bitmap.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Write the bitmap to `path` as PNG. Returns its pixel size, or
    /// [`Size::INVALID`] if nothing could be written.
    pub fn to_file(&self, path: &Path) -> Size {
        match self.try_to_file(path) {
            Ok(()) => self.size(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "bitmap export failed");
                Size::INVALID
            }
        }
    }

    fn try_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_png(std::io::BufWriter::new(file))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::types::TextStyle;

    fn font(size: i32) -> Font {
        Font {
            family: "monospace".into(),
            size,
            bold: false,
            italic: false,
            underlined: false,
        }
    }

    #[test]
    fn test_fixed_metrics() {
        let dc = PixelSurface::new(1, 1);
        assert_eq!(dc.text_extent("abc", &font(10)), Size::new(18, 12));
        assert_eq!(dc.text_extent("", &font(10)), Size::new(0, 12));
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut dc = PixelSurface::new(4, 4);
        dc.draw_rectangle(Rect::new(-2, -2, 4, 4), Rgb::new(255, 0, 0), true);
        assert_eq!(dc.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(dc.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(dc.pixel(4, 0), None);
    }

    #[test]
    fn test_scale_multiplies_pixels() {
        let mut dc = PixelSurface::with_scale(2, 2, 3);
        assert_eq!((dc.width(), dc.height()), (6, 6));
        dc.draw_rectangle(Rect::new(1, 1, 1, 1), Rgb::new(0, 0, 255), true);
        assert_eq!(dc.pixel(3, 5), Some([0, 0, 255, 255]));
        assert_eq!(dc.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_bitmap_out_png() {
        let mut ws = Worksheet::new();
        ws.append(Cell::text("x", TextStyle::Variable));
        let mut bmp = BitmapOut::new(1);
        assert!(bmp.set_data(ws, &Configuration::default(), None));
        let size = bmp.size();
        assert!(size.width > 0 && size.height > 0);
        let png = bmp.to_png().unwrap();
        assert_eq!(png.get(1..4), Some(&b"PNG"[..]));
    }

    #[test]
    fn test_bitmap_out_respects_max_size() {
        let mut ws = Worksheet::new();
        ws.append(Cell::text("x", TextStyle::Variable));
        let mut bmp = BitmapOut::new(2);
        assert!(!bmp.set_data(ws, &Configuration::default(), Some(10)));
        assert_eq!(bmp.size(), Size::INVALID);
    }

    #[test]
    fn test_to_file_reports_failure() {
        let bmp = BitmapOut::new(1);
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(bmp.to_file(&dir.path().join("x.png")), Size::INVALID);
    }
}
