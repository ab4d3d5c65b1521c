//! Rendering through a pluggable drawing surface.
//!
//! This module provides:
//! - the [`DrawContext`] trait every surface implements
//! - the paint loop that draws the laid-out worksheet and its selection
//! - an offscreen RGBA surface with PNG output ([`bitmap`])
//! - an HTML canvas surface (wasm32 only)

pub mod bitmap;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;

pub use bitmap::{BitmapOut, PixelSurface};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasContext;
pub use colors::{palette, Rgb};

use crate::cell;
use crate::config::Configuration;
use crate::layout;
use crate::types::{CellId, Point, Rect, Selection, SelectionMode, Size};
use crate::worksheet::Worksheet;

/// Font request passed to a surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: String,
    /// Point size, already clamped to the configured minimum.
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
}

impl Font {
    /// CSS shorthand, e.g. `italic bold 12px monospace`.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        if self.italic {
            css.push_str("italic ");
        }
        if self.bold {
            css.push_str("bold ");
        }
        css.push_str(&format!("{}px {}", self.size, self.family));
        css
    }
}

/// A surface the worksheet can measure text on and paint to.
///
/// Coordinates are unscrolled worksheet pixels; `draw_text` positions the
/// top-left corner of the text box.
pub trait DrawContext {
    /// Width and height of `text` in `font`.
    fn text_extent(&self, text: &str, font: &Font) -> Size;

    fn set_font(&mut self, font: &Font);

    fn set_text_color(&mut self, color: Rgb);

    fn draw_text(&mut self, text: &str, x: i32, y: i32);

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb);

    fn draw_rectangle(&mut self, rect: Rect, color: Rgb, filled: bool);

    /// The rectangle that needs repainting. `None` means everything.
    fn update_region(&self) -> Option<Rect>;

    fn clear(&mut self, color: Rgb);
}

/// A drawing surface that owns its pixels.
pub trait OffscreenSurface: DrawContext {
    fn resize(&mut self, width: u32, height: u32);

    /// Row-major RGBA bytes, `width * height * 4` long.
    fn rgba(&self) -> &[u8];

    fn width(&self) -> u32;

    fn height(&self) -> u32;
}

/// True if `rect` needs painting on `dc`.
pub fn in_update_region(dc: &dyn DrawContext, rect: &Rect) -> bool {
    dc.update_region()
        .map_or(true, |region| region.intersects(rect))
}

/// Paint the laid-out worksheet, then the selection boxes.
///
/// Cells must already be placed by [`layout::recalculate`].
pub fn paint(
    ws: &Worksheet,
    config: &Configuration,
    dc: &mut dyn DrawContext,
    selection: Option<&Selection>,
) {
    dc.clear(config.background_color());
    let mut drawn = 0usize;
    for id in ws.draw_order() {
        let Some(point) = ws.get(id).map(cell::Cell::current_point) else {
            continue;
        };
        cell::draw(ws, id, point, config, dc);
        drawn += 1;
    }
    tracing::trace!(cells = drawn, "painted worksheet");
    if let Some(sel) = selection {
        paint_selection(ws, dc, sel);
    }
}

fn paint_selection(ws: &Worksheet, dc: &mut dyn DrawContext, sel: &Selection) {
    match sel.mode {
        SelectionMode::WholeLine if sel.is_single() => {
            if let Some(rect) = ws.get(sel.start).map(cell::Cell::rect) {
                dc.draw_rectangle(rect, palette::SELECTION, false);
            }
        }
        SelectionMode::WholeLine => {
            let mut cur = Some(sel.start);
            let mut first = true;
            while let Some(id) = cur {
                let starts_line = ws.get(id).is_some_and(cell::Cell::break_line_here);
                if first || starts_line {
                    dc.draw_rectangle(line_rect(ws, id), palette::SELECTION, false);
                }
                first = false;
                if id == sel.end {
                    break;
                }
                cur = ws.get(id).and_then(cell::Cell::draw_next);
            }
        }
        SelectionMode::Drag => {
            let mut cur = Some(sel.start);
            while let Some(id) = cur {
                if let Some(rect) = ws.get(id).map(cell::Cell::rect) {
                    dc.draw_rectangle(rect, palette::SELECTION, false);
                }
                if id == sel.end {
                    break;
                }
                cur = ws.get(id).and_then(cell::Cell::draw_next);
            }
        }
    }
}

/// Bounding box of the visual line that starts at `id`.
fn line_rect(ws: &Worksheet, id: CellId) -> Rect {
    let Some(cell) = ws.get(id) else {
        return Rect::default();
    };
    let origin = cell.current_point();
    let center = layout::line_max_center(ws, id);
    let drop = layout::line_max_drop(ws, id);
    let mut right = origin.x + cell.width();
    let mut cur = cell.draw_next();
    while let Some(next) = cur.and_then(|n| ws.get(n)) {
        if next.break_line_here() {
            break;
        }
        right = next.current_point().x + next.width();
        cur = next.draw_next();
    }
    Rect::new(origin.x, origin.y - center, right - origin.x, center + drop)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_font_css() {
        let font = Font {
            family: "serif".into(),
            size: 14,
            bold: true,
            italic: true,
            underlined: false,
        };
        assert_eq!(font.to_css(), "italic bold 14px serif");
    }
}
