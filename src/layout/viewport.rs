//! Scroll state and the virtual size of the scrolled area.

use super::{max_point, BASE_INDENT};
use crate::types::{Point, Rect, Size};
use crate::worksheet::Worksheet;

/// Pixels per scroll unit, both axes.
pub const SCROLL_RATE: i32 = 10;

/// Extra room below and right of the content.
const VIRTUAL_PADDING: i32 = 9;
const BOTTOM_PADDING: i32 = 10;

/// Viewport state: the visible client area over the virtual worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Client area in pixels.
    pub client: Size,
    /// Scroll offset in worksheet pixels, a multiple of [`SCROLL_RATE`].
    pub scroll: Point,
    /// Size of the scrollable area.
    pub virtual_size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            client: Size::new(width, height),
            scroll: Point::default(),
            virtual_size: Size::new(width, height),
        }
    }

    /// Recompute the virtual size from the content extent. With `scroll`,
    /// jump to the bottom when the content is taller than the client area.
    pub fn adjust_size(&mut self, ws: &Worksheet, scroll: bool) {
        let extent = if ws.is_empty() {
            Size::new(BASE_INDENT, BASE_INDENT)
        } else {
            max_point(ws)
        };
        let virtual_height = self.client.height.max(extent.height) + BOTTOM_PADDING;
        self.virtual_size = Size::new(
            extent.width + VIRTUAL_PADDING,
            virtual_height + VIRTUAL_PADDING,
        );
        if scroll && extent.height > self.client.height {
            self.scroll_to_units(0, (extent.height + VIRTUAL_PADDING) / SCROLL_RATE);
        } else {
            self.clamp_scroll();
        }
        tracing::debug!(
            width = self.virtual_size.width,
            height = self.virtual_size.height,
            "adjusted virtual size"
        );
    }

    /// Scroll to a position given in scroll units, clamped to the virtual area.
    pub fn scroll_to_units(&mut self, x: i32, y: i32) {
        self.scroll = Point::new(x * SCROLL_RATE, y * SCROLL_RATE);
        self.clamp_scroll();
    }

    /// Current position in scroll units.
    pub fn scroll_units(&self) -> Point {
        Point::new(self.scroll.x / SCROLL_RATE, self.scroll.y / SCROLL_RATE)
    }

    fn clamp_scroll(&mut self) {
        let max_x = (self.virtual_size.width - self.client.width).max(0);
        let max_y = (self.virtual_size.height - self.client.height).max(0);
        // Round up so the last partial unit stays reachable.
        let max_x = (max_x + SCROLL_RATE - 1) / SCROLL_RATE * SCROLL_RATE;
        let max_y = (max_y + SCROLL_RATE - 1) / SCROLL_RATE * SCROLL_RATE;
        self.scroll.x = self.scroll.x.clamp(0, max_x);
        self.scroll.y = self.scroll.y.clamp(0, max_y);
    }

    /// Window coordinates to worksheet coordinates.
    pub fn to_unscrolled(&self, p: Point) -> Point {
        Point::new(p.x + self.scroll.x, p.y + self.scroll.y)
    }

    /// The visible part of the worksheet.
    pub fn visible_rect(&self) -> Rect {
        Rect::new(
            self.scroll.x,
            self.scroll.y,
            self.client.width,
            self.client.height,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_worksheet_fills_client() {
        let mut vp = Viewport::new(300, 200);
        vp.adjust_size(&Worksheet::new(), true);
        assert_eq!(vp.virtual_size, Size::new(24, 219));
        assert_eq!(vp.scroll, Point::default());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut vp = Viewport::new(100, 100);
        vp.virtual_size = Size::new(100, 250);
        vp.scroll_to_units(3, 40);
        assert_eq!(vp.scroll, Point::new(0, 150));
        assert_eq!(vp.scroll_units(), Point::new(0, 15));
    }

    #[test]
    fn test_to_unscrolled() {
        let mut vp = Viewport::new(100, 100);
        vp.scroll = Point::new(10, 30);
        assert_eq!(vp.to_unscrolled(Point::new(5, 5)), Point::new(15, 35));
        assert_eq!(vp.visible_rect(), Rect::new(10, 30, 100, 100));
    }
}
