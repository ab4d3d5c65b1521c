//! Canvas 2D drawing surface.
//!
//! Implements [`DrawContext`] on a `CanvasRenderingContext2d` via web-sys.
//! Worksheet coordinates are translated by the scroll offset before they
//! reach the canvas.

use std::cell::RefCell;
use std::collections::HashMap;

use web_sys::CanvasRenderingContext2d;

use super::{DrawContext, Font, Rgb};
use crate::types::{Point, Rect, Size};

const TEXT_MEASURE_CACHE_CAP: usize = 4096;

#[allow(clippy::cast_possible_truncation)]
fn px(v: f64) -> i32 {
    v.ceil().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// A [`DrawContext`] over an HTML canvas.
pub struct CanvasContext {
    ctx: CanvasRenderingContext2d,
    /// Scroll offset subtracted from every coordinate.
    origin: Point,
    region: Option<Rect>,
    /// Width per `font\ntext` key.
    widths: RefCell<HashMap<String, i32>>,
}

impl CanvasContext {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_text_baseline("top");
        Self {
            ctx,
            origin: Point::default(),
            region: None,
            widths: RefCell::new(HashMap::new()),
        }
    }

    /// Map worksheet coordinates to the canvas: `scroll` is the top-left of
    /// the visible area, `region` the part being repainted.
    pub fn set_view(&mut self, scroll: Point, region: Option<Rect>) {
        self.origin = scroll;
        self.region = region;
    }

    fn x(&self, x: i32) -> f64 {
        f64::from(x - self.origin.x)
    }

    fn y(&self, y: i32) -> f64 {
        f64::from(y - self.origin.y)
    }

    /// Helper to get crisp pixel position for 1px lines
    fn crisp(v: f64) -> f64 {
        v.floor() + 0.5
    }
}

impl DrawContext for CanvasContext {
    fn text_extent(&self, text: &str, font: &Font) -> Size {
        let css = font.to_css();
        let height = font.size + font.size / 5;
        let key = format!("{css}\n{text}");
        if let Some(&width) = self.widths.borrow().get(&key) {
            return Size::new(width, height);
        }
        self.ctx.set_font(&css);
        let width = self
            .ctx
            .measure_text(text)
            .map(|m| px(m.width()))
            .unwrap_or(0);
        let mut widths = self.widths.borrow_mut();
        if widths.len() >= TEXT_MEASURE_CACHE_CAP {
            widths.clear();
        }
        widths.insert(key, width);
        Size::new(width, height)
    }

    fn set_font(&mut self, font: &Font) {
        self.ctx.set_font(&font.to_css());
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.ctx.set_fill_style_str(&color.to_hex());
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        let _ = self.ctx.fill_text(text, self.x(x), self.y(y));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&color.to_hex());
        self.ctx.set_line_width(1.0);
        self.ctx.move_to(Self::crisp(self.x(from.x)), Self::crisp(self.y(from.y)));
        self.ctx.line_to(Self::crisp(self.x(to.x)), Self::crisp(self.y(to.y)));
        self.ctx.stroke();
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Rgb, filled: bool) {
        let (x, y) = (self.x(rect.x), self.y(rect.y));
        let (w, h) = (f64::from(rect.width), f64::from(rect.height));
        if filled {
            self.ctx.set_fill_style_str(&color.to_hex());
            self.ctx.fill_rect(x, y, w, h);
        } else {
            self.ctx.set_stroke_style_str(&color.to_hex());
            self.ctx.set_line_width(1.0);
            self.ctx.stroke_rect(Self::crisp(x), Self::crisp(y), w - 1.0, h - 1.0);
        }
    }

    fn update_region(&self) -> Option<Rect> {
        self.region
    }

    fn clear(&mut self, color: Rgb) {
        let canvas = self.ctx.canvas();
        let (w, h) = canvas.map_or((0.0, 0.0), |c| (f64::from(c.width()), f64::from(c.height())));
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }
}
