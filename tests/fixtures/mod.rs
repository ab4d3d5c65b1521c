//! Builders for worksheets and a deterministic measuring surface.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::Cell as Counter;

use mathview::render::{DrawContext, Font, Rgb};
use mathview::{Cell, CellId, Point, Rect, Size, TextStyle, Worksheet};

/// A surface where every glyph is `size / 2` wide and a line is `size + 4`
/// high. Nothing is painted; text draws are counted.
#[derive(Debug, Default)]
pub struct FixedSurface {
    pub measured: Counter<usize>,
    pub drawn: usize,
}

impl FixedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyph_width(font: &Font) -> i32 {
        (font.size / 2).max(1)
    }
}

impl DrawContext for FixedSurface {
    fn text_extent(&self, text: &str, font: &Font) -> Size {
        self.measured.set(self.measured.get() + 1);
        let chars = i32::try_from(text.chars().count()).unwrap();
        Size::new(chars * Self::glyph_width(font), font.size + 4)
    }

    fn set_font(&mut self, _font: &Font) {}

    fn set_text_color(&mut self, _color: Rgb) {}

    fn draw_text(&mut self, _text: &str, _x: i32, _y: i32) {
        self.drawn += 1;
    }

    fn draw_line(&mut self, _from: Point, _to: Point, _color: Rgb) {}

    fn draw_rectangle(&mut self, _rect: Rect, _color: Rgb, _filled: bool) {}

    fn update_region(&self) -> Option<Rect> {
        None
    }

    fn clear(&mut self, _color: Rgb) {}
}

/// One input/output group as it arrives from the engine.
#[derive(Debug, Clone)]
pub struct Group {
    pub input: String,
    pub output: Vec<(String, TextStyle)>,
}

impl Group {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            output: Vec::new(),
        }
    }

    pub fn out(mut self, text: &str, style: TextStyle) -> Self {
        self.output.push((text.to_string(), style));
        self
    }
}

/// Builder for a session of numbered groups.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    groups: Vec<Group>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Cells of group `n` (1-based): prompt, input, then a label and the
    /// output if there is any.
    pub fn cells(n: usize, group: &Group) -> Vec<Cell> {
        let mut cells = vec![
            Cell::text(&format!("(%i{n}) "), TextStyle::MainPrompt),
            Cell::text(&group.input, TextStyle::Input),
        ];
        if !group.output.is_empty() {
            cells.push(Cell::text(&format!("(%o{n}) "), TextStyle::Label));
            for (text, style) in &group.output {
                cells.push(Cell::text(text, *style));
            }
        }
        cells
    }

    /// All groups as one top-level list.
    pub fn build(&self) -> Worksheet {
        let mut ws = Worksheet::new();
        for (i, group) in self.groups.iter().enumerate() {
            for cell in Self::cells(i + 1, group) {
                ws.append(cell);
            }
        }
        ws
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
}

/// A session of `count` groups computing `x+n`.
pub fn sum_session(count: usize) -> SessionBuilder {
    (1..=count).fold(SessionBuilder::new(), |b, n| {
        b.group(
            Group::new(&format!("x+{n};"))
                .out("x", TextStyle::Variable)
                .out("+", TextStyle::Default)
                .out(&n.to_string(), TextStyle::Number),
        )
    })
}

/// Ids of the cells with `style`, in logical order.
pub fn ids_with_style(ws: &Worksheet, style: TextStyle) -> Vec<CellId> {
    ws.logical()
        .filter(|&id| ws.get(id).is_some_and(|c| c.style() == style))
        .collect()
}
