//! Worksheet cells.
//!
//! A [`Cell`] carries the data every cell kind shares (style, geometry, line
//! flags and the three links into the worksheet) plus a closed [`CellKind`].
//! Operations that need to look at neighbours or inner lists are free
//! functions over the [`Worksheet`] arena.

pub mod diff;
pub(crate) mod symbols;
pub mod text;
pub(crate) mod tooltips;

pub use diff::DiffCell;
pub use text::TextCell;

use crate::config::{Configuration, Epochs};
use crate::render::DrawContext;
use crate::types::{CellId, CellType, Point, Rect, TextStyle};
use crate::worksheet::Worksheet;

/// Padding around the text of a text cell.
pub const TEXT_PADDING: i32 = 1;

/// Smallest height any cell reports.
const MIN_HEIGHT: i32 = 4;

/// Font size and setting epochs a cell's geometry was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Measured {
    pub font_size: i32,
    pub epochs: Epochs,
}

/// Kind-specific payload.
#[derive(Debug, Clone)]
pub enum CellKind {
    Text(TextCell),
    Diff(DiffCell),
}

/// A node of the worksheet.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) style: TextStyle,
    pub(crate) cell_type: CellType,

    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) center: i32,
    pub(crate) current_point: Point,

    pub(crate) force_break_line: bool,
    /// Set by the line breaker when this cell starts a visual line.
    pub(crate) break_line: bool,
    pub(crate) is_broken_into_lines: bool,
    pub(crate) is_hidden: bool,
    pub(crate) suppress_multiplication_dot: bool,
    pub(crate) is_hidable_mult_sign: bool,
    pub(crate) big_skip: bool,
    pub(crate) draw_next_is_next: bool,

    pub(crate) next: Option<CellId>,
    pub(crate) previous: Option<CellId>,
    pub(crate) draw_next: Option<CellId>,

    pub(crate) tool_tip: Option<String>,
    pub(crate) alt_copy_text: Option<String>,

    /// Font size of the last measurement; the fallback for invalid requests.
    pub(crate) font_size: i32,
    pub(crate) measured: Option<Measured>,

    pub(crate) kind: CellKind,
}

impl Cell {
    fn with_kind(kind: CellKind, style: TextStyle) -> Self {
        Self {
            style,
            cell_type: style.cell_type(),
            width: 0,
            height: -1,
            center: -1,
            current_point: Point::default(),
            force_break_line: false,
            break_line: false,
            is_broken_into_lines: false,
            is_hidden: false,
            suppress_multiplication_dot: false,
            is_hidable_mult_sign: false,
            big_skip: true,
            draw_next_is_next: true,
            next: None,
            previous: None,
            draw_next: None,
            tool_tip: None,
            alt_copy_text: None,
            font_size: 10,
            measured: None,
            kind,
        }
    }

    /// A text cell showing `text` in `style`.
    pub fn text(text: &str, style: TextStyle) -> Self {
        let mut cell = Self::with_kind(CellKind::Text(TextCell::default()), TextStyle::Default);
        cell.set_style(style);
        cell.apply_value(text, None);
        cell
    }

    /// A derivative cell with empty diff and base lists.
    pub fn diff() -> Self {
        Self::with_kind(CellKind::Diff(DiffCell::default()), TextStyle::Default)
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    pub fn as_text(&self) -> Option<&TextCell> {
        match &self.kind {
            CellKind::Text(t) => Some(t),
            CellKind::Diff(_) => None,
        }
    }

    pub fn as_diff(&self) -> Option<&DiffCell> {
        match &self.kind {
            CellKind::Diff(d) => Some(d),
            CellKind::Text(_) => None,
        }
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Change the style. Labels and prompts get a hard line break.
    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
        self.cell_type = style.cell_type();
        if let CellKind::Text(t) = &mut self.kind {
            t.style_changed(style);
        }
        if style.forces_line_break() {
            self.force_break_line = true;
        }
        self.reset_size();
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn set_type(&mut self, cell_type: CellType) {
        self.cell_type = cell_type;
        if let CellKind::Text(t) = &mut self.kind {
            t.clear_extents();
        }
        self.reset_size();
    }

    /// Replace the text of a text cell. `previous` is the plain-text form
    /// of the logically preceding cell, used for context-dependent tooltips.
    pub(crate) fn apply_value(&mut self, text: &str, previous: Option<&str>) {
        let style = self.style;
        if let CellKind::Text(t) = &mut self.kind {
            self.tool_tip = t.set_value(text, style, previous);
        }
        self.reset_size();
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Distance from the top to the baseline.
    pub fn center(&self) -> i32 {
        self.center
    }

    /// Distance from the baseline to the bottom.
    pub fn drop(&self) -> i32 {
        self.height - self.center
    }

    pub fn current_point(&self) -> Point {
        self.current_point
    }

    /// Bounding box at the last placed position.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.current_point.x,
            self.current_point.y - self.center,
            self.width,
            self.height,
        )
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.rect().contains(p)
    }

    /// True if this cell starts a visual line.
    pub fn break_line_here(&self) -> bool {
        self.break_line || self.force_break_line
    }

    pub fn force_break_line(&mut self, force: bool) {
        self.force_break_line = force;
    }

    pub fn forced_break(&self) -> bool {
        self.force_break_line
    }

    pub fn is_broken_into_lines(&self) -> bool {
        self.is_broken_into_lines
    }

    pub fn set_broken_into_lines(&mut self, broken: bool) {
        self.is_broken_into_lines = broken;
        self.reset_size();
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.is_hidden = hidden;
        self.reset_size();
    }

    pub fn is_hidable_mult_sign(&self) -> bool {
        self.is_hidable_mult_sign
    }

    pub fn set_hidable_mult_sign(&mut self, hidable: bool) {
        self.is_hidable_mult_sign = hidable;
        self.reset_size();
    }

    pub fn suppress_multiplication_dot(&self) -> bool {
        self.suppress_multiplication_dot
    }

    pub fn set_suppress_multiplication_dot(&mut self, suppress: bool) {
        self.suppress_multiplication_dot = suppress;
    }

    pub fn big_skip(&self) -> bool {
        self.big_skip
    }

    pub fn set_big_skip(&mut self, big_skip: bool) {
        self.big_skip = big_skip;
    }

    pub fn next(&self) -> Option<CellId> {
        self.next
    }

    pub fn previous(&self) -> Option<CellId> {
        self.previous
    }

    pub fn draw_next(&self) -> Option<CellId> {
        self.draw_next
    }

    /// False while a label or prompt has its output folded away.
    pub fn draw_next_is_next(&self) -> bool {
        self.draw_next_is_next
    }

    pub fn tool_tip(&self) -> Option<&str> {
        self.tool_tip.as_deref()
    }

    pub fn set_tool_tip(&mut self, tip: Option<String>) {
        self.tool_tip = tip;
    }

    pub fn alt_copy_text(&self) -> Option<&str> {
        self.alt_copy_text.as_deref()
    }

    pub fn set_alt_copy_text(&mut self, text: Option<String>) {
        self.alt_copy_text = text.filter(|t| !t.is_empty());
    }

    /// Tooltip for the pointer: labels show the other label text.
    pub fn hover_text(&self) -> Option<&str> {
        if let CellKind::Text(t) = &self.kind {
            match self.style {
                TextStyle::UserLabel => return Some(t.text()),
                TextStyle::Label if !t.user_defined_label().is_empty() => {
                    return Some(t.user_defined_label());
                }
                _ => {}
            }
        }
        self.tool_tip()
    }

    /// Forget cached geometry.
    pub fn reset_size(&mut self) {
        self.measured = None;
    }

    /// True if the multiplication sign this cell represents is not shown.
    pub(crate) fn hides_mult_sign(&self, config: &Configuration) -> bool {
        self.is_hidden || (config.hide_multiplication_sign() && self.is_hidable_mult_sign)
    }

    pub(crate) fn needs_recalculation(&self, font_size: i32, config: &Configuration) -> bool {
        let stale = self.measured
            != Some(Measured {
                font_size,
                epochs: config.epochs(),
            });
        match &self.kind {
            CellKind::Text(t) => stale || t.needs_recalculation(self.style, config),
            CellKind::Diff(_) => stale,
        }
    }

    pub(crate) fn mark_measured(&mut self, font_size: i32, config: &Configuration) {
        self.measured = Some(Measured {
            font_size,
            epochs: config.epochs(),
        });
    }

    /// Data copied along with a cell; links and geometry are not.
    pub(crate) fn detached_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.next = None;
        copy.previous = None;
        copy.draw_next = None;
        copy.draw_next_is_next = true;
        copy.break_line = false;
        copy.current_point = Point::default();
        copy.measured = None;
        if let CellKind::Diff(d) = &mut copy.kind {
            d.diff = None;
            d.base = None;
        }
        copy
    }
}

/// Heads of the inner lists owned by `id`, in storage order.
pub fn inner_cells(ws: &Worksheet, id: CellId) -> Vec<CellId> {
    match ws.get(id).map(Cell::kind) {
        Some(CellKind::Diff(d)) => [d.base, d.diff].into_iter().flatten().collect(),
        _ => Vec::new(),
    }
}

/// Measure `id` (and its inner lists) at `font_size`.
pub fn recalculate_widths(
    ws: &mut Worksheet,
    id: CellId,
    font_size: i32,
    config: &Configuration,
    dc: &dyn DrawContext,
) {
    let is_diff = matches!(ws.get(id).map(Cell::kind), Some(CellKind::Diff(_)));
    if is_diff {
        diff::recalculate_widths(ws, id, font_size, config, dc);
    } else if let Some(cell) = ws.get_mut(id) {
        text::recalculate_widths(cell, font_size, config, dc);
    }
}

/// Recompute height and baseline of `id`.
pub fn recalculate_height(ws: &mut Worksheet, id: CellId, font_size: i32, config: &Configuration) {
    let is_diff = matches!(ws.get(id).map(Cell::kind), Some(CellKind::Diff(_)));
    if is_diff {
        diff::recalculate_height(ws, id, font_size, config);
    } else if let Some(cell) = ws.get_mut(id) {
        cell.height = cell.height.max(MIN_HEIGHT);
        cell.center = cell.height / 2;
    }
}

/// Paint `id` at `point` if it lies in the update region.
pub fn draw(
    ws: &Worksheet,
    id: CellId,
    point: Point,
    config: &Configuration,
    dc: &mut dyn DrawContext,
) {
    let Some(cell) = ws.get(id) else {
        return;
    };
    match &cell.kind {
        CellKind::Text(t) => text::draw(cell, t, point, config, dc),
        CellKind::Diff(d) => diff::draw(ws, cell, d, point, config, dc),
    }
}

pub fn recalculate_widths_list(
    ws: &mut Worksheet,
    head: CellId,
    font_size: i32,
    config: &Configuration,
    dc: &dyn DrawContext,
) {
    let ids: Vec<CellId> = ws.logical_from(head).collect();
    for id in ids {
        recalculate_widths(ws, id, font_size, config, dc);
    }
}

pub fn recalculate_height_list(
    ws: &mut Worksheet,
    head: CellId,
    font_size: i32,
    config: &Configuration,
) {
    let ids: Vec<CellId> = ws.logical_from(head).collect();
    for id in ids {
        recalculate_height(ws, id, font_size, config);
    }
}

/// Sum of the widths of an inner list.
pub fn full_width(ws: &Worksheet, head: Option<CellId>) -> i32 {
    head.map_or(0, |h| {
        ws.logical_from(h)
            .filter_map(|id| ws.get(id))
            .map(Cell::width)
            .sum()
    })
}

/// Largest center of an inner list.
pub fn center_list(ws: &Worksheet, head: Option<CellId>) -> i32 {
    head.map_or(0, |h| {
        ws.logical_from(h)
            .filter_map(|id| ws.get(id))
            .map(Cell::center)
            .max()
            .unwrap_or(0)
    })
}

/// Largest drop of an inner list.
pub fn max_drop(ws: &Worksheet, head: Option<CellId>) -> i32 {
    head.map_or(0, |h| {
        ws.logical_from(h)
            .filter_map(|id| ws.get(id))
            .map(Cell::drop)
            .max()
            .unwrap_or(0)
    })
}

/// Give every cell of an inner list its position, left to right from `point`.
pub fn place_list(ws: &mut Worksheet, head: Option<CellId>, mut point: Point) {
    let Some(head) = head else {
        return;
    };
    let ids: Vec<CellId> = ws.logical_from(head).collect();
    for id in ids {
        place(ws, id, point);
        point.x += ws.get(id).map_or(0, Cell::width);
    }
}

/// Position `id` at `point` and lay out its inner lists relative to it.
pub fn place(ws: &mut Worksheet, id: CellId, point: Point) {
    let Some(cell) = ws.get_mut(id) else {
        return;
    };
    cell.current_point = point;
    if let CellKind::Diff(d) = &cell.kind {
        let (diff_head, base_head) = (d.diff, d.base);
        place_list(ws, diff_head, point);
        let base_x = point.x + full_width(ws, diff_head);
        place_list(ws, base_head, Point::new(base_x, point.y));
    }
}

pub fn draw_list(
    ws: &Worksheet,
    head: Option<CellId>,
    mut point: Point,
    config: &Configuration,
    dc: &mut dyn DrawContext,
) {
    let Some(head) = head else {
        return;
    };
    for id in ws.logical_from(head) {
        draw(ws, id, point, config, dc);
        point.x += ws.get(id).map_or(0, Cell::width);
    }
}

pub fn to_string(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    match ws.get(id).map(Cell::kind) {
        Some(CellKind::Text(_)) => text::to_string(ws, id, config),
        Some(CellKind::Diff(_)) => diff::to_string(ws, id, config),
        None => String::new(),
    }
}

pub fn to_matlab(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    match ws.get(id).map(Cell::kind) {
        Some(CellKind::Text(_)) => text::to_matlab(ws, id, config),
        Some(CellKind::Diff(_)) => diff::to_matlab(ws, id, config),
        None => String::new(),
    }
}

pub fn to_tex(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    match ws.get(id).map(Cell::kind) {
        Some(CellKind::Text(_)) => text::to_tex(ws, id, config),
        Some(CellKind::Diff(_)) => diff::to_tex(ws, id, config),
        None => String::new(),
    }
}

pub fn to_mathml(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    match ws.get(id).map(Cell::kind) {
        Some(CellKind::Text(_)) => text::to_mathml(ws, id, config),
        Some(CellKind::Diff(_)) => diff::to_mathml(ws, id, config),
        None => String::new(),
    }
}

pub fn to_omml(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    match ws.get(id).map(Cell::kind) {
        Some(CellKind::Text(_)) => text::to_omml(ws, id, config),
        Some(CellKind::Diff(_)) => diff::to_omml(ws, id, config),
        None => String::new(),
    }
}

pub fn to_rtf(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    match ws.get(id).map(Cell::kind) {
        Some(CellKind::Text(_)) => text::to_rtf(ws, id, config),
        Some(CellKind::Diff(_)) | None => String::new(),
    }
}

pub fn to_xml(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    match ws.get(id).map(Cell::kind) {
        Some(CellKind::Text(_)) => text::to_xml(ws, id, config),
        Some(CellKind::Diff(_)) => diff::to_xml(ws, id, config),
        None => String::new(),
    }
}

/// Concatenate a per-cell conversion over a list linked by `next`.
pub fn list_to(
    ws: &Worksheet,
    head: Option<CellId>,
    config: &Configuration,
    convert: fn(&Worksheet, CellId, &Configuration) -> String,
) -> String {
    head.map_or_else(String::new, |h| {
        ws.logical_from(h).map(|id| convert(ws, id, config)).collect()
    })
}
