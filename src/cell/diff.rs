//! Derivative composite: a differential part followed by the expression it
//! applies to.

use super::{Cell, CellKind};
use crate::config::Configuration;
use crate::render::{in_update_region, DrawContext};
use crate::types::{CellId, Point};
use crate::worksheet::Worksheet;

/// Heads of the two inner lists. Either may be missing; a missing list
/// renders as nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffCell {
    pub(crate) diff: Option<CellId>,
    pub(crate) base: Option<CellId>,
}

impl DiffCell {
    /// Head of the differential part, e.g. `d/dx`.
    pub fn diff(&self) -> Option<CellId> {
        self.diff
    }

    /// Head of the expression being differentiated.
    pub fn base(&self) -> Option<CellId> {
        self.base
    }
}

fn lists(ws: &Worksheet, id: CellId) -> Option<(bool, DiffCell)> {
    let cell = ws.get(id)?;
    let d = cell.as_diff()?;
    Some((cell.is_broken_into_lines, *d))
}

pub(crate) fn recalculate_widths(
    ws: &mut Worksheet,
    id: CellId,
    font_size: i32,
    config: &Configuration,
    dc: &dyn DrawContext,
) {
    let Some((broken, d)) = lists(ws, id) else {
        return;
    };
    let size = if font_size < config.min_font_size() {
        ws.get(id).map_or(font_size, |c| c.font_size)
    } else {
        font_size
    };
    let width = if broken {
        0
    } else {
        for head in [d.base, d.diff].into_iter().flatten() {
            super::recalculate_widths_list(ws, head, size, config, dc);
        }
        super::full_width(ws, d.base) + super::full_width(ws, d.diff)
    };
    if let Some(cell) = ws.get_mut(id) {
        cell.width = width;
        cell.font_size = size;
        cell.mark_measured(size, config);
    }
}

pub(crate) fn recalculate_height(ws: &mut Worksheet, id: CellId, font_size: i32, config: &Configuration) {
    let Some((broken, d)) = lists(ws, id) else {
        return;
    };
    let (center, height) = if broken {
        (0, 0)
    } else {
        for head in [d.base, d.diff].into_iter().flatten() {
            super::recalculate_height_list(ws, head, font_size, config);
        }
        let center = super::center_list(ws, d.diff).max(super::center_list(ws, d.base));
        let drop = super::max_drop(ws, d.diff).max(super::max_drop(ws, d.base));
        (center, center + drop)
    };
    if let Some(cell) = ws.get_mut(id) {
        cell.center = center;
        cell.height = height;
    }
}

pub(crate) fn draw(
    ws: &Worksheet,
    cell: &Cell,
    d: &DiffCell,
    point: Point,
    config: &Configuration,
    dc: &mut dyn DrawContext,
) {
    if cell.is_broken_into_lines {
        return;
    }
    let rect = crate::types::Rect::new(point.x, point.y - cell.center, cell.width, cell.height);
    if !in_update_region(dc, &rect) {
        return;
    }
    super::draw_list(ws, d.diff, point, config, dc);
    let base = Point::new(point.x + super::full_width(ws, d.diff), point.y);
    super::draw_list(ws, d.base, base, config, dc);
}

fn diff_call(
    ws: &Worksheet,
    id: CellId,
    config: &Configuration,
    convert: fn(&Worksheet, CellId, &Configuration) -> String,
) -> String {
    let Some((broken, d)) = lists(ws, id) else {
        return String::new();
    };
    if broken {
        return String::new();
    }
    let after_base_head = d.base.and_then(|b| ws.get(b)).and_then(Cell::next);
    format!(
        "'diff({}{})",
        super::list_to(ws, after_base_head, config, convert),
        super::list_to(ws, d.diff, config, convert)
    )
}

pub(crate) fn to_string(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    diff_call(ws, id, config, super::to_string)
}

pub(crate) fn to_matlab(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    diff_call(ws, id, config, super::to_matlab)
}

pub(crate) fn to_tex(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    let Some((broken, d)) = lists(ws, id) else {
        return String::new();
    };
    if broken {
        return String::new();
    }
    let mut diff = super::list_to(ws, d.diff, config, super::to_tex);
    if config.use_partial_for_diff() {
        diff = partial_notation(&diff);
    }
    diff + &super::list_to(ws, d.base, config, super::to_tex)
}

fn partial_notation(tex: &str) -> String {
    tex.replace("\\frac{d}{d", "\\frac{\\partial}{\\partial")
}

pub(crate) fn to_mathml(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    let Some((_, d)) = lists(ws, id) else {
        return String::new();
    };
    format!(
        "<mrow>{}{}</mrow>\n",
        super::list_to(ws, d.diff, config, super::to_mathml),
        super::list_to(ws, d.base, config, super::to_mathml)
    )
}

pub(crate) fn to_omml(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    let Some((_, d)) = lists(ws, id) else {
        return String::new();
    };
    super::list_to(ws, d.diff, config, super::to_omml)
        + &super::list_to(ws, d.base, config, super::to_omml)
}

/// `<d>` with each inner list wrapped in `<r>` so the reader can tell them apart.
pub(crate) fn to_xml(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    let Some(cell) = ws.get(id) else {
        return String::new();
    };
    let Some(d) = cell.as_diff() else {
        return String::new();
    };
    let flags = if cell.force_break_line {
        " breakline=\"true\""
    } else {
        ""
    };
    format!(
        "<d{flags}><r>{}</r><r>{}</r></d>",
        super::list_to(ws, d.diff, config, super::to_xml),
        super::list_to(ws, d.base, config, super::to_xml)
    )
}

impl Cell {
    /// Mutable access to the inner-list heads of a derivative cell.
    pub(crate) fn diff_mut(&mut self) -> Option<&mut DiffCell> {
        match &mut self.kind {
            CellKind::Diff(d) => Some(d),
            CellKind::Text(_) => None,
        }
    }
}
