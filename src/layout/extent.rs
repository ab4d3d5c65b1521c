//! Overall size of the laid-out worksheet.

use super::{line_max_height, BASE_INDENT, CELL_SKIP, LINE_SKIP};
use crate::types::Size;
use crate::worksheet::Worksheet;

/// Right-most and bottom-most extent of the visible cells, margins
/// included. Line breaks must be current.
pub fn max_point(ws: &Worksheet) -> Size {
    let mut current_height = BASE_INDENT;
    let mut current_width = BASE_INDENT;
    let mut width = BASE_INDENT;
    let mut height = BASE_INDENT;
    let mut big_skip = false;
    for id in ws.draw_order() {
        let Some(cell) = ws.get(id) else {
            continue;
        };
        if cell.break_line_here() {
            current_height += line_max_height(ws, id);
            if big_skip {
                current_height += LINE_SKIP;
            }
            height = current_height;
            current_width = BASE_INDENT + cell.width();
            width = width.max(current_width + BASE_INDENT);
        } else {
            current_width += cell.width() + CELL_SKIP;
            width = width.max(current_width - CELL_SKIP);
        }
        big_skip = cell.big_skip();
    }
    Size::new(width, height)
}
