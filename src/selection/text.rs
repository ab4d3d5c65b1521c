//! Plain-text renditions of a selection.

use crate::cell;
use crate::config::Configuration;
use crate::types::{CellId, CellType, Selection};
use crate::worksheet::Worksheet;

/// Cells of the selection in draw order, `start` to `end` inclusive.
pub fn selected_cells(ws: &Worksheet, sel: &Selection) -> Vec<CellId> {
    let mut ids = Vec::new();
    for id in ws.draw_from(sel.start) {
        ids.push(id);
        if id == sel.end {
            break;
        }
    }
    ids
}

/// Concatenated plain text of the selected cells.
pub fn selection_string(ws: &Worksheet, sel: &Selection, config: &Configuration) -> String {
    selected_cells(ws, sel)
        .into_iter()
        .map(|id| cell::to_string(ws, id, config))
        .collect()
}

/// Text put on the clipboard for the selection.
///
/// With `line_breaks`, a newline goes before every cell that starts a
/// visual line, and input and prompts are kept apart from what precedes
/// them by a space.
pub fn copy_text(ws: &Worksheet, sel: &Selection, config: &Configuration, line_breaks: bool) -> String {
    let mut out = String::new();
    for id in selected_cells(ws, sel) {
        let Some(cell) = ws.get(id) else {
            continue;
        };
        if line_breaks && cell.break_line_here() && !out.is_empty() {
            out.push('\n');
        }
        if line_breaks
            && matches!(cell.cell_type(), CellType::Prompt | CellType::Input)
            && !out.is_empty()
            && !out.ends_with('\n')
            && !out.ends_with(' ')
        {
            out.push(' ');
        }
        out.push_str(&cell::to_string(ws, id, config));
    }
    out
}
