//! Layout engine for measuring, line-breaking and placing cells.
//!
//! This module handles:
//! - The three measurement passes (widths, line breaks, heights)
//! - Placing every visible cell at its on-screen position
//! - The overall extent of the worksheet and the scroll region
//!
//! Line metrics are derived from the draw order: a visual line starts at a
//! cell whose [`Cell::break_line_here`] is true and runs along `draw_next`
//! until the next such cell.

mod extent;
mod pipeline;
mod viewport;

pub use extent::max_point;
pub use pipeline::{break_lines, place, recalculate, recalculate_heights, recalculate_widths, resize};
pub use viewport::{Viewport, SCROLL_RATE};

use crate::cell::Cell;
use crate::types::CellId;
use crate::worksheet::Worksheet;

/// Left margin and top margin of the worksheet.
pub const BASE_INDENT: i32 = 15;
/// Horizontal gap between cells on a line.
pub const CELL_SKIP: i32 = 2;
/// Extra vertical gap after a line whose last cell asks for it.
pub const LINE_SKIP: i32 = 4;
/// Space kept free at the right edge of the client area.
pub const RIGHT_MARGIN: i32 = 9;

/// The cells of the visual line that `id` belongs to, from `id` onwards.
fn rest_of_line(ws: &Worksheet, id: CellId) -> impl Iterator<Item = &Cell> {
    ws.draw_from(id)
        .enumerate()
        .take_while(|&(i, c)| i == 0 || !ws.get(c).is_some_and(Cell::break_line_here))
        .filter_map(|(_, c)| ws.get(c))
}

/// Largest center from `id` to the end of its visual line.
pub fn line_max_center(ws: &Worksheet, id: CellId) -> i32 {
    rest_of_line(ws, id).map(Cell::center).max().unwrap_or(0)
}

/// Largest drop from `id` to the end of its visual line.
pub fn line_max_drop(ws: &Worksheet, id: CellId) -> i32 {
    rest_of_line(ws, id).map(Cell::drop).max().unwrap_or(0)
}

pub fn line_max_height(ws: &Worksheet, id: CellId) -> i32 {
    line_max_center(ws, id) + line_max_drop(ws, id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::TextStyle;

    #[test]
    fn test_line_metrics_stop_at_break() {
        let mut ws = Worksheet::new();
        let a = ws.append(Cell::text("a", TextStyle::Variable));
        let b = ws.append(Cell::text("b", TextStyle::Variable));
        let c = ws.append(Cell::text("c", TextStyle::Variable));
        for (id, center, height) in [(a, 3, 6), (b, 7, 10), (c, 20, 40)] {
            let cell = ws.get_mut(id).unwrap();
            cell.center = center;
            cell.height = height;
        }
        ws.get_mut(c).unwrap().force_break_line(true);

        assert_eq!(line_max_center(&ws, a), 7);
        assert_eq!(line_max_drop(&ws, a), 3);
        assert_eq!(line_max_height(&ws, a), 10);
        // A line starting cell counts itself even though it breaks.
        assert_eq!(line_max_center(&ws, c), 20);
    }
}
