//! The measurement passes and cell placement.

use super::{line_max_center, line_max_drop, Viewport, BASE_INDENT, CELL_SKIP, LINE_SKIP, RIGHT_MARGIN};
use crate::cell::{self, Cell};
use crate::config::Configuration;
use crate::render::DrawContext;
use crate::types::{CellId, Point};
use crate::worksheet::Worksheet;

fn logical_ids(ws: &Worksheet, from: Option<CellId>) -> Vec<CellId> {
    from.or(ws.first())
        .map(|f| ws.logical_from(f).collect())
        .unwrap_or_default()
}

/// Pass 1: measure every cell from `from` (default: the first) along `next`.
pub fn recalculate_widths(
    ws: &mut Worksheet,
    from: Option<CellId>,
    config: &Configuration,
    dc: &dyn DrawContext,
) {
    let font_size = config.font_size();
    for id in logical_ids(ws, from) {
        cell::recalculate_widths(ws, id, font_size, config, dc);
    }
}

/// Pass 2: greedy line breaking along `draw_next` for a client area
/// `client_width` pixels wide.
///
/// A cell starts a new line when it is forced to, or when it would reach the
/// right margin. The first cell of the worksheet always starts a line.
pub fn break_lines(ws: &mut Worksheet, from: Option<CellId>, client_width: i32) {
    let full_width = client_width - RIGHT_MARGIN;
    let mut current_width = BASE_INDENT;
    let mut cur = from.or(ws.first());
    let mut first = cur.is_some() && cur == ws.first();
    let mut lines = 0usize;
    while let Some(cell) = cur.and_then(|id| ws.get_mut(id)) {
        cell.break_line = false;
        let width = cell.width();
        if first || cell.break_line_here() || current_width + width >= full_width {
            current_width = BASE_INDENT + width;
            cell.break_line = true;
            lines += 1;
        } else {
            current_width += width + CELL_SKIP;
        }
        first = false;
        cur = cell.draw_next();
    }
    tracing::debug!(lines, full_width, "broke lines");
}

/// Pass 3: heights and baselines along `next`.
pub fn recalculate_heights(ws: &mut Worksheet, from: Option<CellId>, config: &Configuration) {
    let font_size = config.font_size();
    for id in logical_ids(ws, from) {
        cell::recalculate_height(ws, id, font_size, config);
    }
}

/// Give every visible cell its on-screen position.
///
/// Each line's baseline sits below the previous line's deepest drop by the
/// new line's tallest center, plus [`LINE_SKIP`] when the cell ending the
/// previous line asks for a big skip.
pub fn place(ws: &mut Worksheet) {
    let Some(first) = ws.first() else {
        return;
    };
    let mut point = Point::new(BASE_INDENT, BASE_INDENT + line_max_center(ws, first));
    let mut drop = line_max_drop(ws, first);
    let mut cur = Some(first);
    while let Some(id) = cur {
        cell::place(ws, id, point);
        let Some(cell) = ws.get(id) else {
            break;
        };
        let (width, big_skip) = (cell.width(), cell.big_skip());
        cur = cell.draw_next();
        let Some(next) = cur else {
            break;
        };
        if ws.get(next).is_some_and(Cell::break_line_here) {
            point.x = BASE_INDENT;
            point.y += drop + line_max_center(ws, next);
            if big_skip {
                point.y += LINE_SKIP;
            }
            drop = line_max_drop(ws, next);
        } else {
            point.x += width + CELL_SKIP;
        }
    }
}

/// Full relayout from `from`: widths, line breaks, heights, placement and
/// scroll region. With `scroll` the view follows a worksheet that grew past
/// the bottom of the client area.
pub fn recalculate(
    ws: &mut Worksheet,
    from: Option<CellId>,
    viewport: &mut Viewport,
    config: &Configuration,
    dc: &dyn DrawContext,
    scroll: bool,
) {
    recalculate_widths(ws, from, config, dc);
    break_lines(ws, from, viewport.client.width);
    recalculate_heights(ws, from, config);
    place(ws);
    viewport.adjust_size(ws, scroll);
}

/// New client area: only the line breaks and the scroll region change.
pub fn resize(ws: &mut Worksheet, viewport: &mut Viewport, width: i32, height: i32) {
    viewport.client.width = width;
    viewport.client.height = height;
    if !ws.is_empty() {
        break_lines(ws, None, width);
        place(ws);
    }
    viewport.adjust_size(ws, false);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn sized(ws: &mut Worksheet, widths: &[i32]) -> Vec<CellId> {
        widths
            .iter()
            .map(|&w| {
                let id = ws.append(Cell::text("x", crate::types::TextStyle::Variable));
                let cell = ws.get_mut(id).unwrap();
                cell.width = w;
                cell.height = 10;
                cell.center = 5;
                id
            })
            .collect()
    }

    fn breaks(ws: &Worksheet) -> Vec<bool> {
        ws.draw_order()
            .map(|id| ws.get(id).unwrap().break_line_here())
            .collect()
    }

    #[test]
    fn test_break_before_overflowing_cell() {
        let mut ws = Worksheet::new();
        sized(&mut ws, &[40, 40, 40]);
        // Full width 91; every line restarts at 55 and 55 + 40 >= 91.
        break_lines(&mut ws, None, 100);
        assert_eq!(breaks(&ws), vec![true, true, true]);

        break_lines(&mut ws, None, 200);
        // 55 + 40 < 191, then 97 + 40 < 191.
        assert_eq!(breaks(&ws), vec![true, false, false]);
    }

    #[test]
    fn test_forced_break_resets_width() {
        let mut ws = Worksheet::new();
        let ids = sized(&mut ws, &[50, 50, 50, 50]);
        ws.get_mut(ids[2]).unwrap().force_break_line(true);
        break_lines(&mut ws, None, 200);
        assert_eq!(breaks(&ws), vec![true, false, true, false]);
    }

    #[test]
    fn test_rebreak_clears_old_breaks() {
        let mut ws = Worksheet::new();
        sized(&mut ws, &[40, 40, 40]);
        break_lines(&mut ws, None, 60);
        break_lines(&mut ws, None, 1000);
        assert_eq!(breaks(&ws), vec![true, false, false]);
    }

    #[test]
    fn test_place_follows_lines() {
        let mut ws = Worksheet::new();
        let ids = sized(&mut ws, &[40, 40, 40]);
        ws.get_mut(ids[0]).unwrap().set_big_skip(false);
        ws.get_mut(ids[1]).unwrap().set_big_skip(true);
        break_lines(&mut ws, None, 100);
        place(&mut ws);
        let points: Vec<Point> = ids
            .iter()
            .map(|&id| ws.get(id).unwrap().current_point())
            .collect();
        assert_eq!(points[0], Point::new(15, 20));
        // drop 5 + center 5, no big skip after the first cell.
        assert_eq!(points[1], Point::new(15, 30));
        assert_eq!(points[2], Point::new(15, 44));
    }

    #[test]
    fn test_place_same_line_advances_x() {
        let mut ws = Worksheet::new();
        let ids = sized(&mut ws, &[40, 30]);
        break_lines(&mut ws, None, 500);
        place(&mut ws);
        assert_eq!(ws.get(ids[1]).unwrap().current_point(), Point::new(57, 20));
    }
}
