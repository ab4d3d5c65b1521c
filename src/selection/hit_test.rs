//! Mapping pointer positions and drag rectangles to cell runs.

use crate::cell::{self, Cell};
use crate::layout::line_max_center;
use crate::types::{CellId, CellType, Point, Rect, Selection, SelectionMode};
use crate::worksheet::{FoldOutcome, Worksheet};

/// Result of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// A run of cells is now selected.
    Selected(Selection),
    /// The click hit nothing selectable; the selection is gone.
    Cleared,
    /// A label or main prompt was folded or unfolded. The selection is gone
    /// and line breaks must be recomputed.
    Folded(CellId),
}

/// First cell in draw order whose box contains `point`.
pub fn cell_at(ws: &Worksheet, point: Point) -> Option<CellId> {
    ws.draw_order()
        .find(|&id| ws.get(id).is_some_and(|c| c.contains_point(point)))
}

fn is_output(ws: &Worksheet, id: Option<CellId>) -> Option<CellId> {
    id.filter(|&i| ws.get(i).is_some_and(|c| c.cell_type() == CellType::Default))
}

/// Handle a click at `point` (worksheet coordinates).
///
/// Clicking output selects the whole output run around it; clicking a
/// label or main prompt toggles folding of what follows it.
pub fn select_point(ws: &mut Worksheet, point: Point) -> PointOutcome {
    let Some(hit) = cell_at(ws, point) else {
        return PointOutcome::Cleared;
    };
    let Some(cell_type) = ws.get(hit).map(Cell::cell_type) else {
        return PointOutcome::Cleared;
    };
    tracing::trace!(cell = %hit, ?cell_type, "point hit");
    match cell_type {
        CellType::Default => {
            let mut start = hit;
            while let Some(prev) = is_output(ws, ws.get(start).and_then(Cell::previous)) {
                start = prev;
            }
            let mut end = hit;
            while let Some(next) = is_output(ws, ws.get(end).and_then(Cell::draw_next)) {
                end = next;
            }
            PointOutcome::Selected(Selection::range(start, end, SelectionMode::WholeLine))
        }
        CellType::Label | CellType::MainPrompt => match ws.toggle_fold(hit) {
            FoldOutcome::Unchanged => PointOutcome::Cleared,
            FoldOutcome::Folded | FoldOutcome::Unfolded => PointOutcome::Folded(hit),
        },
        _ => PointOutcome::Selected(Selection::single(hit, SelectionMode::WholeLine)),
    }
}

/// Select the cells touched by the rectangle spanned by `one` and `two`.
///
/// When the touched cells span several lines, the run is tightened to
/// start at the first cell that lies after the upper drag point and to end
/// at the last cell that starts before the lower one, in reading order. A
/// run of a single cell is refined into the cell's inner lists.
pub fn select_rect(ws: &Worksheet, one: Point, two: Point) -> Option<Selection> {
    let (start_pt, end_pt) = if one.y < two.y || (one.y == two.y && one.x < two.x) {
        (one, two)
    } else {
        (two, one)
    };
    let rect = Rect::from_points(one, two);

    let touches = |id: &CellId| ws.get(*id).is_some_and(|c| rect.intersects(&c.rect()));
    let mut start = ws.draw_order().find(touches)?;
    let mut end = ws.draw_from(start).filter(touches).last().unwrap_or(start);
    let last_touched = end;

    let y_of = |id: CellId| ws.get(id).map_or(0, |c| c.current_point().y);
    if y_of(start) != y_of(end) {
        // First cell: skip cells ending left of or above the start point.
        while start != last_touched {
            let Some(c) = ws.get(start) else {
                break;
            };
            let p = c.current_point();
            if p.x + c.width() >= start_pt.x && p.y + c.drop() >= start_pt.y {
                break;
            }
            match c.draw_next() {
                Some(next) => start = next,
                None => break,
            }
        }
        // Last cell: the last one starting before the end point.
        end = start;
        for id in ws.draw_from(start).skip(1) {
            if let Some(c) = ws.get(id) {
                let p = c.current_point();
                if p.x <= end_pt.x && p.y - line_max_center(ws, id) <= end_pt.y {
                    end = id;
                }
            }
            if id == last_touched {
                break;
            }
        }
    }

    let (start, end) = if start == end {
        select_inner(ws, start, &rect)
    } else {
        (start, end)
    };
    tracing::trace!(start = %start, end = %end, "rectangle selection");
    Some(Selection::range(start, end, SelectionMode::Drag))
}

/// Narrow a single-cell selection to the part of one inner list that
/// `rect` touches. Cells without inner lists, or rectangles touching
/// several of them, select the cell itself.
pub fn select_inner(ws: &Worksheet, id: CellId, rect: &Rect) -> (CellId, CellId) {
    let mut hits = cell::inner_cells(ws, id).into_iter().filter_map(|head| {
        let touched: Vec<CellId> = ws
            .logical_from(head)
            .filter(|&c| ws.get(c).is_some_and(|cell| rect.intersects(&cell.rect())))
            .collect();
        Some((*touched.first()?, *touched.last()?))
    });
    match (hits.next(), hits.next()) {
        (Some(only), None) => only,
        _ => (id, id),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::TextStyle;

    /// Cells with fixed geometry: `(style, x, y, width)`, all 10 high with
    /// center 5, breaking wherever x returns to 15.
    fn laid_out(cells: &[(TextStyle, i32, i32, i32)]) -> (Worksheet, Vec<CellId>) {
        let mut ws = Worksheet::new();
        let ids = cells
            .iter()
            .map(|&(style, x, y, w)| {
                let id = ws.append(Cell::text("c", style));
                let cell = ws.get_mut(id).unwrap();
                cell.width = w;
                cell.height = 10;
                cell.center = 5;
                cell.current_point = Point::new(x, y);
                cell.break_line = x == 15;
                id
            })
            .collect();
        (ws, ids)
    }

    fn two_lines() -> (Worksheet, Vec<CellId>) {
        laid_out(&[
            (TextStyle::Variable, 15, 20, 20),
            (TextStyle::Variable, 37, 20, 20),
            (TextStyle::Variable, 59, 20, 20),
            (TextStyle::Variable, 15, 34, 20),
            (TextStyle::Variable, 37, 34, 20),
        ])
    }

    #[test]
    fn test_point_on_output_selects_run() {
        let (mut ws, ids) = laid_out(&[
            (TextStyle::MainPrompt, 15, 20, 30),
            (TextStyle::Label, 15, 34, 30),
            (TextStyle::Variable, 47, 34, 20),
            (TextStyle::Variable, 69, 34, 20),
        ]);
        let outcome = select_point(&mut ws, Point::new(50, 34));
        assert_eq!(
            outcome,
            PointOutcome::Selected(Selection::range(ids[2], ids[3], SelectionMode::WholeLine))
        );
    }

    #[test]
    fn test_point_on_label_folds() {
        let (mut ws, ids) = laid_out(&[
            (TextStyle::Label, 15, 20, 30),
            (TextStyle::Variable, 47, 20, 20),
        ]);
        assert_eq!(select_point(&mut ws, Point::new(20, 20)), PointOutcome::Folded(ids[0]));
        assert_eq!(ws.get(ids[0]).unwrap().draw_next(), None);
    }

    #[test]
    fn test_point_on_nothing_clears() {
        let (mut ws, _) = two_lines();
        assert_eq!(select_point(&mut ws, Point::new(500, 500)), PointOutcome::Cleared);
    }

    #[test]
    fn test_point_on_input_selects_cell() {
        let (mut ws, ids) = laid_out(&[(TextStyle::Input, 15, 20, 30)]);
        assert_eq!(
            select_point(&mut ws, Point::new(16, 20)),
            PointOutcome::Selected(Selection::single(ids[0], SelectionMode::WholeLine))
        );
    }

    #[test]
    fn test_rect_on_one_line() {
        let (ws, ids) = two_lines();
        let sel = select_rect(&ws, Point::new(40, 18), Point::new(65, 22)).unwrap();
        assert_eq!((sel.start, sel.end), (ids[1], ids[2]));
        assert_eq!(sel.mode, SelectionMode::Drag);
    }

    #[test]
    fn test_rect_across_lines_is_tightened() {
        let (ws, ids) = two_lines();
        // Dragging from the middle of the third cell down to the start of
        // the second line selects reading order, not the bounding box.
        let sel = select_rect(&ws, Point::new(70, 20), Point::new(20, 34)).unwrap();
        assert_eq!((sel.start, sel.end), (ids[2], ids[3]));
    }

    #[test]
    fn test_rect_reversed_points() {
        let (ws, ids) = two_lines();
        let a = select_rect(&ws, Point::new(20, 34), Point::new(70, 20)).unwrap();
        assert_eq!((a.start, a.end), (ids[2], ids[3]));
    }

    #[test]
    fn test_rect_missing_everything() {
        let (ws, _) = two_lines();
        assert!(select_rect(&ws, Point::new(300, 300), Point::new(310, 310)).is_none());
    }

    #[test]
    fn test_select_inner_of_diff() {
        let mut ws = Worksheet::new();
        let d = ws.append(Cell::diff());
        let diff = ws.insert_list(vec![Cell::text("d", TextStyle::SpecialConstant)]);
        let base = ws.insert_list(vec![
            Cell::text("f", TextStyle::Variable),
            Cell::text("g", TextStyle::Variable),
        ]);
        ws.set_diff(d, diff);
        ws.set_base(d, base);
        let mut x = 15;
        for id in [diff.unwrap(), base.unwrap()] {
            let ids: Vec<CellId> = ws.logical_from(id).collect();
            for c in ids {
                let cell = ws.get_mut(c).unwrap();
                cell.width = 10;
                cell.height = 10;
                cell.center = 5;
                cell.current_point = Point::new(x, 20);
                x += 10;
            }
        }
        let g = ws.get(base.unwrap()).unwrap().next().unwrap();
        let rect = Rect::new(26, 18, 20, 4);
        assert_eq!(select_inner(&ws, d, &rect), (base.unwrap(), g));
        let wide = Rect::new(15, 18, 40, 4);
        assert_eq!(select_inner(&ws, d, &wide), (d, d));
    }
}
