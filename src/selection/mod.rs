//! Selection and hit-testing.
//!
//! A selection is a run of cells in draw order. Clicks select whole output
//! runs or toggle folding; drags select the cells a rectangle touches,
//! tightened to reading order. The selected run can be turned into text or
//! deleted when it is a single main prompt.

mod hit_test;
mod text;

pub use hit_test::{cell_at, select_inner, select_point, select_rect, PointOutcome};
pub use text::{copy_text, selected_cells, selection_string};

use crate::types::Selection;
use crate::worksheet::Worksheet;

/// True if `sel` is exactly one main prompt with something after it.
pub fn can_delete(ws: &Worksheet, sel: Option<&Selection>) -> bool {
    sel.is_some_and(|s| s.is_single() && ws.can_delete_group(s.start))
}

/// Delete the input/output group of the selected main prompt. Returns false
/// if the selection is not deletable.
pub fn delete(ws: &mut Worksheet, sel: Option<&Selection>) -> bool {
    match sel {
        Some(s) if can_delete(ws, Some(s)) => ws.delete_group(s.start),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::types::{SelectionMode, TextStyle};

    #[test]
    fn test_only_single_main_prompt_is_deletable() {
        let mut ws = Worksheet::new();
        let p = ws.append(Cell::text("(%i1)", TextStyle::MainPrompt));
        let i = ws.append(Cell::text("a", TextStyle::Input));
        assert!(can_delete(&ws, Some(&Selection::single(p, SelectionMode::WholeLine))));
        assert!(!can_delete(&ws, Some(&Selection::range(p, i, SelectionMode::Drag))));
        assert!(!can_delete(&ws, Some(&Selection::single(i, SelectionMode::Drag))));
        assert!(!can_delete(&ws, None));
    }

    #[test]
    fn test_delete_without_following_prompt_empties() {
        let mut ws = Worksheet::new();
        let p = ws.append(Cell::text("(%i1)", TextStyle::MainPrompt));
        ws.append(Cell::text("a", TextStyle::Input));
        assert!(delete(&mut ws, Some(&Selection::single(p, SelectionMode::WholeLine))));
        assert!(ws.is_empty());
        assert_eq!(ws.len(), 0);
    }
}
