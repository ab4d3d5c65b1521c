//! Structural mutations of the draw order.
//!
//! Folding redirects a label's or main prompt's `draw_next` past the cells
//! it hides; deleting splices an input/output group out of the logical
//! sequence and repairs any redirection that pointed into it.

use super::Worksheet;
use crate::types::{CellId, CellType};

/// What a fold toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Folded,
    Unfolded,
    /// The cell cannot fold: wrong type, or a prompt at the very end.
    Unchanged,
}

impl Worksheet {
    /// Fold or unfold the run that follows a label or main prompt.
    ///
    /// A label hides the output cells up to the next non-output cell; a
    /// main prompt hides everything up to the next main prompt. Unfolding
    /// restores `draw_next = next`, which walks every cell again.
    pub fn toggle_fold(&mut self, id: CellId) -> FoldOutcome {
        let Some(cell) = self.get(id) else {
            return FoldOutcome::Unchanged;
        };
        let stop: fn(CellType) -> bool = match cell.cell_type() {
            CellType::Label => |t| t != CellType::Default,
            CellType::MainPrompt if cell.next.is_none() => return FoldOutcome::Unchanged,
            CellType::MainPrompt => |t| t == CellType::MainPrompt,
            _ => return FoldOutcome::Unchanged,
        };

        if cell.next != cell.draw_next {
            if let Some(cell) = self.get_mut(id) {
                cell.draw_next = cell.next;
                cell.draw_next_is_next = true;
                cell.reset_size();
            }
            tracing::debug!(cell = %id, "unfolded");
            return FoldOutcome::Unfolded;
        }

        let mut target = cell.draw_next;
        while let Some(t) = target {
            target = self.get(t).and_then(|c| c.next);
            if target
                .and_then(|n| self.get(n))
                .is_some_and(|c| stop(c.cell_type()))
            {
                break;
            }
        }
        if let Some(cell) = self.get_mut(id) {
            cell.draw_next = target;
            cell.draw_next_is_next = false;
            cell.reset_size();
        }
        tracing::debug!(cell = %id, ?target, "folded");
        FoldOutcome::Folded
    }

    /// True if `id` starts a group that [`Worksheet::delete_group`] can
    /// remove: a main prompt with something after it.
    pub fn can_delete_group(&self, id: CellId) -> bool {
        self.get(id)
            .is_some_and(|c| c.next.is_some() && c.cell_type() == CellType::MainPrompt)
    }

    /// Remove the input/output group starting at main prompt `id`, up to
    /// but not including the next main prompt. Returns false if nothing was
    /// removed.
    ///
    /// A group with no following main prompt is cut off at its start.
    pub fn delete_group(&mut self, id: CellId) -> bool {
        if !self.can_delete_group(id) {
            return false;
        }
        let following = self
            .get(id)
            .and_then(|c| c.next)
            .and_then(|n| self.logical_from(n).find(|&c| self.is_main_prompt(c)));
        let before = self.get(id).and_then(|c| c.previous);

        // Detach the doomed run from what follows it.
        if let Some(tail) = following.and_then(|f| self.get(f)).and_then(|c| c.previous) {
            if let Some(cell) = self.get_mut(tail) {
                cell.next = None;
                cell.draw_next = None;
            }
        }

        match before {
            None => {
                self.first = following;
                if let Some(cell) = following.and_then(|f| self.get_mut(f)) {
                    cell.previous = None;
                }
            }
            Some(previous) => {
                if let Some(cell) = self.get_mut(previous) {
                    cell.next = following;
                    cell.draw_next = following;
                }
                if let Some(cell) = following.and_then(|f| self.get_mut(f)) {
                    cell.previous = Some(previous);
                }
                let label = self.walk_back(Some(previous), CellType::Label);
                self.retarget_fold(label, following);
                let prompt = self.walk_back(label, CellType::MainPrompt);
                self.retarget_fold(prompt, following);
            }
        }

        self.remove_list(id);
        self.repair_dangling(following);
        self.last = self.first;
        tracing::debug!(cell = %id, ?following, "deleted group");
        true
    }

    fn is_main_prompt(&self, id: CellId) -> bool {
        self.get(id)
            .is_some_and(|c| c.cell_type() == CellType::MainPrompt)
    }

    /// Nearest cell at or before `from` (via `previous`) of type `wanted`.
    fn walk_back(&self, from: Option<CellId>, wanted: CellType) -> Option<CellId> {
        let mut cur = from;
        while let Some(id) = cur {
            let cell = self.get(id)?;
            if cell.cell_type() == wanted {
                return Some(id);
            }
            cur = cell.previous;
        }
        None
    }

    /// Point a folded cell at `target`; unfolded cells are left alone.
    fn retarget_fold(&mut self, id: Option<CellId>, target: Option<CellId>) {
        if let Some(cell) = id.and_then(|i| self.get_mut(i)) {
            if cell.draw_next != cell.next {
                cell.draw_next = target;
            }
        }
    }

    /// Redirect any draw link that still points at a freed cell.
    fn repair_dangling(&mut self, target: Option<CellId>) {
        let ids: Vec<CellId> = self.logical().collect();
        for id in ids {
            let dangling = self
                .get(id)
                .and_then(|c| c.draw_next)
                .is_some_and(|d| !self.contains(d));
            if dangling {
                tracing::warn!(cell = %id, "draw link pointed into a deleted group");
                if let Some(cell) = self.get_mut(id) {
                    cell.draw_next = target;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::types::TextStyle;

    /// `(%i1) a (%o1) x y (%i2) b (%o2) z`
    fn session() -> (Worksheet, Vec<CellId>) {
        let mut ws = Worksheet::new();
        let ids = [
            ("(%i1)", TextStyle::MainPrompt),
            ("a", TextStyle::Input),
            ("(%o1)", TextStyle::Label),
            ("x", TextStyle::Variable),
            ("y", TextStyle::Variable),
            ("(%i2)", TextStyle::MainPrompt),
            ("b", TextStyle::Input),
            ("(%o2)", TextStyle::Label),
            ("z", TextStyle::Variable),
        ]
        .into_iter()
        .map(|(t, s)| ws.append(Cell::text(t, s)))
        .collect();
        (ws, ids)
    }

    fn draw_texts(ws: &Worksheet) -> Vec<String> {
        ws.draw_order()
            .map(|id| ws.get(id).unwrap().as_text().unwrap().text().to_string())
            .collect()
    }

    #[test]
    fn test_fold_label_skips_output() {
        let (mut ws, ids) = session();
        assert_eq!(ws.toggle_fold(ids[2]), FoldOutcome::Folded);
        assert_eq!(ws.get(ids[2]).unwrap().draw_next(), Some(ids[5]));
        assert!(!ws.get(ids[2]).unwrap().draw_next_is_next());
        assert_eq!(
            draw_texts(&ws),
            vec!["(%i1)", "a", "(%o1)", "(%i2)", "b", "(%o2)", "z"]
        );
    }

    #[test]
    fn test_unfold_restores_chain() {
        let (mut ws, ids) = session();
        let before = draw_texts(&ws);
        ws.toggle_fold(ids[2]);
        assert_eq!(ws.toggle_fold(ids[2]), FoldOutcome::Unfolded);
        assert_eq!(draw_texts(&ws), before);
    }

    #[test]
    fn test_fold_prompt_hides_group() {
        let (mut ws, ids) = session();
        assert_eq!(ws.toggle_fold(ids[0]), FoldOutcome::Folded);
        assert_eq!(draw_texts(&ws), vec!["(%i1)", "(%i2)", "b", "(%o2)", "z"]);
    }

    #[test]
    fn test_fold_last_prompt_hides_to_end() {
        let (mut ws, ids) = session();
        ws.toggle_fold(ids[5]);
        assert_eq!(ws.get(ids[5]).unwrap().draw_next(), None);
        assert_eq!(ws.toggle_fold(ids[5]), FoldOutcome::Unfolded);
        assert_eq!(ws.get(ids[5]).unwrap().draw_next(), Some(ids[6]));
    }

    #[test]
    fn test_fold_ignores_output_cells() {
        let (mut ws, ids) = session();
        assert_eq!(ws.toggle_fold(ids[3]), FoldOutcome::Unchanged);
    }

    #[test]
    fn test_can_delete_group() {
        let (ws, ids) = session();
        assert!(ws.can_delete_group(ids[0]));
        assert!(!ws.can_delete_group(ids[1]));
    }

    #[test]
    fn test_delete_first_group() {
        let (mut ws, ids) = session();
        assert!(ws.delete_group(ids[0]));
        assert_eq!(ws.first(), Some(ids[5]));
        assert_eq!(ws.get(ids[5]).unwrap().previous(), None);
        assert_eq!(draw_texts(&ws), vec!["(%i2)", "b", "(%o2)", "z"]);
        assert_eq!(ws.len(), 4);
    }

    #[test]
    fn test_delete_last_group_truncates() {
        let (mut ws, ids) = session();
        assert!(ws.delete_group(ids[5]));
        assert_eq!(ws.get(ids[4]).unwrap().next(), None);
        assert_eq!(draw_texts(&ws), vec!["(%i1)", "a", "(%o1)", "x", "y"]);
    }

    #[test]
    fn test_delete_retargets_folded_label() {
        let mut ws = Worksheet::new();
        let ids: Vec<CellId> = [
            ("(%o1)", TextStyle::Label),
            ("x", TextStyle::Variable),
            ("(%i2)", TextStyle::MainPrompt),
            ("b", TextStyle::Input),
            ("(%i3)", TextStyle::MainPrompt),
        ]
        .into_iter()
        .map(|(t, s)| ws.append(Cell::text(t, s)))
        .collect();
        // Folding the label stops at the prompt that is about to go.
        ws.toggle_fold(ids[0]);
        assert_eq!(ws.get(ids[0]).unwrap().draw_next(), Some(ids[2]));

        assert!(ws.delete_group(ids[2]));
        assert_eq!(ws.get(ids[0]).unwrap().draw_next(), Some(ids[4]));
        assert_eq!(draw_texts(&ws), vec!["(%o1)", "(%i3)"]);
    }

    #[test]
    fn test_delete_repairs_prompt_without_label() {
        let mut ws = Worksheet::new();
        let ids: Vec<CellId> = [
            ("(%i1)", TextStyle::MainPrompt),
            ("a", TextStyle::Input),
            ("(%i2)", TextStyle::MainPrompt),
            ("b", TextStyle::Input),
            ("(%i3)", TextStyle::MainPrompt),
        ]
        .into_iter()
        .map(|(t, s)| ws.append(Cell::text(t, s)))
        .collect();
        ws.toggle_fold(ids[0]);
        assert!(ws.delete_group(ids[2]));
        assert_eq!(ws.get(ids[0]).unwrap().draw_next(), Some(ids[4]));
    }
}
