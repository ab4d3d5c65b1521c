//! The document tree.
//!
//! Cells live in an arena and refer to each other by [`CellId`]. The
//! top-level logical sequence starts at `first` and follows `next`; the
//! draw order starts at the same cell and follows `draw_next`, skipping
//! folded runs. Inner lists of composite cells are chains of their own and
//! are never part of the top-level sequence.

mod mutation;

pub use mutation::FoldOutcome;

use crate::cell::{self, Cell, CellKind};
use crate::config::Configuration;
use crate::types::CellId;

#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    cells: Vec<Option<Cell>>,
    free: Vec<CellId>,
    first: Option<CellId>,
    /// Append hint; some cell on the top-level chain, usually the tail.
    last: Option<CellId>,
}

/// Iterator over a chain of cells linked by `next` or `draw_next`.
pub struct Chain<'a> {
    ws: &'a Worksheet,
    current: Option<CellId>,
    link: fn(&Cell) -> Option<CellId>,
    /// Guards against cycles in damaged chains.
    remaining: usize,
}

impl Iterator for Chain<'_> {
    type Item = CellId;

    fn next(&mut self) -> Option<CellId> {
        let id = self.current?;
        let cell = self.ws.get(id)?;
        if self.remaining == 0 {
            tracing::warn!(cell = %id, "cell chain longer than the arena, stopping");
            self.current = None;
            return None;
        }
        self.remaining -= 1;
        self.current = (self.link)(cell);
        Some(id)
    }
}

impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the top-level sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Number of live cells, inner cells included.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn first(&self) -> Option<CellId> {
        self.first
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.get(id).is_some()
    }

    /// Store a detached cell and return its handle.
    pub fn insert(&mut self, mut cell: Cell) -> CellId {
        cell.next = None;
        cell.previous = None;
        cell.draw_next = None;
        if let Some(id) = self.free.pop() {
            if let Some(slot) = self.cells.get_mut(id.index()) {
                *slot = Some(cell);
                return id;
            }
        }
        let id = CellId(u32::try_from(self.cells.len()).unwrap_or(u32::MAX));
        self.cells.push(Some(cell));
        id
    }

    /// Store `cells` as a detached chain linked by `next` and `draw_next`.
    /// Returns the head, or `None` for an empty list.
    pub fn insert_list(&mut self, cells: Vec<Cell>) -> Option<CellId> {
        let mut head = None;
        let mut tail: Option<CellId> = None;
        for cell in cells {
            let id = self.insert(cell);
            match tail {
                Some(t) => self.link(t, id),
                None => head = Some(id),
            }
            tail = Some(id);
        }
        head
    }

    /// Link `b` after `a` in both orders.
    fn link(&mut self, a: CellId, b: CellId) {
        if let Some(cell) = self.get_mut(a) {
            cell.next = Some(b);
            if cell.draw_next_is_next {
                cell.draw_next = Some(b);
            }
        }
        if let Some(cell) = self.get_mut(b) {
            cell.previous = Some(a);
        }
    }

    /// Last cell of the chain that contains `from`.
    fn chain_tail(&self, from: CellId) -> CellId {
        self.logical_from(from).last().unwrap_or(from)
    }

    /// Append a cell to the end of the top-level sequence.
    pub fn append(&mut self, cell: Cell) -> CellId {
        let id = self.insert(cell);
        self.attach(id);
        id
    }

    /// Attach a detached chain to the end of the top-level sequence.
    pub(crate) fn attach(&mut self, head: CellId) {
        match self.last.or(self.first) {
            None => self.first = Some(head),
            Some(hint) => {
                let tail = self.chain_tail(hint);
                self.link(tail, head);
            }
        }
        self.last = Some(self.chain_tail(head));
    }

    /// Append a detached chain as a new output line.
    ///
    /// A label or prompt folded to the very end of the document has no draw
    /// successor; it gets the new line as one so the line is visible.
    pub fn add_line(&mut self, head: CellId, force_new_line: bool) {
        let draw_tail = self.draw_order().last();
        self.attach(head);
        if let Some(cell) = self.get_mut(head) {
            cell.force_break_line(force_new_line);
        }
        if let Some(tail) = draw_tail {
            if let Some(cell) = self.get_mut(tail) {
                if cell.draw_next.is_none() && cell.next.is_some() {
                    cell.draw_next = Some(head);
                }
            }
        }
        tracing::debug!(head = %head, "added line");
    }

    /// Cells from `from` onwards in logical order.
    pub fn logical_from(&self, from: CellId) -> Chain<'_> {
        Chain {
            ws: self,
            current: Some(from),
            link: Cell::next,
            remaining: self.cells.len(),
        }
    }

    /// The top-level logical sequence.
    pub fn logical(&self) -> Chain<'_> {
        Chain {
            ws: self,
            current: self.first,
            link: Cell::next,
            remaining: self.cells.len(),
        }
    }

    /// Cells from `from` onwards in draw order.
    pub fn draw_from(&self, from: CellId) -> Chain<'_> {
        Chain {
            ws: self,
            current: Some(from),
            link: Cell::draw_next,
            remaining: self.cells.len(),
        }
    }

    /// The top-level draw order.
    pub fn draw_order(&self) -> Chain<'_> {
        Chain {
            ws: self,
            current: self.first,
            link: Cell::draw_next,
            remaining: self.cells.len(),
        }
    }

    /// Replace the text of a text cell; tooltips that depend on the
    /// preceding cell see its current plain text.
    pub fn set_value(&mut self, id: CellId, text: &str, config: &Configuration) {
        let previous = self
            .get(id)
            .and_then(Cell::previous)
            .map(|p| cell::to_string(self, p, config));
        if let Some(cell) = self.get_mut(id) {
            cell.apply_value(text, previous.as_deref());
        }
    }

    /// Give a text cell a user-defined label.
    pub fn set_user_defined_label(&mut self, id: CellId, label: &str) {
        if let Some(cell) = self.get_mut(id) {
            if let CellKind::Text(t) = &mut cell.kind {
                t.set_user_defined_label(label);
            }
            cell.reset_size();
        }
    }

    /// Keep a trailing `(` unescaped when a function name is copied.
    pub fn set_dont_escape_opening_parenthesis(&mut self, id: CellId, on: bool) {
        if let Some(CellKind::Text(t)) = self.get_mut(id).map(|c| &mut c.kind) {
            t.set_dont_escape_opening_parenthesis(on);
        }
    }

    /// Install the differential part of a derivative cell. The old part is
    /// freed; `None` leaves the cell unchanged.
    pub fn set_diff(&mut self, id: CellId, head: Option<CellId>) {
        let Some(head) = head else {
            return;
        };
        let old = self
            .get_mut(id)
            .and_then(Cell::diff_mut)
            .and_then(|d| d.diff.replace(head));
        if let Some(old) = old.filter(|&o| o != head) {
            self.remove_list(old);
        }
        if let Some(cell) = self.get_mut(head) {
            cell.set_suppress_multiplication_dot(true);
        }
        if let Some(cell) = self.get_mut(id) {
            cell.reset_size();
        }
    }

    /// Install the base expression of a derivative cell.
    pub fn set_base(&mut self, id: CellId, head: Option<CellId>) {
        let Some(head) = head else {
            return;
        };
        let old = self
            .get_mut(id)
            .and_then(Cell::diff_mut)
            .and_then(|d| d.base.replace(head));
        if let Some(old) = old.filter(|&o| o != head) {
            self.remove_list(old);
        }
        if let Some(cell) = self.get_mut(id) {
            cell.reset_size();
        }
    }

    /// Free a cell and everything it owns. Links into it are not touched.
    pub fn remove(&mut self, id: CellId) {
        let inner = cell::inner_cells(self, id);
        if let Some(slot) = self.cells.get_mut(id.index()) {
            if slot.take().is_some() {
                self.free.push(id);
            }
        }
        for head in inner {
            self.remove_list(head);
        }
        if self.first == Some(id) {
            self.first = None;
        }
        if self.last == Some(id) {
            self.last = self.first;
        }
    }

    /// Free a whole `next` chain.
    pub fn remove_list(&mut self, head: CellId) {
        let ids: Vec<CellId> = self.logical_from(head).collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Drop every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.free.clear();
        self.first = None;
        self.last = None;
    }

    /// Deep-copy one cell (inner lists included, logical chain excluded)
    /// into `dst` as a detached cell.
    pub fn copy_cell(&self, id: CellId, dst: &mut Worksheet) -> Option<CellId> {
        let source = self.get(id)?;
        let copy = dst.insert(source.detached_copy());
        if let Some(d) = source.as_diff() {
            let diff = d.diff.and_then(|h| self.copy_list(h, dst));
            let base = d.base.and_then(|h| self.copy_list(h, dst));
            if let Some(target) = dst.get_mut(copy).and_then(Cell::diff_mut) {
                target.diff = diff;
                target.base = base;
            }
        }
        Some(copy)
    }

    /// Deep-copy the `next` chain starting at `head` into `dst`.
    pub fn copy_list(&self, head: CellId, dst: &mut Worksheet) -> Option<CellId> {
        let mut copy_head = None;
        let mut tail: Option<CellId> = None;
        for id in self.logical_from(head) {
            let Some(copy) = self.copy_cell(id, dst) else {
                continue;
            };
            match tail {
                Some(t) => dst.link(t, copy),
                None => copy_head = Some(copy),
            }
            tail = Some(copy);
        }
        copy_head
    }

    /// Copy every visible cell, in draw order, into a new worksheet.
    pub fn copy_tree(&self) -> Worksheet {
        let mut dst = Worksheet::new();
        for id in self.draw_order() {
            if let Some(copy) = self.copy_cell(id, &mut dst) {
                dst.attach(copy);
            }
        }
        dst
    }

    /// Copy the draw-order run from `start` to `end` into a new worksheet.
    pub fn copy_selection(&self, start: CellId, end: CellId) -> Worksheet {
        let mut dst = Worksheet::new();
        for id in self.draw_from(start) {
            if let Some(copy) = self.copy_cell(id, &mut dst) {
                dst.attach(copy);
            }
            if id == end {
                break;
            }
        }
        dst
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::TextStyle;

    fn texts(ws: &Worksheet, ids: impl Iterator<Item = CellId>) -> Vec<String> {
        ids.map(|id| ws.get(id).unwrap().as_text().unwrap().text().to_string())
            .collect()
    }

    #[test]
    fn test_append_links_both_orders() {
        let mut ws = Worksheet::new();
        let a = ws.append(Cell::text("a", TextStyle::Variable));
        let b = ws.append(Cell::text("b", TextStyle::Variable));
        assert_eq!(ws.first(), Some(a));
        assert_eq!(ws.get(a).unwrap().next(), Some(b));
        assert_eq!(ws.get(a).unwrap().draw_next(), Some(b));
        assert_eq!(ws.get(b).unwrap().previous(), Some(a));
        assert_eq!(texts(&ws, ws.draw_order()), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_reuses_slot() {
        let mut ws = Worksheet::new();
        let id = ws.insert(Cell::text("x", TextStyle::Variable));
        ws.remove(id);
        assert!(!ws.contains(id));
        let again = ws.insert(Cell::text("y", TextStyle::Variable));
        assert_eq!(again, id);
    }

    #[test]
    fn test_remove_frees_inner_lists() {
        let mut ws = Worksheet::new();
        let d = ws.append(Cell::diff());
        let diff = ws.insert_list(vec![Cell::text("d", TextStyle::SpecialConstant)]);
        ws.set_diff(d, diff);
        assert_eq!(ws.len(), 2);
        ws.remove(d);
        assert_eq!(ws.len(), 0);
    }

    #[test]
    fn test_add_line_forces_break() {
        let mut ws = Worksheet::new();
        ws.append(Cell::text("a", TextStyle::Variable));
        let head = ws
            .insert_list(vec![
                Cell::text("b", TextStyle::Variable),
                Cell::text("c", TextStyle::Variable),
            ])
            .unwrap();
        ws.add_line(head, true);
        assert!(ws.get(head).unwrap().forced_break());
        assert_eq!(texts(&ws, ws.logical()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_line_after_label_folded_to_end() {
        let mut ws = Worksheet::new();
        let label = ws.append(Cell::text("(%o1)", TextStyle::Label));
        ws.append(Cell::text("x", TextStyle::Variable));
        assert_eq!(ws.toggle_fold(label), FoldOutcome::Folded);
        assert_eq!(ws.get(label).unwrap().draw_next(), None);

        let head = ws
            .insert_list(vec![Cell::text("(%i2)", TextStyle::MainPrompt)])
            .unwrap();
        ws.add_line(head, true);
        assert_eq!(ws.get(label).unwrap().draw_next(), Some(head));
    }

    #[test]
    fn test_copy_selection_is_detached() {
        let mut ws = Worksheet::new();
        let a = ws.append(Cell::text("a", TextStyle::Variable));
        ws.append(Cell::text("b", TextStyle::Variable));
        let c = ws.append(Cell::text("c", TextStyle::Variable));
        ws.append(Cell::text("d", TextStyle::Variable));
        let copy = ws.copy_selection(a, c);
        assert_eq!(texts(&copy, copy.logical()), vec!["a", "b", "c"]);
        assert_eq!(ws.len(), 4);
    }

    #[test]
    fn test_copy_tree_skips_folded_cells() {
        let mut ws = Worksheet::new();
        let label = ws.append(Cell::text("(%o1)", TextStyle::Label));
        ws.append(Cell::text("x", TextStyle::Variable));
        ws.append(Cell::text("(%i2)", TextStyle::MainPrompt));
        ws.toggle_fold(label);
        let copy = ws.copy_tree();
        assert_eq!(texts(&copy, copy.logical()), vec!["(%o1)", "(%i2)"]);
    }

    #[test]
    fn test_set_value_uses_previous_for_tooltip() {
        let config = Configuration::default();
        let mut ws = Worksheet::new();
        ws.append(Cell::text("at", TextStyle::Function));
        let msg = ws.append(Cell::text("", TextStyle::Error));
        ws.set_value(msg, ": improper argument: x", &config);
        assert!(ws.get(msg).unwrap().tool_tip().unwrap().contains("at()"));
    }
}
