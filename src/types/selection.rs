use super::CellId;

/// How the current selection was made. Controls how it is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Click selection: whole visual lines are boxed.
    #[default]
    WholeLine,
    /// Drag selection: every selected cell is boxed.
    Drag,
}

/// A contiguous run of cells in draw order, `start` to `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: CellId,
    pub end: CellId,
    pub mode: SelectionMode,
}

impl Selection {
    /// Selection of a single cell.
    pub fn single(id: CellId, mode: SelectionMode) -> Self {
        Self {
            start: id,
            end: id,
            mode,
        }
    }

    pub fn range(start: CellId, end: CellId, mode: SelectionMode) -> Self {
        Self { start, end, mode }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}
