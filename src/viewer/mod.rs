//! The worksheet view: document, configuration, scroll state and selection
//! behind one handle.
//!
//! This module provides the host-independent [`WorksheetView`]:
//! - appending output lines and keeping the layout current
//! - painting through any [`DrawContext`]
//! - mouse and keyboard handling (see `events`)
//! - copy, bitmap and HTML export of the selection or the whole sheet
//!
//! On wasm32 the view is wrapped by the `MathView` JavaScript class, which
//! wires canvas events and timers to it.

mod clipboard;
mod events;
mod scroll;
#[cfg(target_arch = "wasm32")]
mod wasm;

use std::path::Path;

pub use clipboard::{Clipboard, ClipboardContent, MemoryClipboard};
pub use scroll::{auto_scroll_delta, TimerRequest, AUTO_SCROLL_STEP, FIRST_TICK_MS, REPEAT_TICK_MS};
#[cfg(target_arch = "wasm32")]
pub use wasm::MathView;

use events::MouseState;

use crate::cell::Cell;
use crate::config::Configuration;
use crate::error::Result;
use crate::export::{self, Format, HtmlImages};
use crate::layout::{self, Viewport};
use crate::render::{self, BitmapOut, DrawContext};
use crate::selection;
use crate::types::{CellId, Selection, Size};
use crate::worksheet::Worksheet;

/// A worksheet on screen.
#[derive(Debug, Clone)]
pub struct WorksheetView {
    ws: Worksheet,
    config: Configuration,
    viewport: Viewport,
    selection: Option<Selection>,
    mouse: MouseState,
    needs_render: bool,
}

impl Default for WorksheetView {
    fn default() -> Self {
        Self::new(800, 600, Configuration::default())
    }
}

impl WorksheetView {
    /// An empty view with a client area of `width` x `height` pixels.
    pub fn new(width: i32, height: i32, config: Configuration) -> Self {
        let mut viewport = Viewport::new(width, height);
        let ws = Worksheet::new();
        viewport.adjust_size(&ws, false);
        Self {
            ws,
            config,
            viewport,
            selection: None,
            mouse: MouseState::default(),
            needs_render: true,
        }
    }

    pub fn worksheet(&self) -> &Worksheet {
        &self.ws
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Replace the configuration and relayout everything. Cells whose
    /// measurement depends on a changed setting are re-measured.
    pub fn set_config(&mut self, mut config: Configuration, dc: &dyn DrawContext) {
        config.adopt_epochs(&self.config);
        self.config = config;
        self.recalculate(false, dc);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        if self.selection != selection {
            self.selection = selection;
            self.needs_render = true;
        }
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Return and reset the repaint flag.
    pub fn take_needs_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    /// Append `cells` as a new output line, lay it out and scroll to it.
    pub fn add_line(
        &mut self,
        cells: Vec<Cell>,
        force_new_line: bool,
        dc: &dyn DrawContext,
    ) -> Option<CellId> {
        let head = self.ws.insert_list(cells)?;
        self.attach_line(head, force_new_line, dc);
        Some(head)
    }

    /// Append a deep copy of the top-level cells of `other` as a new line.
    pub fn append_worksheet(
        &mut self,
        other: &Worksheet,
        force_new_line: bool,
        dc: &dyn DrawContext,
    ) -> Option<CellId> {
        let head = other.copy_list(other.first()?, &mut self.ws)?;
        self.attach_line(head, force_new_line, dc);
        Some(head)
    }

    fn attach_line(&mut self, head: CellId, force_new_line: bool, dc: &dyn DrawContext) {
        self.ws.add_line(head, force_new_line);
        layout::recalculate(
            &mut self.ws,
            Some(head),
            &mut self.viewport,
            &self.config,
            dc,
            true,
        );
        self.selection = None;
        self.needs_render = true;
    }

    /// Replace the document with one read from worksheet XML.
    pub fn load_xml(&mut self, xml: &str, dc: &dyn DrawContext) -> Result<()> {
        let ws = export::parse_worksheet_xml(xml)?;
        self.set_worksheet(ws, dc);
        Ok(())
    }

    /// Replace the document, lay it out and scroll to the top.
    pub fn set_worksheet(&mut self, ws: Worksheet, dc: &dyn DrawContext) {
        self.ws = ws;
        self.selection = None;
        self.viewport.scroll_to_units(0, 0);
        self.recalculate(false, dc);
    }

    /// Full relayout of the document.
    pub fn recalculate(&mut self, scroll: bool, dc: &dyn DrawContext) {
        layout::recalculate(
            &mut self.ws,
            None,
            &mut self.viewport,
            &self.config,
            dc,
            scroll,
        );
        self.needs_render = true;
    }

    /// New client size: lines are broken again, nothing is re-measured.
    pub fn resize(&mut self, width: i32, height: i32) {
        layout::resize(&mut self.ws, &mut self.viewport, width, height);
        self.needs_render = true;
    }

    /// Line breaks, positions and scroll region after the draw order
    /// changed (fold, delete).
    fn relayout(&mut self) {
        layout::break_lines(&mut self.ws, None, self.viewport.client.width);
        layout::place(&mut self.ws);
        self.viewport.adjust_size(&self.ws, false);
        self.needs_render = true;
    }

    /// Drop every cell and scroll back to the top.
    pub fn clear(&mut self) {
        self.ws.clear();
        self.selection = None;
        self.mouse = MouseState::default();
        self.viewport.adjust_size(&self.ws, false);
        self.viewport.scroll_to_units(0, 0);
        self.needs_render = true;
    }

    pub fn scroll_to_units(&mut self, x: i32, y: i32) {
        self.viewport.scroll_to_units(x, y);
        self.needs_render = true;
    }

    /// Paint the document and the selection.
    pub fn paint(&self, dc: &mut dyn DrawContext) {
        render::paint(&self.ws, &self.config, dc, self.selection.as_ref());
    }

    pub fn can_copy(&self) -> bool {
        self.selection.is_some()
    }

    /// Plain text of the selection, empty without one.
    pub fn selection_string(&self) -> String {
        self.selection
            .as_ref()
            .map(|sel| selection::selection_string(&self.ws, sel, &self.config))
            .unwrap_or_default()
    }

    /// Copy the selection as text. With `line_breaks` visual lines are
    /// separated by newlines.
    pub fn copy(&self, clipboard: &mut dyn Clipboard, line_breaks: bool) -> bool {
        let Some(sel) = &self.selection else {
            return false;
        };
        let text = selection::copy_text(&self.ws, sel, &self.config, line_breaks);
        clipboard.set_text(&text)
    }

    /// The selected run as a throwaway worksheet.
    pub fn copy_selection(&self) -> Option<Worksheet> {
        self.selection
            .as_ref()
            .map(|sel| self.ws.copy_selection(sel.start, sel.end))
    }

    /// The visible part of the document as a throwaway worksheet.
    pub fn copy_tree(&self) -> Worksheet {
        self.ws.copy_tree()
    }

    /// Render the selection. `None` without a selection or if the image
    /// would exceed `max_size` pixels.
    pub fn selection_bitmap(&self, scale: i32, max_size: Option<u64>) -> Option<BitmapOut> {
        let copy = self.copy_selection()?;
        let mut bitmap = BitmapOut::new(scale);
        bitmap.set_data(copy, &self.config, max_size).then_some(bitmap)
    }

    /// Copy the selection as a PNG image.
    pub fn copy_bitmap(&self, clipboard: &mut dyn Clipboard) -> bool {
        let Some(bitmap) = self.selection_bitmap(1, None) else {
            return false;
        };
        match bitmap.to_png() {
            Ok(png) => clipboard.set_image(&png, bitmap.size()),
            Err(e) => {
                tracing::warn!(error = %e, "bitmap copy failed");
                false
            }
        }
    }

    /// Write the selection to `path` as PNG. Returns the image size, or
    /// [`Size::INVALID`] on failure.
    pub fn copy_to_file(&self, path: &Path) -> Size {
        self.selection_bitmap(1, None)
            .map_or(Size::INVALID, |bitmap| bitmap.to_file(path))
    }

    /// Export the document to an HTML page at `path`.
    pub fn export_html(&self, path: &Path, images: HtmlImages) -> bool {
        export::export_html(&self.ws, &self.config, path, images)
    }

    /// The whole document in `format`.
    pub fn export(&self, format: Format) -> String {
        export::export_worksheet(&self.ws, format, &self.config)
    }

    /// The selection in `format`.
    pub fn export_selection(&self, format: Format) -> Option<String> {
        self.selection
            .as_ref()
            .map(|sel| export::export_range(&self.ws, sel.start, sel.end, format, &self.config))
    }

    pub fn can_delete(&self) -> bool {
        selection::can_delete(&self.ws, self.selection.as_ref())
    }

    /// Delete the group of the selected main prompt. Returns false if the
    /// selection is not deletable.
    pub fn delete_selection(&mut self) -> bool {
        if !selection::delete(&mut self.ws, self.selection.as_ref()) {
            return false;
        }
        self.selection = None;
        self.relayout();
        true
    }
}
