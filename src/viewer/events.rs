//! Mouse and keyboard handling for [`WorksheetView`].
//!
//! Coordinates passed in are window coordinates; hit-testing works on
//! unscrolled worksheet coordinates.

use super::clipboard::Clipboard;
use super::scroll::{auto_scroll_delta, step_target, TimerRequest};
use super::WorksheetView;
use crate::selection::{self, PointOutcome};
use crate::types::Point;

/// Pointer state between events.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MouseState {
    left_down: bool,
    /// The pointer moved while the button was down.
    drag: bool,
    /// The pointer is outside the client area.
    outside: bool,
    /// Where the button went down, unscrolled.
    down: Point,
    /// Where the pointer last was during the drag, unscrolled.
    up: Point,
    /// Last pointer position outside the window, window coordinates.
    pointer: Point,
}

impl WorksheetView {
    pub fn on_mouse_left_down(&mut self, x: i32, y: i32) {
        self.mouse.left_down = true;
        self.mouse.down = self.viewport.to_unscrolled(Point::new(x, y));
    }

    /// A release without movement is a click.
    pub fn on_mouse_left_up(&mut self) {
        if !self.mouse.drag {
            self.click(self.mouse.down);
        }
        self.mouse.left_down = false;
        self.mouse.drag = false;
    }

    fn click(&mut self, point: Point) {
        match selection::select_point(&mut self.ws, point) {
            PointOutcome::Selected(sel) => self.set_selection(Some(sel)),
            PointOutcome::Cleared => self.set_selection(None),
            PointOutcome::Folded(id) => {
                tracing::debug!(cell = %id, "toggled fold");
                self.selection = None;
                self.relayout();
            }
        }
    }

    /// Dragging with the button down selects a rectangle.
    pub fn on_mouse_motion(&mut self, x: i32, y: i32) {
        if self.ws.is_empty() || !self.mouse.left_down {
            return;
        }
        self.mouse.drag = true;
        self.mouse.up = self.viewport.to_unscrolled(Point::new(x, y));
        if self.mouse.outside {
            self.mouse.pointer = Point::new(x, y);
        }
        let sel = selection::select_rect(&self.ws, self.mouse.down, self.mouse.up);
        self.set_selection(sel);
    }

    /// Leaving the window during a drag starts auto-scrolling.
    pub fn on_mouse_exit(&mut self, x: i32, y: i32) -> Option<TimerRequest> {
        self.mouse.outside = true;
        if !self.mouse.left_down {
            return None;
        }
        self.mouse.pointer = Point::new(x, y);
        Some(TimerRequest::first())
    }

    pub fn on_mouse_enter(&mut self) {
        self.mouse.outside = false;
    }

    /// One auto-scroll step. Returns the next timer while the drag
    /// continues outside the window.
    pub fn on_timer(&mut self) -> Option<TimerRequest> {
        if !self.mouse.left_down || !self.mouse.outside {
            return None;
        }
        let delta = auto_scroll_delta(self.mouse.pointer, self.viewport.client);
        let target = step_target(self.viewport.scroll, delta);
        self.scroll_to_units(target.x, target.y);
        tracing::trace!(scroll_y = self.viewport.scroll.y, "auto-scroll step");
        Some(TimerRequest::repeat())
    }

    /// Ctrl+C copies, Delete deletes a deletable selection. Returns false
    /// if the key was not handled and should go on to the host.
    pub fn on_key_up(&mut self, key: &str, ctrl: bool, clipboard: &mut dyn Clipboard) -> bool {
        match key {
            "c" | "C" if ctrl && self.can_copy() => self.copy(clipboard, false),
            "Delete" if self.can_delete() => self.delete_selection(),
            _ => false,
        }
    }
}
