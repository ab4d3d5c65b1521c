//! Auto-scroll while a drag selection leaves the window.
//!
//! The view never owns a timer. It hands out [`TimerRequest`]s and the host
//! calls [`super::WorksheetView::on_timer`] when one fires.

use crate::layout::SCROLL_RATE;
use crate::types::{Point, Size};

/// Delay before the first auto-scroll step after the pointer leaves.
pub const FIRST_TICK_MS: u32 = 200;
/// Delay between further steps while the pointer stays outside.
pub const REPEAT_TICK_MS: u32 = 50;
/// Pixels scrolled per step and axis.
pub const AUTO_SCROLL_STEP: i32 = 10;

/// A one-shot timer the host should schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub delay_ms: u32,
}

impl TimerRequest {
    pub fn first() -> Self {
        Self {
            delay_ms: FIRST_TICK_MS,
        }
    }

    pub fn repeat() -> Self {
        Self {
            delay_ms: REPEAT_TICK_MS,
        }
    }
}

/// Scroll direction for a pointer at `pointer` (window coordinates) over a
/// client area of `client`: a step towards every edge the pointer is on or
/// beyond.
pub fn auto_scroll_delta(pointer: Point, client: Size) -> Point {
    let step = |p: i32, extent: i32| {
        if p <= 0 {
            -AUTO_SCROLL_STEP
        } else if p >= extent {
            AUTO_SCROLL_STEP
        } else {
            0
        }
    };
    Point::new(step(pointer.x, client.width), step(pointer.y, client.height))
}

/// Target scroll position, in scroll units, after one step from `scroll`.
pub fn step_target(scroll: Point, delta: Point) -> Point {
    Point::new(
        (scroll.x + delta.x) / SCROLL_RATE,
        (scroll.y + delta.y) / SCROLL_RATE,
    )
}
