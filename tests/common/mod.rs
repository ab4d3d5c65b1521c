//! Layout helpers and structural assertions shared by the integration tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mathview::layout::{self, Viewport};
use mathview::{CellId, Configuration, Worksheet};

pub use super::fixtures::*;

/// Run the full layout pipeline on `ws` for a client area `width` wide.
pub fn lay_out(ws: &mut Worksheet, width: i32, config: &Configuration) -> Viewport {
    let mut viewport = Viewport::new(width, 400);
    layout::recalculate(ws, None, &mut viewport, config, &FixedSurface::new(), false);
    viewport
}

/// Visual lines in draw order.
pub fn lines(ws: &Worksheet) -> Vec<Vec<CellId>> {
    let mut out: Vec<Vec<CellId>> = Vec::new();
    for id in ws.draw_order() {
        let starts = ws.get(id).unwrap().break_line_here();
        match out.last_mut() {
            Some(line) if !starts => line.push(id),
            _ => out.push(vec![id]),
        }
    }
    out
}

/// The draw order is a subsequence of the logical order that starts at
/// the first cell.
pub fn assert_draw_order_follows_next(ws: &Worksheet) {
    let logical: Vec<CellId> = ws.logical().collect();
    let mut pos = 0;
    for (n, id) in ws.draw_order().enumerate() {
        if n == 0 {
            assert_eq!(Some(id), ws.first());
        }
        let found = logical[pos..].iter().position(|&l| l == id);
        assert!(found.is_some(), "{id} is not reachable via next from its draw predecessor");
        pos += found.unwrap() + 1;
    }
}

/// Every `next` has a matching `previous`.
pub fn assert_links_consistent(ws: &Worksheet) {
    let mut prev: Option<CellId> = None;
    for id in ws.logical() {
        assert_eq!(ws.get(id).unwrap().previous(), prev, "bad previous link at {id}");
        prev = Some(id);
    }
}
