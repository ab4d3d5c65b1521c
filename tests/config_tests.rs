//! Replacing the configuration of a laid-out view.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

mod common;
mod fixtures;

use fixtures::{ids_with_style, FixedSurface};
use mathview::{Cell, CellId, Configuration, TextStyle, Worksheet, WorksheetView};

fn view_of(ws: Worksheet, surface: &FixedSurface) -> WorksheetView {
    let mut view = WorksheetView::new(600, 400, Configuration::default());
    view.set_worksheet(ws, surface);
    view
}

fn config(json: &str) -> Configuration {
    Configuration::from_json(json).unwrap()
}

fn width(view: &WorksheetView, id: CellId) -> i32 {
    view.worksheet().get(id).unwrap().width()
}

/// `a * b` with a multiplication sign the configuration may hide.
fn product() -> (Worksheet, CellId) {
    let mut ws = Worksheet::new();
    ws.append(Cell::text("a", TextStyle::Variable));
    let mut star = Cell::text("*", TextStyle::Default);
    star.set_hidable_mult_sign(true);
    let star = ws.append(star);
    ws.append(Cell::text("b", TextStyle::Variable));
    (ws, star)
}

#[test]
fn test_showing_the_multiplication_sign_remeasures_it() {
    let surface = FixedSurface::new();
    let (ws, star) = product();
    let mut view = view_of(ws, &surface);
    let hidden = width(&view, star);

    view.set_config(config(r#"{"hideMultiplicationSign": false}"#), &surface);
    // One 6px glyph plus padding on both sides.
    assert_eq!(width(&view, star), 8);
    assert_ne!(width(&view, star), hidden);

    view.set_config(Configuration::default(), &surface);
    assert_eq!(width(&view, star), hidden);
}

#[test]
fn test_displayed_digits_split_and_join_numbers() {
    let surface = FixedSurface::new();
    let mut ws = Worksheet::new();
    let number = ws.append(Cell::text("123456789012", TextStyle::Number));
    let mut view = view_of(ws, &surface);
    let full = width(&view, number);
    assert_eq!(full, 12 * 6 + 2);

    view.set_config(config(r#"{"displayedDigits": 6}"#), &surface);
    let cell = view.worksheet().get(number).unwrap();
    assert!(cell.as_text().unwrap().number_split().is_some());
    assert_ne!(cell.width(), full);

    view.set_config(Configuration::default(), &surface);
    let cell = view.worksheet().get(number).unwrap();
    assert!(cell.as_text().unwrap().number_split().is_none());
    assert_eq!(cell.width(), full);
}

#[test]
fn test_user_labels_switch_label_style() {
    let surface = FixedSurface::new();
    let mut ws = Worksheet::new();
    let label = ws.append(Cell::text("(%o1) ", TextStyle::Label));
    ws.set_user_defined_label(label, "eq1");
    ws.append(Cell::text("x", TextStyle::Variable));
    let mut view = view_of(ws, &surface);
    assert_eq!(ids_with_style(view.worksheet(), TextStyle::Label), vec![label]);

    view.set_config(config(r#"{"useUserLabels": true}"#), &surface);
    assert_eq!(ids_with_style(view.worksheet(), TextStyle::UserLabel), vec![label]);

    view.set_config(Configuration::default(), &surface);
    assert_eq!(ids_with_style(view.worksheet(), TextStyle::Label), vec![label]);
}

#[test]
fn test_label_width_resizes_the_label_column() {
    let surface = FixedSurface::new();
    let mut ws = Worksheet::new();
    let label = ws.append(Cell::text("(%o1) ", TextStyle::Label));
    ws.append(Cell::text("x", TextStyle::Variable));
    let mut view = view_of(ws, &surface);
    assert_eq!(width(&view, label), 4 * 12 + 1);

    view.set_config(config(r#"{"labelWidth": 6}"#), &surface);
    assert_eq!(width(&view, label), 6 * 12 + 1);
}

#[test]
fn test_equal_configuration_does_not_remeasure() {
    let surface = FixedSurface::new();
    let (ws, _) = product();
    let mut view = view_of(ws, &surface);
    let measured = surface.measured.get();

    view.set_config(config("{}"), &surface);
    assert_eq!(surface.measured.get(), measured);
}
