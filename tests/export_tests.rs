//! Document-level exports: text formats, worksheet XML, archives and HTML.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

mod common;
mod fixtures;

use common::lay_out;
use fixtures::{ids_with_style, sum_session};
use mathview::export::{self, archive, html, Format, HtmlImages};
use mathview::{Cell, Configuration, TextStyle, Worksheet};
use test_case::test_case;

fn single(text: &str, style: TextStyle) -> Worksheet {
    let mut ws = Worksheet::new();
    ws.append(Cell::text(text, style));
    ws
}

#[test_case("42", TextStyle::Number, Format::MathMl, "<mn>42</mn>\n" ; "mathml number")]
#[test_case("sin", TextStyle::Function, Format::MathMl, "<mi>sin</mi>\n" ; "mathml function")]
#[test_case("x", TextStyle::Variable, Format::Omml, "<m:r>x</m:r>\n" ; "omml run")]
#[test_case("x", TextStyle::Variable, Format::Xml, "<mth><v>x</v></mth>" ; "xml document")]
#[test_case("%pi", TextStyle::SpecialConstant, Format::Matlab, "pi" ; "matlab constant")]
#[test_case("hello", TextStyle::String, Format::Text, "\"hello\"" ; "quoted string")]
#[test_case("xy", TextStyle::Variable, Format::Tex, "\\mathit{xy}" ; "tex long variable")]
#[test_case("inf", TextStyle::SpecialConstant, Format::Tex, "\\infty " ; "tex infinity")]
fn test_single_cell_export(text: &str, style: TextStyle, format: Format, expected: &str) {
    let ws = single(text, style);
    assert_eq!(
        export::export_worksheet(&ws, format, &Configuration::default()),
        expected
    );
}

#[test_case("text" ; "text")]
#[test_case("MathML" ; "mixed case")]
#[test_case("OMML" ; "upper case")]
fn test_format_names_are_case_insensitive(name: &str) {
    let format: Format = name.parse().unwrap();
    assert!(format.name().eq_ignore_ascii_case(name));
}

#[test]
fn test_text_export_of_laid_out_session() {
    let mut ws = sum_session(2).build();
    lay_out(&mut ws, 900, &Configuration::default());
    let text = export::export_worksheet(&ws, Format::Text, &Configuration::default());
    assert_eq!(text, "(%i1)\tx+1;\n(%o1)\tx+1\n(%i2)\tx+2;\n(%o2)\tx+2");
}

#[test]
fn test_folded_cells_skip_text_but_not_xml() {
    let mut ws = sum_session(2).build();
    let config = Configuration::default();
    let full_xml = export::export_worksheet(&ws, Format::Xml, &config);
    let labels = ids_with_style(&ws, TextStyle::Label);
    ws.toggle_fold(labels[0]);
    let text = export::export_worksheet(&ws, Format::Text, &config);
    assert!(!text.contains("x+1\n"));
    assert_eq!(export::export_worksheet(&ws, Format::Xml, &config), full_xml);
}

#[test]
fn test_rtf_wraps_labels_in_document() {
    let ws = sum_session(1).build();
    let rtf = export::export_worksheet(&ws, Format::Rtf, &Configuration::default());
    assert!(rtf.starts_with("{\\rtf1\\ansi\\deff0{\\colortbl"));
    assert!(rtf.contains("\\cf10{(%o1) }\\cf0") || rtf.contains("\\cf10{(%o1)}\\cf0"));
    assert!(rtf.ends_with("\n}"));
}

#[test]
fn test_xml_write_is_stable_through_a_read() {
    let ws = sum_session(3).build();
    let config = Configuration::default();
    let xml = export::write_worksheet_xml(&ws, &config);
    let back = export::parse_worksheet_xml(&xml).unwrap();
    assert_eq!(back.logical().count(), ws.logical().count());
    assert_eq!(export::write_worksheet_xml(&back, &config), xml);
}

#[test]
fn test_xml_with_diff_reads_back_exactly() {
    let source = "<mth><lbl>(%o1)</lbl><d><r><s>d</s></r><r><v>f</v></r></d><n>2.5</n></mth>";
    let ws = export::parse_worksheet_xml(source).unwrap();
    assert_eq!(
        export::write_worksheet_xml(&ws, &Configuration::default()),
        source
    );
}

#[test]
fn test_archive_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.zip");
    let ws = sum_session(2).build();
    let config = Configuration::default();
    assert!(archive::save_archive(&ws, &config, &path));

    let data = std::fs::read(&path).unwrap();
    let entries = archive::archive_entries(&data).unwrap();
    assert!(entries.iter().any(|e| e == archive::CONTENT_ENTRY));
    assert!(entries.iter().any(|e| e.starts_with("img/")));

    let back = archive::load_archive(&path).unwrap();
    assert_eq!(
        export::write_worksheet_xml(&back, &config),
        export::write_worksheet_xml(&ws, &config)
    );
}

#[test]
fn test_archive_rejects_garbage() {
    assert!(export::read_archive(b"not a zip").is_err());
    let dir = tempfile::tempdir().unwrap();
    assert!(archive::load_archive(&dir.path().join("missing.zip")).is_err());
}

#[test]
fn test_html_writes_one_image_per_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.html");
    let ws = sum_session(3).build();
    html::write_html(&ws, &Configuration::default(), &path, HtmlImages::Files).unwrap();

    let page = std::fs::read_to_string(&path).unwrap();
    for n in 0..3 {
        assert!(page.contains(&format!("SRC=\"img/s{n}.png\"")));
        assert!(dir.path().join("img").join(format!("s{n}.png")).exists());
    }
    assert_eq!(page.matches("<!-- Input/output group -->").count(), 3);
}

#[test]
fn test_html_inline_keeps_everything_in_the_page() {
    let ws = sum_session(2).build();
    let doc = html::render_html(&ws, &Configuration::default(), "s", HtmlImages::Inline).unwrap();
    assert!(doc.images.is_empty());
    assert_eq!(doc.html.matches("data:image/png;base64,").count(), 2);
}
