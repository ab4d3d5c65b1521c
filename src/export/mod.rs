//! Export pipeline.
//!
//! Per-cell conversions live with the cells; this module strings them
//! together over runs of cells and adds the document-level formats: the
//! worksheet XML, HTML with result images and the session archive.

pub mod archive;
pub(crate) mod escape;
pub mod html;
pub mod xml;

use std::fmt;
use std::str::FromStr;

pub use archive::{read_archive, write_archive};
pub use html::{export_html, render_html, HtmlDocument, HtmlImages};
pub use xml::{parse_worksheet_xml, write_worksheet_xml};

use crate::cell;
use crate::config::Configuration;
use crate::error::MathviewError;
use crate::types::{CellId, TextStyle};
use crate::worksheet::Worksheet;

/// A text format every cell can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Text,
    Matlab,
    Tex,
    MathMl,
    Omml,
    Rtf,
    Xml,
}

type Convert = fn(&Worksheet, CellId, &Configuration) -> String;

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Text,
        Format::Matlab,
        Format::Tex,
        Format::MathMl,
        Format::Omml,
        Format::Rtf,
        Format::Xml,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Matlab => "matlab",
            Format::Tex => "tex",
            Format::MathMl => "mathml",
            Format::Omml => "omml",
            Format::Rtf => "rtf",
            Format::Xml => "xml",
        }
    }

    fn converter(self) -> Convert {
        match self {
            Format::Text => cell::to_string,
            Format::Matlab => cell::to_matlab,
            Format::Tex => cell::to_tex,
            Format::MathMl => cell::to_mathml,
            Format::Omml => cell::to_omml,
            Format::Rtf => cell::to_rtf,
            Format::Xml => cell::to_xml,
        }
    }

    /// Convert one cell, inner lists included.
    pub fn cell(self, ws: &Worksheet, id: CellId, config: &Configuration) -> String {
        (self.converter())(ws, id, config)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = MathviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MathviewError::Other(format!("unknown format: {s}")))
    }
}

/// Convert a list linked by `next`.
pub fn export_list(ws: &Worksheet, head: Option<CellId>, format: Format, config: &Configuration) -> String {
    cell::list_to(ws, head, config, format.converter())
}

/// Convert the cells from `start` to `end` in draw order, the way a
/// selection is exported. An `end` that is never reached converts to the
/// end of the worksheet.
pub fn export_range(
    ws: &Worksheet,
    start: CellId,
    end: CellId,
    format: Format,
    config: &Configuration,
) -> String {
    let mut out = String::new();
    for id in ws.draw_from(start) {
        out.push_str(&format.cell(ws, id, config));
        if id == end {
            break;
        }
    }
    out
}

/// Convert the whole worksheet in draw order. XML is wrapped in `<mth>`
/// and covers folded cells too.
pub fn export_worksheet(ws: &Worksheet, format: Format, config: &Configuration) -> String {
    match format {
        Format::Xml => write_worksheet_xml(ws, config),
        Format::Rtf => rtf_document(
            &ws.draw_order()
                .map(|id| format.cell(ws, id, config))
                .collect::<String>(),
            config,
        ),
        _ => ws.draw_order().map(|id| format.cell(ws, id, config)).collect(),
    }
}

/// Wrap RTF spans in a document whose colour table is indexed by style.
pub fn rtf_document(body: &str, config: &Configuration) -> String {
    let mut out = String::from("{\\rtf1\\ansi\\deff0{\\colortbl");
    for style in TextStyle::ALL {
        let color = config.color(style);
        out.push_str(&format!(
            "\\red{}\\green{}\\blue{};",
            color.r, color.g, color.b
        ));
    }
    out.push_str("}\n");
    out.push_str(body);
    out.push_str("\n}");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    #[test]
    fn test_format_names_parse() {
        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>().unwrap(), format);
        }
        assert_eq!("TeX".parse::<Format>().unwrap(), Format::Tex);
        assert!("docx".parse::<Format>().is_err());
    }

    #[test]
    fn test_range_stops_at_end() {
        let mut ws = Worksheet::new();
        let a = ws.append(Cell::text("a", TextStyle::Variable));
        let b = ws.append(Cell::text("b", TextStyle::Variable));
        ws.append(Cell::text("c", TextStyle::Variable));
        let config = Configuration::default();
        assert_eq!(export_range(&ws, a, b, Format::Xml, &config), "<v>a</v><v>b</v>");
        assert_eq!(export_range(&ws, b, b, Format::Text, &config), "b");
    }

    #[test]
    fn test_rtf_document_color_table() {
        let doc = rtf_document("x", &Configuration::default());
        assert!(doc.starts_with("{\\rtf1\\ansi\\deff0{\\colortbl\\red0\\green0\\blue0;"));
        assert_eq!(doc.matches(';').count(), TextStyle::ALL.len());
        assert!(doc.ends_with("x\n}"));
    }

    #[test]
    fn test_list_and_worksheet_agree_without_folds() {
        let mut ws = Worksheet::new();
        let head = ws.append(Cell::text("x", TextStyle::Variable));
        ws.append(Cell::text("+", TextStyle::Default));
        ws.append(Cell::text("1", TextStyle::Number));
        let config = Configuration::default();
        assert_eq!(
            export_list(&ws, Some(head), Format::Tex, &config),
            export_worksheet(&ws, Format::Tex, &config)
        );
    }
}
