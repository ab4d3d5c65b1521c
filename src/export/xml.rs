//! The worksheet XML format: `<mth>` wrapping one element per cell.
//!
//! Text leaves are tagged by style (`v`, `fnm`, `n`, `g`, `s`, `st`, `lbl`,
//! `t`, `h`); derivative cells are `<d>` with two `<r>` lists, diff first.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::cell::{self, Cell, CellKind};
use crate::config::Configuration;
use crate::error::{MathviewError, Result};
use crate::types::{CellId, TextStyle};
use crate::worksheet::Worksheet;

/// Serialize the whole logical sequence, folded cells included.
pub fn write_worksheet_xml(ws: &Worksheet, config: &Configuration) -> String {
    let mut out = String::from("<mth>");
    for id in ws.logical() {
        out.push_str(&cell::to_xml(ws, id, config));
    }
    out.push_str("</mth>");
    out
}

/// Serialize the cells from `start` to `end` in logical order.
pub fn write_range_xml(
    ws: &Worksheet,
    start: CellId,
    end: CellId,
    config: &Configuration,
) -> String {
    let mut out = String::from("<mth>");
    for id in ws.logical_from(start) {
        out.push_str(&cell::to_xml(ws, id, config));
        if id == end {
            break;
        }
    }
    out.push_str("</mth>");
    out
}

/// A parsed element before it is stored in the arena.
#[derive(Debug)]
enum Node {
    Leaf(Box<Cell>),
    Diff {
        force_break: bool,
        diff: Vec<Node>,
        base: Vec<Node>,
    },
}

/// Attribute value by key, entity references resolved.
fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return attr.unescape_value().ok().map(|v| v.into_owned());
        }
    }
    None
}

fn attr_bool(e: &BytesStart, key: &[u8]) -> bool {
    attr_string(e, key).is_some_and(|s| matches!(s.as_str(), "true" | "yes" | "1"))
}

fn leaf_style(e: &BytesStart) -> TextStyle {
    let typed = || {
        attr_string(e, b"type")
            .and_then(|t| TextStyle::from_xml_type(&t))
            .unwrap_or(TextStyle::Default)
    };
    match e.name().as_ref() {
        b"v" => TextStyle::Variable,
        b"fnm" => TextStyle::Function,
        b"n" => TextStyle::Number,
        b"g" => TextStyle::GreekConstant,
        b"s" => TextStyle::SpecialConstant,
        b"st" => TextStyle::String,
        b"lbl" if attr_bool(e, b"userdefined") => TextStyle::UserLabel,
        b"lbl" => TextStyle::Label,
        _ => typed(),
    }
}

fn leaf(e: &BytesStart, text: &str) -> Cell {
    let mut cell = Cell::text(text, leaf_style(e));
    if e.name().as_ref() == b"h" {
        cell.set_hidden(true);
        cell.set_hidable_mult_sign(true);
    }
    if attr_bool(e, b"breakline") {
        cell.force_break_line(true);
    }
    if let Some(label) = attr_string(e, b"userdefinedlabel") {
        if let CellKind::Text(t) = &mut cell.kind {
            t.set_user_defined_label(&label);
        }
    }
    cell.set_alt_copy_text(attr_string(e, b"altCopy"));
    cell.set_tool_tip(attr_string(e, b"tooltip"));
    cell
}

fn unexpected_eof(inside: &[u8]) -> MathviewError {
    MathviewError::Parse(format!(
        "document ends inside <{}>",
        String::from_utf8_lossy(inside)
    ))
}

/// Text content up to the end tag of a leaf.
fn read_leaf_text(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<String> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(e) if e.name().as_ref() == tag => return Ok(text),
            Event::Eof => return Err(unexpected_eof(tag)),
            _ => {}
        }
    }
}

fn read_diff(reader: &mut Reader<&[u8]>, force_break: bool) -> Result<Node> {
    let mut lists = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"r" => lists.push(read_list(reader, b"r")?),
            Event::Empty(e) if e.name().as_ref() == b"r" => lists.push(Vec::new()),
            Event::End(e) if e.name().as_ref() == b"d" => break,
            Event::Eof => return Err(unexpected_eof(b"d")),
            _ => {}
        }
    }
    if lists.len() != 2 {
        tracing::warn!(lists = lists.len(), "derivative without exactly two lists");
    }
    let mut lists = lists.into_iter();
    Ok(Node::Diff {
        force_break,
        diff: lists.next().unwrap_or_default(),
        base: lists.next().unwrap_or_default(),
    })
}

/// Elements up to the end tag `end`.
fn read_list(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"d" => {
                nodes.push(read_diff(reader, attr_bool(&e, b"breakline"))?);
            }
            Event::Start(e) => {
                let tag = e.name().as_ref().to_vec();
                let text = read_leaf_text(reader, &tag)?;
                nodes.push(Node::Leaf(Box::new(leaf(&e, &text))));
            }
            Event::Empty(e) => nodes.push(Node::Leaf(Box::new(leaf(&e, "")))),
            Event::End(e) if e.name().as_ref() == end => return Ok(nodes),
            Event::End(e) => {
                return Err(MathviewError::Parse(format!(
                    "unexpected </{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Eof => return Err(unexpected_eof(end)),
            _ => {}
        }
    }
}

/// Store `nodes` as a detached chain, inner lists included.
fn materialize(ws: &mut Worksheet, nodes: Vec<Node>) -> Option<CellId> {
    let mut cells = Vec::with_capacity(nodes.len());
    let mut inner = Vec::new();
    for (i, node) in nodes.into_iter().enumerate() {
        match node {
            Node::Leaf(cell) => cells.push(*cell),
            Node::Diff {
                force_break,
                diff,
                base,
            } => {
                let mut cell = Cell::diff();
                cell.force_break_line(force_break);
                cells.push(cell);
                inner.push((i, diff, base));
            }
        }
    }
    let head = ws.insert_list(cells)?;
    let ids: Vec<CellId> = ws.logical_from(head).collect();
    for (i, diff, base) in inner {
        let Some(&id) = ids.get(i) else {
            continue;
        };
        let diff = materialize(ws, diff);
        let base = materialize(ws, base);
        ws.set_diff(id, diff);
        ws.set_base(id, base);
    }
    Some(head)
}

/// Parse a `<mth>` document into a new worksheet.
pub fn parse_worksheet_xml(xml: &str) -> Result<Worksheet> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let nodes = loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"mth" => break read_list(&mut reader, b"mth")?,
            Event::Empty(e) if e.name().as_ref() == b"mth" => break Vec::new(),
            Event::Start(e) | Event::Empty(e) => {
                return Err(MathviewError::Parse(format!(
                    "expected <mth>, found <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Eof => return Err(MathviewError::Parse("no <mth> element".to_string())),
            _ => {}
        }
    };

    let mut ws = Worksheet::new();
    if let Some(head) = materialize(&mut ws, nodes) {
        ws.attach(head);
    }
    tracing::debug!(cells = ws.len(), "parsed worksheet xml");
    Ok(ws)
}
