//! Text leaves: variables, numbers, operators, labels, prompts and messages.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{symbols, tooltips, Cell, CellKind, TEXT_PADDING};
use crate::config::Configuration;
use crate::export::escape::{rtf_escape, xml_escape};
use crate::render::{in_update_region, DrawContext, Font};
use crate::types::{CellId, Point, Rect, Size, TextStyle};
use crate::worksheet::Worksheet;

/// Characters a variable or function name can only contain backslash-quoted.
const QUOTED_CHARS: &str = "\\'\"()[]-{}^+*/&\u{00A7}?:;=#<>$";
/// Same set for Matlab, where `-` stays as is.
const QUOTED_CHARS_MATLAB: &str = "\\'\"()[]{}^+*/&\u{00A7}?:;=#<>$";

const INVISIBLE_TIMES: &str = "&#8290;";
const CENTER_DOT: &str = "\u{00B7}";

const UMLAUTS: [char; 6] = ['\u{e4}', '\u{f6}', '\u{fc}', '\u{c4}', '\u{d6}', '\u{dc}'];

fn unescape_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\(.)").ok()).as_ref()
}

/// Drop the backslashes the engine puts in front of quoted characters.
fn unescape(text: &str) -> String {
    match unescape_regex() {
        Some(re) => re.replace_all(text, "$1").into_owned(),
        None => text.to_string(),
    }
}

/// The three parts a long number is displayed as.
#[derive(Debug, Clone, Default)]
pub struct NumberSplit {
    pub start: String,
    pub ellipsis: String,
    pub end: String,
    widths: [Size; 3],
}

/// Text-cell payload.
#[derive(Debug, Clone, Default)]
pub struct TextCell {
    /// Value as received, after normalisation.
    text: String,
    /// What is drawn when no substitute glyph applies.
    displayed_text: String,
    user_defined_label: String,
    dont_escape_opening_parenthesis: bool,
    /// Substitute glyph (Greek letter, operator symbol).
    alt_text: Option<String>,
    number_split: Option<NumberSplit>,
    /// Digit limit `number_split` was derived for.
    split_digits: Option<usize>,
    label_font_size: i32,
    /// Text extents keyed by the font they were measured with.
    extents: HashMap<Font, Size>,
}

impl TextCell {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn displayed_text(&self) -> &str {
        &self.displayed_text
    }

    pub fn user_defined_label(&self) -> &str {
        &self.user_defined_label
    }

    pub fn number_split(&self) -> Option<&NumberSplit> {
        self.number_split.as_ref()
    }

    pub fn alt_text(&self) -> Option<&str> {
        self.alt_text.as_deref()
    }

    /// True for the four arithmetic operators.
    pub fn is_operator(&self) -> bool {
        matches!(self.text.as_str(), "+" | "*" | "/" | "-" | "\u{2212}")
    }

    pub(crate) fn clear_extents(&mut self) {
        self.extents.clear();
        if let Some(split) = &mut self.number_split {
            split.widths = [Size::default(); 3];
        }
    }

    /// Store `text` and return the tooltip that goes with it.
    pub(crate) fn set_value(
        &mut self,
        text: &str,
        style: TextStyle,
        previous: Option<&str>,
    ) -> Option<String> {
        self.clear_extents();
        self.text = text
            // The original's U+DCB6 -> U+00A0 rule (wxString's undecodable-byte
            // mapping) is not expressible here: `&str` cannot hold a surrogate.
            .replace('\n', "")
            .replace("-->", "\u{2794}")
            .replace(" -->", "\u{2794}")
            .replace(" \u{2212}\u{2192} ", "\u{2794}")
            .replace("->", "\u{2192}")
            .replace("\u{2212}>", "\u{2192}");
        self.displayed_text = self.function_glyph(style);
        self.alt_text = None;
        self.number_split = None;
        self.split_digits = None;

        if style == TextStyle::Number {
            return tooltips::looks_like_rounding_error(&self.displayed_text)
                .then(|| tooltips::ROUNDING_ERROR.to_string());
        }
        tooltips::tooltip_for(&self.text, style, previous).map(str::to_string)
    }

    pub(crate) fn style_changed(&mut self, style: TextStyle) {
        self.extents.clear();
        self.displayed_text = self.function_glyph(style);
        if style != TextStyle::Number {
            self.number_split = None;
            self.split_digits = None;
        }
    }

    fn function_glyph(&self, style: TextStyle) -> String {
        match (style, self.text.as_str()) {
            (TextStyle::Function, "gamma") => "\u{0393}".to_string(),
            (TextStyle::Function, "psi") => "\u{03A8}".to_string(),
            _ => self.text.clone(),
        }
    }

    pub(crate) fn set_user_defined_label(&mut self, label: &str) {
        self.user_defined_label = label.to_string();
        self.extents.clear();
    }

    pub(crate) fn set_dont_escape_opening_parenthesis(&mut self, on: bool) {
        self.dont_escape_opening_parenthesis = on;
    }

    pub(crate) fn needs_recalculation(&self, style: TextStyle, config: &Configuration) -> bool {
        (style == TextStyle::UserLabel && !config.use_user_labels())
            || (style == TextStyle::Label
                && config.use_user_labels()
                && !self.user_defined_label.is_empty())
            || (style == TextStyle::Number
                && self.split_digits != Some(config.displayed_digits()))
    }

    /// Split a number longer than `digits` into start, marker and end.
    /// Returns true if the number is shown shortened.
    fn derive_number_split(&mut self, digits: usize) -> bool {
        self.split_digits = Some(digits);
        self.number_split = None;
        let len = self.displayed_text.chars().count();
        if len <= digits {
            return false;
        }
        let left = (digits / 3).min(30);
        let start: String = self.displayed_text.chars().take(left).collect();
        if start.is_empty() {
            return false;
        }
        let end: String = self.displayed_text.chars().skip(len - left).collect();
        self.number_split = Some(NumberSplit {
            start,
            ellipsis: format!("[{} digits]", len - 2 * left),
            end,
            widths: [Size::default(); 3],
        });
        true
    }

    fn set_alt_text(&mut self, style: TextStyle, config: &Configuration) {
        self.alt_text = None;
        if style == TextStyle::Default && self.text.starts_with('"') {
            return;
        }
        if style == TextStyle::GreekConstant {
            if config.latin_to_greek() {
                self.alt_text = Some(symbols::greek_unicode(&self.text).to_string());
            }
        } else {
            self.alt_text =
                symbols::symbol_unicode(&self.text, config.keep_percent()).map(str::to_string);
        }
    }

    /// Text shown in the label column.
    fn label_text(&self, style: TextStyle) -> String {
        if style == TextStyle::UserLabel {
            format!("({})", unescape(&self.user_defined_label))
        } else {
            self.displayed_text.clone()
        }
    }

    /// Font for `style`; `%e` and `%i` shown without their percent sign
    /// flip slant so they stand out from ordinary variables.
    fn font(&self, style: TextStyle, size: i32, config: &Configuration) -> Font {
        let mut font = config.font(style, size);
        if !config.keep_percent() && matches!(self.text.as_str(), "%e" | "%i") {
            font.italic = !config.styles().get(TextStyle::Variable).italic;
        }
        font
    }

    fn extent(&mut self, dc: &dyn DrawContext, text: &str, font: &Font) -> Size {
        *self
            .extents
            .entry(font.clone())
            .or_insert_with(|| dc.text_extent(text, font))
    }

    /// Text the plain-text conversions start from.
    fn copy_source(&self, config: &Configuration) -> String {
        let text = if config.use_user_labels() && !self.user_defined_label.is_empty() {
            format!("({})", self.user_defined_label)
        } else {
            self.text.clone()
        };
        text.replace('\u{2212}', "-")
            .replace('\u{2794}', "-->")
            .replace('\u{2192}', "->")
    }
}

/// Measure a text cell at `font_size`.
pub(crate) fn recalculate_widths(
    cell: &mut Cell,
    font_size: i32,
    config: &Configuration,
    dc: &dyn DrawContext,
) {
    let requested = if font_size < config.min_font_size() {
        cell.font_size
    } else {
        font_size
    };
    if !cell.needs_recalculation(requested, config) {
        return;
    }
    if cell.measured.map(|m| m.epochs) != Some(config.epochs()) {
        if let CellKind::Text(t) = &mut cell.kind {
            t.clear_extents();
        }
    }

    let hides = cell.hides_mult_sign(config);
    let Cell {
        style,
        width,
        height,
        center,
        font_size: cell_font_size,
        tool_tip,
        kind,
        ..
    } = cell;
    let CellKind::Text(t) = kind else {
        return;
    };

    if *style == TextStyle::UserLabel && !config.use_user_labels() {
        *style = TextStyle::Label;
    }
    if *style == TextStyle::Label
        && config.use_user_labels()
        && !t.user_defined_label.is_empty()
    {
        *style = TextStyle::UserLabel;
    }

    let size = if style.is_heading() {
        config.style_font_size(*style, requested)
    } else if style.keeps_own_font_size() {
        config.font_size()
    } else {
        requested
    };
    *cell_font_size = size.max(config.min_font_size());
    let font = t.font(*style, *cell_font_size, config);

    t.set_alt_text(*style, config);

    if *style == TextStyle::Number && t.split_digits != Some(config.displayed_digits()) {
        let shortened = t.derive_number_split(config.displayed_digits());
        if shortened {
            if tool_tip.as_deref() == Some(tooltips::ROUNDING_ERROR) {
                *tool_tip = None;
            }
        } else if tooltips::looks_like_rounding_error(&t.displayed_text) {
            *tool_tip = Some(tooltips::ROUNDING_ERROR.to_string());
        }
    }

    if let Some(split) = &mut t.number_split {
        split.widths = [
            dc.text_extent(&split.start, &font),
            dc.text_extent(&split.ellipsis, &font),
            dc.text_extent(&split.end, &font),
        ];
        *width = split.widths.iter().map(|s| s.width).sum();
        *height = split.widths.iter().map(|s| s.height).max().unwrap_or(0);
    } else if style.is_fixed_width() {
        let label = t.label_text(*style);
        let column = config.label_width();
        t.label_font_size = *cell_font_size + 1;
        let mut label_font = config.font(*style, t.label_font_size);
        let mut extent = t.extent(dc, &label, &label_font);
        while extent.width >= column && t.label_font_size > 2 {
            t.label_font_size -= 1;
            label_font = config.font(*style, t.label_font_size);
            if label_font.size < t.label_font_size {
                // Clamped by the minimum font size; shrinking further changes nothing.
                break;
            }
            extent = t.extent(dc, &label, &label_font);
        }
        *width = column + TEXT_PADDING;
        *height = extent.height;
    } else {
        let measured = if let Some(alt) = t.alt_text.clone() {
            t.extent(dc, &alt, &font)
        } else if t.displayed_text.is_empty() {
            Size::new(0, *cell_font_size)
        } else {
            let shown = t.displayed_text.clone();
            t.extent(dc, &shown, &font)
        };
        *width = measured.width + 2 * TEXT_PADDING;
        *height = measured.height + 2 * TEXT_PADDING;
        if hides {
            *height = 0;
            *width /= 4;
        }
    }

    *height = (*height).max(super::MIN_HEIGHT);
    *center = *height / 2;
    cell.mark_measured(requested, config);
}

pub(crate) fn draw(
    cell: &Cell,
    t: &TextCell,
    point: Point,
    config: &Configuration,
    dc: &mut dyn DrawContext,
) {
    if cell.hides_mult_sign(config) {
        return;
    }
    let rect = Rect::new(point.x, point.y - cell.center, cell.width, cell.height);
    if !in_update_region(dc, &rect) {
        return;
    }
    let style = cell.style;
    let x = point.x + TEXT_PADDING;
    let y = point.y - cell.center + TEXT_PADDING;
    let color = config.color(style);
    dc.set_font(&t.font(style, cell.font_size, config));
    dc.set_text_color(color);

    if style.is_fixed_width() {
        if (style == TextStyle::UserLabel || config.show_automatic_labels())
            && config.show_labels()
        {
            let font = if cell.draw_next_is_next {
                config.font(style, t.label_font_size)
            } else {
                config.hidden_font(t.label_font_size)
            };
            dc.set_font(&font);
            dc.draw_text(&t.label_text(style), x, y);
        }
    } else if let Some(split) = &t.number_split {
        let [start_w, ellipsis_w, _] = split.widths;
        dc.draw_text(&split.start, x, y);
        dc.draw_text(&split.end, x + start_w.width + ellipsis_w.width, y);
        dc.set_text_color(color.midpoint(config.background_color()));
        dc.draw_text(&split.ellipsis, x + start_w.width, y);
    } else if let Some(alt) = &t.alt_text {
        dc.draw_text(alt, x, y);
    } else if config.change_asterisk() && t.displayed_text == "*" {
        dc.draw_text(CENTER_DOT, x, y);
    } else if t.displayed_text == "#" {
        dc.draw_text("\u{2260}", x, y);
    } else {
        dc.draw_text(&t.displayed_text, x, y);
    }
}

fn text_parts(ws: &Worksheet, id: CellId) -> Option<(&Cell, &TextCell)> {
    let cell = ws.get(id)?;
    let t = cell.as_text()?;
    Some((cell, t))
}

/// Backslash-quote reserved characters in a name that is not itself an
/// operator.
fn quote_name(raw: &str, text: String, chars: &str, short_names_are_operators: bool, keep_paren: bool) -> String {
    let is_operator = if short_names_are_operators && raw.chars().count() <= 1 {
        true
    } else {
        raw.chars().all(|c| c != ' ' && chars.contains(c))
    };
    if is_operator {
        return text;
    }
    let (body, tail) = match text.strip_suffix('(') {
        Some(body) if keep_paren => (body, "("),
        _ => (text.as_str(), ""),
    };
    let mut quoted = String::with_capacity(body.len() + 4);
    for c in body.chars() {
        if chars.contains(c) {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push_str(tail);
    quoted
}

fn plain_text(ws: &Worksheet, id: CellId, config: &Configuration, matlab: bool) -> String {
    let Some((cell, t)) = text_parts(ws, id) else {
        return String::new();
    };
    if cell.hides_mult_sign(config) {
        return String::new();
    }
    let mut text = match &cell.alt_copy_text {
        Some(alt) => alt.clone(),
        None => {
            let text = t.copy_source(config);
            match (matlab, text.as_str()) {
                (true, "%e") => "e".to_string(),
                (true, "%i") => "i".to_string(),
                (true, "%pi") => "pi".to_string(),
                _ => text,
            }
        }
    };
    match cell.style {
        TextStyle::Variable | TextStyle::Function => {
            let chars = if matlab {
                QUOTED_CHARS_MATLAB
            } else {
                QUOTED_CHARS
            };
            text = quote_name(
                &t.text,
                text,
                chars,
                !matlab,
                t.dont_escape_opening_parenthesis,
            );
        }
        TextStyle::String => text = format!("\"{text}\""),
        TextStyle::Label
        | TextStyle::UserLabel
        | TextStyle::MainPrompt
        | TextStyle::OtherPrompt => {
            text.truncate(text.trim_end().len());
            text.push('\t');
        }
        _ => {}
    }
    let next_breaks = cell
        .next
        .and_then(|n| ws.get(n))
        .is_some_and(Cell::break_line_here);
    if next_breaks {
        text.push('\n');
    }
    text
}

pub(crate) fn to_string(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    plain_text(ws, id, config, false)
}

pub(crate) fn to_matlab(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    plain_text(ws, id, config, true)
}

fn replace_umlauts(text: &str, italic: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if UMLAUTS.contains(&c) {
            if italic {
                out.push_str(&format!("\\text{{\\textit{{{c}}}}}"));
            } else {
                out.push_str(&format!("\\text{{{c}}}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub(crate) fn to_tex(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    let Some((cell, t)) = text_parts(ws, id) else {
        return String::new();
    };
    let style = cell.style;
    let mut text = if config.use_user_labels() && !t.user_defined_label.is_empty() {
        format!("({})", t.user_defined_label)
    } else {
        t.displayed_text.clone()
    };
    if !config.keep_percent() {
        match text.as_str() {
            "%e" => text = "e".to_string(),
            "%i" => text = "i".to_string(),
            "%pi" => text = "\u{03C0}".to_string(),
            _ => {}
        }
    }

    let (guard_start, guard_end) = if style.needs_math_mode_guard() {
        ("\\ensuremath{", "}")
    } else {
        ("", " ")
    };
    text = text
        .replace('\\', &format!("{guard_start}\\backslash{guard_end}"))
        .replace('{', "\\{")
        .replace('}', "\\}");
    if !style.needs_math_mode_guard() {
        text = replace_umlauts(&text, false);
    }
    text = symbols::apply_tex_rules(text, guard_start, guard_end);

    if cell.hides_mult_sign(config) {
        text = if text == "*" || text == CENTER_DOT {
            let previous = cell.previous.and_then(|p| ws.get(p));
            let next = cell.next.and_then(|n| ws.get(n));
            let between_long_names = match (previous, next) {
                (Some(prev), Some(next)) => {
                    prev.style == TextStyle::Variable
                        && next.style == TextStyle::Variable
                        && cell
                            .previous
                            .is_some_and(|p| !to_string(ws, p, config).contains('_'))
                        && cell
                            .next
                            .is_some_and(|n| to_string(ws, n, config).chars().count() > 1)
                }
                _ => false,
            };
            if between_long_names {
                "\\, ".to_string()
            } else {
                " ".to_string()
            }
        } else {
            String::new()
        };
    } else if cell.suppress_multiplication_dot {
        text = text.replace('*', "\\, ").replace(CENTER_DOT, "\\, ");
    } else if let Some(prev_id) = cell.previous {
        if text.contains('*') || text.contains(CENTER_DOT) {
            let after_d = ws
                .get(prev_id)
                .is_some_and(|p| p.style == TextStyle::SpecialConstant)
                && super::to_tex(ws, prev_id, config) == "d";
            let times = if after_d { "\\, " } else { "\\cdot " };
            text = text.replace('*', times).replace(CENTER_DOT, times);
        }
    }

    match style {
        TextStyle::GreekConstant => {
            return symbols::greek_tex(&text).map_or(text, str::to_string);
        }
        TextStyle::SpecialConstant => {
            return match text.as_str() {
                "inf" => "\\infty ".to_string(),
                "%e" => "e".to_string(),
                "%i" => "i".to_string(),
                "\\% pi" => "\\ensuremath{\\pi} ".to_string(),
                _ => text,
            };
        }
        TextStyle::Label | TextStyle::UserLabel => {
            let line_break = if cell.previous.is_some() {
                "\\]\n\\["
            } else {
                ""
            };
            let trimmed = text.trim_end();
            let count = trimmed.chars().count();
            let inner: String = trimmed
                .chars()
                .skip(1)
                .take(count.saturating_sub(2))
                .collect();
            text = format!("{line_break}\\tag{{{inner}}}");
        }
        TextStyle::Function => {
            if !text.is_empty() {
                text = format!("\\operatorname{{{text}}}");
            }
        }
        TextStyle::Variable => {
            if t.displayed_text.chars().count() > 1 && text.chars().nth(1) != Some('_') {
                text = format!("\\mathit{{{text}}}");
            }
            if text == "\\% pi" {
                text = "\\ensuremath{\\pi} ".to_string();
            }
            for u in UMLAUTS {
                text = text.replace(
                    &format!("\\text{{{u}}}"),
                    &format!("\\text{{\\textit{{{u}}}}}"),
                );
            }
        }
        TextStyle::Error | TextStyle::Warning => {
            if text.chars().count() > 1 {
                text = format!("\\mbox{{{text}}}");
            }
        }
        TextStyle::Default => {
            if text.chars().count() > 2 && !matches!(text.as_str(), "\\," | "\\, " | "\\cdot ") {
                text = format!("\\mbox{{{text}}}");
            }
        }
        _ => {}
    }

    if !matches!(
        style,
        TextStyle::Function
            | TextStyle::Outdated
            | TextStyle::Variable
            | TextStyle::Number
            | TextStyle::GreekConstant
            | TextStyle::SpecialConstant
    ) {
        text = text.replace('^', "\\textasciicircum");
    }

    if matches!(style, TextStyle::Default | TextStyle::String)
        && text.chars().count() > 1
        && cell.break_line_here()
    {
        text = format!("\\mbox{{}}\\\\{text}");
    }

    if style.is_label() {
        text.push(' ');
    }
    text
}

/// Escaped display text with hidden multiplication signs made invisible.
fn markup_text(cell: &Cell, t: &TextCell, config: &Configuration, use_label: bool) -> String {
    let mut text = if use_label && config.use_user_labels() && !t.user_defined_label.is_empty() {
        xml_escape(&format!("({})", t.user_defined_label))
    } else {
        xml_escape(&t.displayed_text)
    };
    if cell.hides_mult_sign(config) {
        text = text
            .replace('*', INVISIBLE_TIMES)
            .replace(CENTER_DOT, INVISIBLE_TIMES);
        if text != INVISIBLE_TIMES {
            text.clear();
        }
    }
    text.replace('*', CENTER_DOT)
}

pub(crate) fn to_mathml(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    let Some((cell, t)) = text_parts(ws, id) else {
        return String::new();
    };
    if t.displayed_text.is_empty() {
        return String::new();
    }
    let mut text = markup_text(cell, t, config, true);
    let greek = || xml_escape(symbols::greek_unicode(&t.text));

    match cell.style {
        TextStyle::GreekConstant => text = greek(),
        TextStyle::SpecialConstant => {
            text = greek();
            if !config.keep_percent() {
                match text.as_str() {
                    "%e" => text = "e".to_string(),
                    "%i" => text = "i".to_string(),
                    _ => {}
                }
            }
        }
        TextStyle::Variable => {
            text = greek();
            if !config.keep_percent() && text == "%pi" {
                text = "\u{03C0}".to_string();
            }
        }
        TextStyle::Function => {
            text = greek();
            if text == "inf" {
                text = "\u{221E}".to_string();
            }
            return if matches!(text.as_str(), "+" | "-" | "*" | "/") {
                format!("<mo>{text}</mo>\n")
            } else {
                format!("<mi>{text}</mi>\n")
            };
        }
        TextStyle::Number => return format!("<mn>{text}</mn>\n"),
        TextStyle::Label | TextStyle::UserLabel => {
            return format!("<mtext>{text}</mtext></mtd><mtd>\n");
        }
        _ => {
            return if text.starts_with("&quot;") || text.starts_with('"') {
                format!("<ms>{text}</ms>\n")
            } else {
                format!("<mo>{text}</mo>\n")
            };
        }
    }
    format!("<mo>{text}</mo>\n")
}

pub(crate) fn to_omml(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    let Some((cell, t)) = text_parts(ws, id) else {
        return String::new();
    };
    let previous = cell.previous.and_then(|p| ws.get(p));
    if let Some(prev) = previous {
        if prev.style != TextStyle::Label && !prev.force_break_line && cell.force_break_line {
            return String::new();
        }
    }
    if cell.style.is_label() {
        return String::new();
    }
    let mut text = markup_text(cell, t, config, false);
    match cell.style {
        TextStyle::GreekConstant | TextStyle::SpecialConstant | TextStyle::Variable => {
            if !config.keep_percent() {
                match text.as_str() {
                    "%e" if cell.style != TextStyle::Variable => text = "e".to_string(),
                    "%i" if cell.style != TextStyle::Variable => text = "i".to_string(),
                    "%pi" => text = "\u{03C0}".to_string(),
                    _ => {}
                }
            }
        }
        TextStyle::Function => {
            text = xml_escape(symbols::greek_unicode(&t.text));
            if text == "inf" {
                text = "\u{221E}".to_string();
            }
        }
        _ => {}
    }
    format!("<m:r>{text}</m:r>\n")
}

pub(crate) fn to_rtf(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    let Some((cell, t)) = text_parts(ws, id) else {
        return String::new();
    };
    if t.displayed_text.is_empty() {
        return " ".to_string();
    }
    if !cell.style.is_label() {
        return String::new();
    }
    let text = if config.use_user_labels() && !t.user_defined_label.is_empty() {
        format!("({})", t.user_defined_label)
    } else {
        t.displayed_text.clone()
    };
    let text = text.replace(" --> ", "\u{2192}").replace("-->", "\u{2192}");
    format!(
        "\\cf{}{{{}}}\\cf0",
        cell.style.rtf_index(),
        rtf_escape(&text)
    )
}

pub(crate) fn to_xml(ws: &Worksheet, id: CellId, _config: &Configuration) -> String {
    let Some((cell, t)) = text_parts(ws, id) else {
        return String::new();
    };
    let mut flags = String::new();
    let tag = if cell.is_hidden || cell.is_hidable_mult_sign {
        "h"
    } else {
        match cell.style {
            TextStyle::GreekConstant => "g",
            TextStyle::SpecialConstant => "s",
            TextStyle::Variable => "v",
            TextStyle::Function => "fnm",
            TextStyle::Number => "n",
            TextStyle::String => "st",
            TextStyle::Label => "lbl",
            TextStyle::UserLabel => {
                flags.push_str(" userdefined=\"yes\"");
                "lbl"
            }
            _ => "t",
        }
    };
    if cell.force_break_line && !cell.style.is_label() {
        flags.push_str(" breakline=\"true\"");
    }
    if let Some(kind) = cell.style.xml_type() {
        flags.push_str(&format!(" type=\"{kind}\""));
    }
    if !t.user_defined_label.is_empty() {
        flags.push_str(&format!(
            " userdefinedlabel=\"{}\"",
            xml_escape(&t.user_defined_label)
        ));
    }
    if let Some(alt) = &cell.alt_copy_text {
        flags.push_str(&format!(" altCopy=\"{}\"", xml_escape(alt)));
    }
    if let Some(tip) = cell.tool_tip.as_deref().filter(|tip| !tip.is_empty()) {
        flags.push_str(&format!(" tooltip=\"{}\"", xml_escape(tip)));
    }
    format!(
        "<{tag}{flags}>{}</{tag}>",
        xml_escape(&t.displayed_text)
    )
}
