//! HTML export: the text of every input/output group with its result
//! rendered to a PNG image.

use std::path::Path;

use base64::Engine;

use super::escape::html_escape;
use crate::cell::{self, Cell};
use crate::config::{Configuration, FontStyle};
use crate::error::{MathviewError, Result};
use crate::render::bitmap::BitmapOut;
use crate::types::{CellId, CellType, TextStyle};
use crate::worksheet::Worksheet;

/// Where result images go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlImages {
    /// `img/<stem><n>.png` next to the page.
    #[default]
    Files,
    /// Base64 `data:` URIs inside the page.
    Inline,
}

/// A result image referenced by the page.
#[derive(Debug, Clone)]
pub struct HtmlImage {
    /// Path relative to the page, e.g. `img/session0.png`.
    pub name: String,
    pub png: Vec<u8>,
}

/// A rendered page and the image files it refers to.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    pub html: String,
    /// Empty for [`HtmlImages::Inline`].
    pub images: Vec<HtmlImage>,
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn css_rule(out: &mut String, selector: &str, color: Option<&str>, style: &FontStyle, underline: bool) {
    line(out, &format!("{selector} {{"));
    if let Some(color) = color.filter(|c| !c.is_empty()) {
        line(out, &format!("  color: {color};"));
    }
    if style.bold {
        line(out, "  font-weight: bold;");
    }
    if style.italic {
        line(out, "  font-style: italic;");
    }
    if underline && style.underlined {
        line(out, "  text-decoration: underline;");
    }
    line(out, "}");
}

fn write_head(out: &mut String, config: &Configuration) {
    let styles = config.styles();
    let input = styles.get(TextStyle::Input);
    let prompt = styles.get(TextStyle::MainPrompt);
    let body = styles.get(TextStyle::Default);

    line(
        out,
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \"http://www.w3.org/TR/html4/loose.dtd\">",
    );
    line(out, "<HTML>");
    line(out, " <HEAD>");
    line(out, "  <TITLE>mathview HTML export</TITLE>");
    line(out, "  <META NAME=\"generator\" CONTENT=\"mathview\">");
    line(
        out,
        "  <META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=utf-8\">",
    );
    line(out, "  <STYLE TYPE=\"text/css\">");
    line(out, "body {");
    if !styles.font_name.is_empty() {
        line(out, &format!("  font-family: {};", styles.font_name));
    }
    if !body.color.is_empty() {
        line(out, &format!("  color: {};", body.color));
    }
    line(out, "}");
    css_rule(out, ".input", Some(input.color.as_str()), &input, false);
    css_rule(out, ".prompt", Some(prompt.color.as_str()), &prompt, false);
    // Folded prompts keep the prompt color with the hidden-text font.
    css_rule(out, ".hidden", Some(prompt.color.as_str()), &styles.hidden, true);
    line(out, "  </STYLE>");
    line(out, " </HEAD>");
    line(out, " <BODY>");
}

fn plain(ws: &Worksheet, id: CellId, config: &Configuration) -> String {
    html_escape(cell::to_string(ws, id, config).trim_end())
}

fn type_of(ws: &Worksheet, id: Option<CellId>) -> Option<CellType> {
    id.and_then(|i| ws.get(i)).map(Cell::cell_type)
}

fn draw_next(ws: &Worksheet, id: CellId) -> Option<CellId> {
    ws.get(id).and_then(Cell::draw_next)
}

/// An input line with its leading spaces kept as `&nbsp;`.
fn input_line(text: &str) -> String {
    let trimmed = text.trim_start_matches(' ');
    let indent = text.len() - trimmed.len();
    format!("{}{}", "&nbsp;".repeat(indent), html_escape(trimmed.trim_end()))
}

/// Render `start..=end` in draw order to PNG bytes.
fn render_run(ws: &Worksheet, start: CellId, end: CellId, config: &Configuration) -> Result<Vec<u8>> {
    let mut bitmap = BitmapOut::new(1);
    if !bitmap.set_data(ws.copy_selection(start, end), config, None) {
        return Err(MathviewError::Export(format!("nothing to render for {start}..{end}")));
    }
    bitmap.to_png()
}

/// Build the page for `ws`. Image names use `stem` followed by a counter.
pub fn render_html(
    ws: &Worksheet,
    config: &Configuration,
    stem: &str,
    images: HtmlImages,
) -> Result<HtmlDocument> {
    let mut doc = HtmlDocument::default();
    let out = &mut doc.html;
    write_head(out, config);

    let mut tmp = ws.first();
    if tmp.is_some() && type_of(ws, tmp) != Some(CellType::MainPrompt) {
        line(out, "");
        line(out, " <P>");
        while let Some(id) = tmp.filter(|&i| type_of(ws, Some(i)) != Some(CellType::MainPrompt)) {
            line(out, &format!("   {}", plain(ws, id, config)));
            line(out, "   <BR/>");
            tmp = draw_next(ws, id);
        }
        line(out, " </P>");
    }
    line(out, "");

    let mut count = 0usize;
    while let Some(prompt) = tmp {
        line(out, "<!-- Input/output group -->");
        line(out, "");
        line(out, " <P>");
        let folded = ws.get(prompt).is_some_and(|c| !c.draw_next_is_next());
        line(
            out,
            if folded {
                "  <SPAN CLASS=\"hidden\">"
            } else {
                "  <SPAN CLASS=\"prompt\">"
            },
        );
        line(out, &format!("  {}", plain(ws, prompt, config)));
        line(out, "  </SPAN>");
        tmp = draw_next(ws, prompt);

        line(out, "  <SPAN CLASS=\"input\">");
        while let Some(id) = tmp.filter(|&i| type_of(ws, Some(i)) == Some(CellType::Input)) {
            let text = cell::to_string(ws, id, config);
            line(out, &format!("   {}", input_line(&text)));
            line(out, "   <BR>");
            tmp = draw_next(ws, id);
        }
        line(out, "  </SPAN>");

        // Commands terminated with `$` have no output.
        if type_of(ws, tmp) == Some(CellType::MainPrompt) {
            line(out, " </P>");
            line(out, "");
            continue;
        }

        if let Some(start) = tmp {
            let mut end = start;
            while let Some(next) = draw_next(ws, end)
                .filter(|&n| type_of(ws, Some(n)) != Some(CellType::MainPrompt))
            {
                end = next;
            }
            let png = render_run(ws, start, end, config)?;
            let name = format!("img/{stem}{count}.png");
            let src = match images {
                HtmlImages::Files => name.clone(),
                HtmlImages::Inline => format!(
                    "data:image/png;base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(&png)
                ),
            };
            if images == HtmlImages::Files {
                doc.images.push(HtmlImage { name, png });
            }
            line(out, "  <BR>");
            line(out, &format!("  <IMG ALT=\"Result\" SRC=\"{src}\">"));
            count += 1;
            tmp = draw_next(ws, end);
        }
        line(out, " </P>");
        line(out, "");
    }

    line(out, " <HR>");
    line(
        out,
        " <SMALL> Created with mathview.</SMALL>",
    );
    line(out, "");
    line(out, " </BODY>");
    line(out, "</HTML>");
    tracing::debug!(groups = count, "rendered html");
    Ok(doc)
}

/// Write the page to `path` and its images under `img/` next to it.
pub fn write_html(
    ws: &Worksheet,
    config: &Configuration,
    path: &Path,
    images: HtmlImages,
) -> Result<()> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let doc = render_html(ws, config, &stem, images)?;
    if !doc.images.is_empty() {
        std::fs::create_dir_all(dir.join("img"))?;
    }
    for image in &doc.images {
        std::fs::write(dir.join(&image.name), &image.png)?;
    }
    std::fs::write(path, doc.html)?;
    Ok(())
}

/// Export to an HTML file. Returns false if any file could not be written.
pub fn export_html(ws: &Worksheet, config: &Configuration, path: &Path, images: HtmlImages) -> bool {
    match write_html(ws, config, path, images) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "html export failed");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn session() -> Worksheet {
        let mut ws = Worksheet::new();
        ws.append(Cell::text("Maxima 5 <header>", TextStyle::Default));
        ws.append(Cell::text("(%i1) ", TextStyle::MainPrompt));
        ws.append(Cell::text("  x+1;", TextStyle::Input));
        ws.append(Cell::text("(%o1) ", TextStyle::Label));
        ws.append(Cell::text("x", TextStyle::Variable));
        ws.append(Cell::text("(%i2) ", TextStyle::MainPrompt));
        ws.append(Cell::text("y:2$", TextStyle::Input));
        ws
    }

    #[test]
    fn test_page_structure() {
        let doc = render_html(&session(), &Configuration::default(), "s", HtmlImages::Files).unwrap();
        let html = &doc.html;
        assert!(html.starts_with("<!DOCTYPE HTML PUBLIC"));
        assert!(html.contains("   Maxima 5 &lt;header&gt;\n   <BR/>"));
        assert_eq!(html.matches("<!-- Input/output group -->").count(), 2);
        assert!(html.contains("   &nbsp;&nbsp;x+1;\n"));
        assert!(html.contains("<IMG ALT=\"Result\" SRC=\"img/s0.png\">"));
        assert!(!html.contains("s1.png"));
        assert!(html.trim_end().ends_with("</HTML>"));
        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.images[0].name, "img/s0.png");
        assert!(doc.images[0].png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_styles_follow_configuration() {
        let html = render_html(&session(), &Configuration::default(), "s", HtmlImages::Files)
            .unwrap()
            .html;
        assert!(html.contains(".input {\n  color: #0000FF;\n}"));
        assert!(html.contains("font-family: monospace;"));
        assert!(html.contains(".hidden {\n  color: #FF8080;\n  text-decoration: underline;\n}"));
    }

    #[test]
    fn test_folded_prompt_uses_hidden_class() {
        let mut ws = session();
        let prompt = ws.logical().nth(1).unwrap();
        ws.toggle_fold(prompt);
        let html = render_html(&ws, &Configuration::default(), "s", HtmlImages::Files)
            .unwrap()
            .html;
        assert!(html.contains("<SPAN CLASS=\"hidden\">"));
    }

    #[test]
    fn test_inline_images() {
        let doc = render_html(&session(), &Configuration::default(), "s", HtmlImages::Inline).unwrap();
        assert!(doc.images.is_empty());
        assert!(doc.html.contains("SRC=\"data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_export_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.html");
        assert!(export_html(&session(), &Configuration::default(), &path, HtmlImages::Files));
        assert!(path.exists());
        assert!(dir.path().join("img").join("session0.png").exists());
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("page.html");
        assert!(!export_html(&session(), &Configuration::default(), &path, HtmlImages::Inline));
    }
}
