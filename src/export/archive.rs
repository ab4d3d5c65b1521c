//! Session archive: a zip holding the worksheet XML and the rendered
//! result images.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use super::html::{render_html, HtmlImages};
use super::xml::{parse_worksheet_xml, write_worksheet_xml};
use crate::config::Configuration;
use crate::error::Result;
use crate::worksheet::Worksheet;

/// Entry holding the worksheet XML.
pub const CONTENT_ENTRY: &str = "content.xml";

const IMAGE_STEM: &str = "result";

/// Pack `ws` into zip bytes: `content.xml` plus `img/result<n>.png` for
/// every input/output group with output.
pub fn write_archive(ws: &Worksheet, config: &Configuration) -> Result<Vec<u8>> {
    let xml = write_worksheet_xml(ws, config);
    let images = render_html(ws, config, IMAGE_STEM, HtmlImages::Files)?.images;

    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(xml.len())));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    writer.start_file(CONTENT_ENTRY, options)?;
    writer.write_all(xml.as_bytes())?;

    // PNG data is already compressed.
    let stored = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for image in &images {
        writer.start_file(image.name.as_str(), stored)?;
        writer.write_all(&image.png)?;
    }

    let cursor = writer.finish()?;
    tracing::debug!(images = images.len(), "wrote session archive");
    Ok(cursor.into_inner())
}

/// Restore the worksheet from archive bytes. Images are not read back;
/// they are regenerated from the cells.
pub fn read_archive(data: &[u8]) -> Result<Worksheet> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut entry = archive.by_name(CONTENT_ENTRY)?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    parse_worksheet_xml(&xml)
}

/// Names of the entries in an archive.
pub fn archive_entries(data: &[u8]) -> Result<Vec<String>> {
    let archive = ZipArchive::new(Cursor::new(data))?;
    Ok(archive.file_names().map(str::to_string).collect())
}

/// Write the archive to `path`. Returns false on failure.
pub fn save_archive(ws: &Worksheet, config: &Configuration, path: &Path) -> bool {
    let result = write_archive(ws, config).and_then(|bytes| Ok(std::fs::write(path, bytes)?));
    if let Err(e) = &result {
        tracing::warn!(path = %path.display(), error = %e, "saving archive failed");
    }
    result.is_ok()
}

pub fn load_archive(path: &Path) -> Result<Worksheet> {
    read_archive(&std::fs::read(path)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::types::TextStyle;

    fn session() -> Worksheet {
        let mut ws = Worksheet::new();
        ws.append(Cell::text("(%i1) ", TextStyle::MainPrompt));
        ws.append(Cell::text("x^2;", TextStyle::Input));
        ws.append(Cell::text("(%o1) ", TextStyle::Label));
        ws.append(Cell::text("x", TextStyle::Variable));
        ws
    }

    #[test]
    fn test_archive_contents() {
        let bytes = write_archive(&session(), &Configuration::default()).unwrap();
        let entries = archive_entries(&bytes).unwrap();
        assert!(entries.contains(&"content.xml".to_string()));
        assert!(entries.contains(&"img/result0.png".to_string()));
    }

    #[test]
    fn test_archive_restores_worksheet() {
        let config = Configuration::default();
        let ws = session();
        let back = read_archive(&write_archive(&ws, &config).unwrap()).unwrap();
        assert_eq!(write_worksheet_xml(&back, &config), write_worksheet_xml(&ws, &config));
    }

    #[test]
    fn test_not_an_archive() {
        assert!(read_archive(b"plain text").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.zip");
        assert!(save_archive(&session(), &Configuration::default(), &path));
        assert_eq!(load_archive(&path).unwrap().logical().count(), 4);
        assert!(!save_archive(&session(), &Configuration::default(), &dir.path().join("no/such.zip")));
    }
}
