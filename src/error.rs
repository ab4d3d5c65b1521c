//! Structured error types for mathview.
//!
//! Internal operations return [`Result`]; the UI-facing surface of
//! [`crate::viewer::WorksheetView`] turns these into the boolean and
//! sentinel-size results a host expects.

/// All errors that can occur while reading, laying out or exporting a worksheet.
#[derive(Debug, thiserror::Error)]
pub enum MathviewError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// PNG encoding error.
    #[error("PNG encoding: {0}")]
    Png(#[from] png::EncodingError),

    /// Configuration (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed worksheet content.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An export could not be produced.
    #[error("Export failed: {0}")]
    Export(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MathviewError>;

impl From<String> for MathviewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for MathviewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for MathviewError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(quick_xml::Error::InvalidAttr(e))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<MathviewError> for wasm_bindgen::JsValue {
    fn from(e: MathviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
