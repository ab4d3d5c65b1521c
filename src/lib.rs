//! mathview - worksheet view for computer-algebra output
//!
//! Lays out and renders a worksheet of prompts, input and formatted output
//! cells, on an HTML canvas via WebAssembly or offscreen to PNG:
//! - Width/height measurement, line breaking and placement
//! - Folding of output groups, click and drag selection, group deletion
//! - Export to plain text, Matlab, TeX, MathML, OMML, RTF, worksheet XML
//!   and HTML with result images
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { MathView } from 'mathview';
//! await init();
//! const view = new MathView(canvas, { fontSize: 12 });
//! view.loadXml(xml);
//! view.render();
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod render;
pub mod selection;
pub mod types;
pub mod viewer;
pub mod worksheet;

use wasm_bindgen::prelude::*;

pub use cell::Cell;
pub use config::Configuration;
pub use error::{MathviewError, Result};
pub use export::Format;
#[cfg(target_arch = "wasm32")]
pub use viewer::MathView;
pub use viewer::WorksheetView;
pub use worksheet::Worksheet;

pub use types::*;

/// Convert worksheet XML to another text format without a view.
///
/// # Errors
/// Returns an error if the XML is not a worksheet or the format is unknown.
#[wasm_bindgen(js_name = "convertXml")]
pub fn convert_xml(xml: &str, format: &str) -> std::result::Result<String, JsValue> {
    let ws = export::parse_worksheet_xml(xml).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let format: Format = format.parse().map_err(|e: MathviewError| JsValue::from_str(&e.to_string()))?;
    Ok(export::export_worksheet(&ws, format, &Configuration::default()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
