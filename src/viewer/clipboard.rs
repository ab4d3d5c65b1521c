//! Clipboard targets for copies.
//!
//! The view renders what is copied; a [`Clipboard`] decides where it goes.
//! Hosts without a system clipboard use [`MemoryClipboard`].

use crate::types::Size;

/// Destination of copy operations. Each method returns false if the
/// clipboard could not be written.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> bool;

    /// `png` holds an encoded image of `size` pixels.
    fn set_image(&mut self, png: &[u8], size: Size) -> bool;
}

/// What was last put on a [`MemoryClipboard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardContent {
    Text(String),
    Image { png: Vec<u8>, size: Size },
}

/// A clipboard that keeps the last copy in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub content: Option<ClipboardContent>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(ClipboardContent::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> bool {
        self.content = Some(ClipboardContent::Text(text.to_string()));
        true
    }

    fn set_image(&mut self, png: &[u8], size: Size) -> bool {
        self.content = Some(ClipboardContent::Image {
            png: png.to_vec(),
            size,
        });
        true
    }
}

/// The browser clipboard. Only text is supported. Writes complete
/// asynchronously; a rejected write is logged.
#[cfg(target_arch = "wasm32")]
pub struct BrowserClipboard;

#[cfg(target_arch = "wasm32")]
impl Clipboard for BrowserClipboard {
    fn set_text(&mut self, text: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let promise = window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::warn!(error = ?e, "clipboard write rejected");
            }
        });
        true
    }

    fn set_image(&mut self, _png: &[u8], _size: Size) -> bool {
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_keeps_last() {
        let mut clip = MemoryClipboard::new();
        assert!(clip.set_text("a"));
        assert_eq!(clip.text(), Some("a"));
        assert!(clip.set_image(&[1, 2], Size::new(3, 4)));
        assert_eq!(clip.text(), None);
        assert!(matches!(
            clip.content,
            Some(ClipboardContent::Image { size, .. }) if size == Size::new(3, 4)
        ));
    }
}
