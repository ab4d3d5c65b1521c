//! JavaScript entry point: a [`WorksheetView`] on an HTML canvas.
//!
//! Mouse listeners go on the canvas, the key listener on the document.
//! Auto-scroll timers are scheduled with `setTimeout` whenever the view
//! asks for one.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

use super::clipboard::BrowserClipboard;
use super::scroll::TimerRequest;
use super::WorksheetView;
use crate::config::Configuration;
use crate::export::{self, Format, HtmlImages};

pub(crate) struct SharedState {
    view: WorksheetView,
    surface: crate::render::CanvasContext,
    timer: Option<i32>,
    timer_closure: Option<Closure<dyn FnMut()>>,
}

impl SharedState {
    fn render(&mut self) {
        if !self.view.take_needs_render() {
            return;
        }
        let vp = *self.view.viewport();
        self.surface.set_view(vp.scroll, Some(vp.visible_rect()));
        self.view.paint(&mut self.surface);
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn event_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (i32, i32) {
    let rect = canvas.get_bounding_client_rect();
    let x = f64::from(event.client_x()) - rect.left();
    let y = f64::from(event.client_y()) - rect.top();
    (x.round() as i32, y.round() as i32)
}

fn schedule(state: &Rc<RefCell<SharedState>>, request: Option<TimerRequest>) {
    let Some(request) = request else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    if let Some(id) = s.timer.take() {
        window.clear_timeout_with_handle(id);
    }
    let Some(callback) = s.timer_closure.as_ref() else {
        return;
    };
    let delay = i32::try_from(request.delay_ms).unwrap_or(i32::MAX);
    s.timer = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay)
        .ok();
}

/// The worksheet viewer exported to JavaScript.
#[wasm_bindgen]
pub struct MathView {
    state: Rc<RefCell<SharedState>>,
    #[allow(dead_code)]
    closures: Vec<Closure<dyn FnMut(MouseEvent)>>,
    #[allow(dead_code)]
    key_closure: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

#[wasm_bindgen]
impl MathView {
    /// Create a viewer drawing on `canvas`. `config` is a configuration
    /// object; anything that does not deserialize gives the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: JsValue) -> Result<MathView, JsValue> {
        console_error_panic_hook::set_once();

        let config: Configuration = if config.is_undefined() || config.is_null() {
            Configuration::default()
        } else {
            serde_wasm_bindgen::from_value(config).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "invalid configuration, using defaults");
                Configuration::default()
            })
        };

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let width = i32::try_from(canvas.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(canvas.height()).unwrap_or(i32::MAX);

        let state = Rc::new(RefCell::new(SharedState {
            view: WorksheetView::new(width, height, config),
            surface: crate::render::CanvasContext::new(ctx),
            timer: None,
            timer_closure: None,
        }));

        // Auto-scroll tick
        {
            let weak = Rc::downgrade(&state);
            let closure = Closure::wrap(Box::new(move || {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                let next = {
                    let mut s = state.borrow_mut();
                    s.timer = None;
                    let next = s.view.on_timer();
                    s.render();
                    next
                };
                schedule(&state, next);
            }) as Box<dyn FnMut()>);
            state.borrow_mut().timer_closure = Some(closure);
        }

        let mut closures: Vec<Closure<dyn FnMut(MouseEvent)>> = Vec::new();

        // Mouse down
        {
            let state = Rc::clone(&state);
            let target = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let (x, y) = event_point(&target, &event);
                state.borrow_mut().view.on_mouse_left_down(x, y);
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())
                .ok();
            closures.push(closure);
        }

        // Mouse up
        {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                let mut s = state.borrow_mut();
                s.view.on_mouse_left_up();
                s.render();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())
                .ok();
            closures.push(closure);
        }

        // Mouse move (drag selection)
        {
            let state = Rc::clone(&state);
            let target = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let (x, y) = event_point(&target, &event);
                let mut s = state.borrow_mut();
                s.view.on_mouse_motion(x, y);
                s.render();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
                .ok();
            closures.push(closure);
        }

        // Mouse leave starts auto-scroll during a drag
        {
            let state = Rc::clone(&state);
            let target = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let (x, y) = event_point(&target, &event);
                let request = state.borrow_mut().view.on_mouse_exit(x, y);
                schedule(&state, request);
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())
                .ok();
            closures.push(closure);
        }

        // Mouse enter
        {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                state.borrow_mut().view.on_mouse_enter();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref())
                .ok();
            closures.push(closure);
        }

        // Keyboard handler on document for Ctrl+C and Delete
        let key_closure = {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                let ctrl = event.ctrl_key() || event.meta_key();
                let mut s = state.borrow_mut();
                if s.view.on_key_up(&event.key(), ctrl, &mut BrowserClipboard) {
                    event.prevent_default();
                    s.render();
                }
            }) as Box<dyn FnMut(KeyboardEvent)>);

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                document
                    .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())
                    .ok();
            }
            Some(closure)
        };

        state.borrow_mut().render();
        Ok(MathView {
            state,
            closures,
            key_closure,
        })
    }

    /// Replace the document with worksheet XML.
    #[wasm_bindgen(js_name = "loadXml")]
    pub fn load_xml(&self, xml: &str) -> Result<(), JsValue> {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.view.load_xml(xml, &s.surface).map_err(js_err)?;
        s.render();
        Ok(())
    }

    /// Append worksheet XML as a new output line.
    #[wasm_bindgen(js_name = "addXml")]
    pub fn add_xml(&self, xml: &str, force_new_line: bool) -> Result<(), JsValue> {
        let other = export::parse_worksheet_xml(xml).map_err(js_err)?;
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.view.append_worksheet(&other, force_new_line, &s.surface);
        s.render();
        Ok(())
    }

    /// Repaint if anything changed since the last paint.
    pub fn render(&self) {
        self.state.borrow_mut().render();
    }

    /// The canvas was resized to `width` x `height` pixels.
    pub fn resize(&self, width: u32, height: u32) {
        let mut s = self.state.borrow_mut();
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        s.view.resize(width, height);
        s.render();
    }

    /// Scroll to a position in scroll units.
    #[wasm_bindgen(js_name = "scrollTo")]
    pub fn scroll_to(&self, x: i32, y: i32) {
        let mut s = self.state.borrow_mut();
        s.view.scroll_to_units(x, y);
        s.render();
    }

    pub fn clear(&self) {
        let mut s = self.state.borrow_mut();
        s.view.clear();
        s.render();
    }

    /// Plain text of the selection.
    #[wasm_bindgen(js_name = "copyText")]
    pub fn copy_text(&self) -> String {
        self.state.borrow().view.selection_string()
    }

    /// The whole document in one of the text formats: text, matlab, tex,
    /// mathml, omml, rtf or xml.
    pub fn export(&self, format: &str) -> Result<String, JsValue> {
        let format: Format = format.parse().map_err(js_err)?;
        Ok(self.state.borrow().view.export(format))
    }

    #[wasm_bindgen(js_name = "exportXml")]
    pub fn export_xml(&self) -> String {
        self.state.borrow().view.export(Format::Xml)
    }

    /// An HTML page with result images inlined as data URIs.
    pub fn html(&self) -> Result<String, JsValue> {
        let s = self.state.borrow();
        let doc = export::render_html(s.view.worksheet(), s.view.config(), "mathview", HtmlImages::Inline)
            .map_err(js_err)?;
        Ok(doc.html)
    }

    /// The selection as PNG bytes at `scale`, or `undefined` without a
    /// selection.
    #[wasm_bindgen(js_name = "selectionPng")]
    pub fn selection_png(&self, scale: i32) -> Result<Option<js_sys::Uint8Array>, JsValue> {
        let s = self.state.borrow();
        let Some(bitmap) = s.view.selection_bitmap(scale.max(1), None) else {
            return Ok(None);
        };
        let png = bitmap.to_png().map_err(js_err)?;
        Ok(Some(js_sys::Uint8Array::from(png.as_slice())))
    }

    /// Client size, virtual size and scroll position in pixels.
    pub fn viewport(&self) -> JsValue {
        let s = self.state.borrow();
        let vp = s.view.viewport();
        let obj = js_sys::Object::new();
        let fields = [
            ("client_width", vp.client.width),
            ("client_height", vp.client.height),
            ("virtual_width", vp.virtual_size.width),
            ("virtual_height", vp.virtual_size.height),
            ("scroll_x", vp.scroll.x),
            ("scroll_y", vp.scroll.y),
        ];
        for (key, value) in fields {
            let _ = js_sys::Reflect::set(&obj, &key.into(), &value.into());
        }
        obj.into()
    }

    #[wasm_bindgen(js_name = "canDelete")]
    pub fn can_delete(&self) -> bool {
        self.state.borrow().view.can_delete()
    }

    #[wasm_bindgen(js_name = "deleteSelection")]
    pub fn delete_selection(&self) -> bool {
        let mut s = self.state.borrow_mut();
        let deleted = s.view.delete_selection();
        s.render();
        deleted
    }
}

impl Drop for MathView {
    fn drop(&mut self) {
        let timer = self.state.borrow_mut().timer.take();
        if let (Some(id), Some(window)) = (timer, web_sys::window()) {
            window.clear_timeout_with_handle(id);
        }
    }
}
