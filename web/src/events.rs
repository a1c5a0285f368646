//! Listener bookkeeping for the demo canvas.
//!
//! Control listeners are registered in the capture phase so they run ahead
//! of demo-level listeners on the same canvas; a recognized control hit
//! stops the event there. `unbind` removes everything it added and is
//! idempotent, so demo teardown can call it unconditionally.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, HtmlCanvasElement, MouseEvent, PointerEvent};

type PointerClosure = Closure<dyn FnMut(PointerEvent)>;

pub struct Bindings {
    target: HtmlCanvasElement,
    pointer: Vec<(&'static str, bool, PointerClosure)>,
    context_menu: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl Bindings {
    pub fn new(target: HtmlCanvasElement) -> Self {
        Self {
            target,
            pointer: Vec::new(),
            context_menu: None,
        }
    }

    /// Register a pointer listener; `capture` selects the capture phase.
    pub fn on_pointer(
        &mut self,
        event: &'static str,
        capture: bool,
        handler: impl FnMut(PointerEvent) + 'static,
    ) -> Result<(), JsValue> {
        let closure = PointerClosure::wrap(Box::new(handler));
        let opts = AddEventListenerOptions::new();
        opts.set_capture(capture);
        self.target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &opts,
            )?;
        self.pointer.push((event, capture, closure));
        Ok(())
    }

    /// Keep the native context menu from interrupting secondary-button
    /// drags.
    pub fn suppress_context_menu(&mut self) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(|ev: MouseEvent| {
            ev.prevent_default();
        }));
        self.target
            .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())?;
        self.context_menu = Some(closure);
        Ok(())
    }

    /// Remove every registered listener. Safe to call more than once.
    pub fn unbind(&mut self) {
        for (event, capture, closure) in self.pointer.drain(..) {
            let _ = self.target.remove_event_listener_with_callback_and_bool(
                event,
                closure.as_ref().unchecked_ref(),
                capture,
            );
        }
        if let Some(closure) = self.context_menu.take() {
            let _ = self
                .target
                .remove_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Bindings {
    fn drop(&mut self) {
        self.unbind();
    }
}
