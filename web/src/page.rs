//! One activated demo: canvas, side panel, gestures, and the frame loop.
//!
//! [`DemoPage`] wires everything together at activation time and takes it
//! all apart again in [`DemoPage::teardown`]. Pointer listeners come in two
//! layers on the same canvas: the control layer in the capture phase, which
//! consumes events aimed at on-canvas controls, and the gesture layer in
//! the bubble phase, which only ever sees what the controls let through.
//!
//! Store mutations are projected to the side panel through a queue. The
//! [`agg_gallery::WidgetSink`] installed in the store only records the
//! change; the queue is drained after the originating handler has released
//! its store borrow, because projecting means dispatching a native input
//! event whose listener re-enters the store.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use agg_gallery::coords::{BUTTONS_PRIMARY, BUTTON_PRIMARY};
use agg_gallery::{
    chrome, map_pointer, CanvasGeometry, Engine, Interaction, ParamStore, Point, RenderBridge,
    RenderError, RenderStatus, RotateScale, Value, VertexDragger, WidgetId, WidgetSink, YAxis,
};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlCanvasElement, HtmlInputElement,
    PointerEvent,
};

use crate::canvas;
use crate::demos::{self, Demo, Gesture, PanelKind};
use crate::engine::JsEngine;
use crate::events::Bindings;
use crate::native::SidePanel;

type ChangeQueue = Rc<RefCell<Vec<(WidgetId, Value)>>>;

/// Records accepted store mutations for deferred projection.
struct QueueSink {
    queue: ChangeQueue,
}

impl WidgetSink for QueueSink {
    fn widget_changed(&mut self, id: WidgetId, value: Value) {
        self.queue.borrow_mut().push((id, value));
    }
}

struct Inner {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    status_line: Option<Element>,

    store: RefCell<ParamStore>,
    demo: RefCell<Demo>,
    panel: RefCell<SidePanel>,
    queue: ChangeQueue,
    draining: Cell<bool>,

    interaction: RefCell<Interaction>,
    vertex: RefCell<Option<VertexDragger>>,
    rotate: RotateScale,

    bridge: RefCell<RenderBridge>,
    engine: RefCell<JsEngine>,

    bindings: RefCell<Bindings>,
    inputs: RefCell<Vec<(HtmlInputElement, &'static str, Closure<dyn FnMut(Event)>)>>,

    raf: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    raf_handle: Cell<Option<i32>>,
    running: Cell<bool>,
    last_frame: Cell<Option<f64>>,
}

/// An activated demo. Construct on navigation to a demo, call
/// [`DemoPage::teardown`] on navigation away.
#[wasm_bindgen]
pub struct DemoPage {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl DemoPage {
    /// Wire up the named demo on `canvas`. `render` is the rendering
    /// module's frame entry point; `pick_vertex` and `screen_to_shape` are
    /// optional engine exports for demos with engine-owned geometry.
    #[wasm_bindgen(constructor)]
    pub fn new(
        name: &str,
        canvas: HtmlCanvasElement,
        render: js_sys::Function,
        pick_vertex: Option<js_sys::Function>,
        screen_to_shape: Option<js_sys::Function>,
        status_line: Option<Element>,
    ) -> Result<DemoPage, JsValue> {
        let mut store = ParamStore::new();
        let demo = demos::build(name, &mut store)
            .ok_or_else(|| JsValue::from_str(&format!("unknown demo: {name}")))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let mut panel = SidePanel::new();
        bind_panel(&document, &demo, &mut panel);

        let queue: ChangeQueue = Rc::new(RefCell::new(Vec::new()));
        store.set_sink(Box::new(QueueSink {
            queue: queue.clone(),
        }));
        // First frame always paints.
        store.request_redraw();

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|o| o.dyn_into::<CanvasRenderingContext2d>().ok());

        let vertex = match demo.gesture {
            Gesture::VertexDrag {
                threshold,
                drag_all,
            } => Some(VertexDragger::new(threshold).drag_all(drag_all)),
            _ => None,
        };
        let rotate =
            RotateScale::new().with_secondary(matches!(demo.gesture, Gesture::RotateScale { .. }));

        let inner = Rc::new(Inner {
            bindings: RefCell::new(Bindings::new(canvas.clone())),
            canvas,
            ctx,
            status_line,
            store: RefCell::new(store),
            demo: RefCell::new(demo),
            panel: RefCell::new(panel),
            queue,
            draining: Cell::new(false),
            interaction: RefCell::new(Interaction::new()),
            vertex: RefCell::new(vertex),
            rotate,
            // The rendering engine draws with a bottom-left origin; frames
            // are row-flipped before blitting.
            bridge: RefCell::new(RenderBridge::new(YAxis::Up)),
            engine: RefCell::new(JsEngine::new(render, pick_vertex, screen_to_shape)),
            inputs: RefCell::new(Vec::new()),
            raf: RefCell::new(None),
            raf_handle: Cell::new(None),
            running: Cell::new(true),
            last_frame: Cell::new(None),
        });

        bind_canvas(&inner)?;
        bind_inputs(&document, &inner);
        start_frame_loop(&inner);

        Ok(DemoPage { inner })
    }

    /// Unbind every listener and stop the frame loop. Idempotent.
    pub fn teardown(&self) {
        let inner = &self.inner;
        inner.running.set(false);
        if let Some(handle) = inner.raf_handle.take() {
            if let Some(win) = web_sys::window() {
                let _ = win.cancel_animation_frame(handle);
            }
        }
        *inner.raf.borrow_mut() = None;
        inner.bindings.borrow_mut().unbind();
        for (input, event, closure) in inner.inputs.borrow_mut().drain(..) {
            let _ = input
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        inner.interaction.borrow_mut().reset();
        if let Some(v) = inner.vertex.borrow_mut().as_mut() {
            v.reset();
        }
    }
}

// ============================================================================
// Panel wiring
// ============================================================================

fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
    let found = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
    if found.is_none() {
        warn!(id, "side panel input not found, widget stays canvas-only");
    }
    found
}

fn bind_panel(document: &Document, demo: &Demo, panel: &mut SidePanel) {
    for binding in &demo.panel {
        match &binding.kind {
            PanelKind::Number(id) => {
                if let Some(input) = input_by_id(document, id) {
                    panel.bind_number(binding.widget, input);
                }
            }
            PanelKind::Flag(id) => {
                if let Some(input) = input_by_id(document, id) {
                    panel.bind_flag(binding.widget, input);
                }
            }
            PanelKind::Choice(ids) => {
                let inputs: Vec<_> = ids
                    .iter()
                    .filter_map(|id| input_by_id(document, id))
                    .collect();
                if inputs.len() == ids.len() {
                    panel.bind_choice(binding.widget, inputs);
                }
            }
        }
    }
}

/// Attach listeners to the native inputs so edits on the panel side flow
/// into the store. The projection in the other direction dispatches these
/// same events; the store's unchanged-value short circuit ends that echo.
fn bind_inputs(document: &Document, inner: &Rc<Inner>) {
    let demo = inner.demo.borrow();
    for binding in &demo.panel {
        let widget = binding.widget;
        match &binding.kind {
            PanelKind::Number(id) => {
                if let Some(input) = input_by_id(document, id) {
                    let weak = Rc::downgrade(inner);
                    let target = input.clone();
                    on_input(inner, input, "input", move |_| {
                        let Some(inner) = weak.upgrade() else { return };
                        if let Ok(v) = target.value().parse::<f64>() {
                            inner.store.borrow_mut().set_number(widget, v);
                        }
                        drain_queue(&inner);
                    });
                }
            }
            PanelKind::Flag(id) => {
                if let Some(input) = input_by_id(document, id) {
                    let weak = Rc::downgrade(inner);
                    let target = input.clone();
                    on_input(inner, input, "change", move |_| {
                        let Some(inner) = weak.upgrade() else { return };
                        inner.store.borrow_mut().set_flag(widget, target.checked());
                        drain_queue(&inner);
                    });
                }
            }
            PanelKind::Choice(ids) => {
                for (i, id) in ids.iter().enumerate() {
                    if let Some(input) = input_by_id(document, id) {
                        let weak = Rc::downgrade(inner);
                        let target = input.clone();
                        on_input(inner, input, "change", move |_| {
                            let Some(inner) = weak.upgrade() else { return };
                            if target.checked() {
                                inner.store.borrow_mut().set_choice(widget, i);
                            }
                            drain_queue(&inner);
                        });
                    }
                }
            }
        }
    }
}

fn on_input(
    inner: &Rc<Inner>,
    input: HtmlInputElement,
    event: &'static str,
    handler: impl FnMut(Event) + 'static,
) {
    let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
    if input
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_ok()
    {
        inner.inputs.borrow_mut().push((input, event, closure));
    }
}

// ============================================================================
// Projection queue
// ============================================================================

/// Project queued store changes into the side panel. Dispatching a native
/// event runs its listeners synchronously, and those listeners write back
/// into the store and call back in here; the guard collapses the recursion
/// and the outer drain picks up anything they queued.
fn drain_queue(inner: &Inner) {
    if inner.draining.get() {
        return;
    }
    inner.draining.set(true);
    loop {
        let batch: Vec<_> = inner.queue.borrow_mut().drain(..).collect();
        if batch.is_empty() {
            break;
        }
        let mut panel = inner.panel.borrow_mut();
        for (id, value) in batch {
            panel.widget_changed(id, value);
        }
    }
    inner.draining.set(false);
}

// ============================================================================
// Pointer layers
// ============================================================================

fn geometry(inner: &Inner, demo: &Demo) -> CanvasGeometry {
    let rect = inner.canvas.get_bounding_client_rect();
    let (bw, bh) = (demo.width as f64, demo.height as f64);
    if rect.width() > 0.0 && rect.height() > 0.0 {
        CanvasGeometry {
            buffer_width: bw,
            buffer_height: bh,
            display_width: rect.width(),
            display_height: rect.height(),
        }
    } else {
        // Detached or display:none canvas; treat as unscaled.
        CanvasGeometry::unscaled(bw, bh)
    }
}

fn bind_canvas(inner: &Rc<Inner>) -> Result<(), JsValue> {
    let mut bindings = inner.bindings.borrow_mut();

    // Control layer, capture phase. Runs ahead of the gesture layer and
    // stops recognized events there.
    let weak = Rc::downgrade(inner);
    bindings.on_pointer("pointerdown", true, move |ev| {
        if let Some(inner) = weak.upgrade() {
            control_down(&inner, &ev);
        }
    })?;
    let weak = Rc::downgrade(inner);
    bindings.on_pointer("pointermove", true, move |ev| {
        if let Some(inner) = weak.upgrade() {
            control_move(&inner, &ev);
        }
    })?;
    let weak = Rc::downgrade(inner);
    bindings.on_pointer("pointerup", true, move |ev| {
        if let Some(inner) = weak.upgrade() {
            control_up(&inner, &ev);
        }
    })?;
    let weak = Rc::downgrade(inner);
    bindings.on_pointer("pointercancel", true, move |ev| {
        if let Some(inner) = weak.upgrade() {
            control_up(&inner, &ev);
        }
    })?;

    // Gesture layer, bubble phase.
    let weak = Rc::downgrade(inner);
    bindings.on_pointer("pointerdown", false, move |ev| {
        if let Some(inner) = weak.upgrade() {
            gesture_down(&inner, &ev);
        }
    })?;
    let weak = Rc::downgrade(inner);
    bindings.on_pointer("pointermove", false, move |ev| {
        if let Some(inner) = weak.upgrade() {
            gesture_move(&inner, &ev);
        }
    })?;
    let weak = Rc::downgrade(inner);
    bindings.on_pointer("pointerup", false, move |ev| {
        if let Some(inner) = weak.upgrade() {
            gesture_up(&inner, &ev);
        }
    })?;
    let weak = Rc::downgrade(inner);
    bindings.on_pointer("pointercancel", false, move |ev| {
        if let Some(inner) = weak.upgrade() {
            gesture_up(&inner, &ev);
        }
    })?;

    bindings.suppress_context_menu()?;
    Ok(())
}

/// Controls are hit-tested in top-left pointer space regardless of the
/// demo's own geometry convention.
fn control_point(inner: &Inner, demo: &Demo, ev: &PointerEvent) -> Point {
    let geom = geometry(inner, demo);
    map_pointer(ev.offset_x() as f64, ev.offset_y() as f64, &geom, YAxis::Down)
}

fn control_down(inner: &Inner, ev: &PointerEvent) {
    let demo = inner.demo.borrow();
    let p = control_point(inner, &demo, ev);
    let response = inner.interaction.borrow_mut().pointer_down(
        ev.pointer_id(),
        p,
        &demo.registry,
        &mut *inner.store.borrow_mut(),
    );
    if response.consumed {
        ev.prevent_default();
        ev.stop_immediate_propagation();
    }
    if response.capture {
        let _ = inner.canvas.set_pointer_capture(ev.pointer_id());
    }
    if let Some(action) = response.action {
        if let Some(resets) = demo.actions.get(action.0) {
            let mut store = inner.store.borrow_mut();
            store.batch(|s| {
                for &(widget, value) in resets {
                    s.set(widget, value);
                }
            });
        }
    }
    drop(demo);
    drain_queue(inner);
}

fn control_move(inner: &Inner, ev: &PointerEvent) {
    if !inner.interaction.borrow().dragging() {
        return;
    }
    let demo = inner.demo.borrow();
    let p = control_point(inner, &demo, ev);
    let owned = inner.interaction.borrow_mut().pointer_move(
        ev.pointer_id(),
        p,
        &demo.registry,
        &mut *inner.store.borrow_mut(),
    );
    if owned {
        ev.prevent_default();
        ev.stop_immediate_propagation();
    }
    drop(demo);
    drain_queue(inner);
}

fn control_up(inner: &Inner, ev: &PointerEvent) {
    let mut interaction = inner.interaction.borrow_mut();
    let was_dragging = interaction.dragging();
    interaction.pointer_up(ev.pointer_id());
    if was_dragging && !interaction.dragging() {
        ev.stop_immediate_propagation();
        let _ = inner.canvas.release_pointer_capture(ev.pointer_id());
    }
}

fn gesture_down(inner: &Inner, ev: &PointerEvent) {
    let demo = inner.demo.borrow();
    let geom = geometry(inner, &demo);
    let p = map_pointer(
        ev.offset_x() as f64,
        ev.offset_y() as f64,
        &geom,
        demo.y_axis,
    );
    match demo.gesture {
        Gesture::None => {}
        Gesture::VertexDrag { .. } => {
            // Primary button only; a secondary-button down never reaches
            // the engine pick (the context menu is suppressed, so nothing
            // else would stop it).
            if ev.button() != BUTTON_PRIMARY {
                return;
            }
            let began = if demo.engine_pick {
                let params = demo.build_params(&inner.store.borrow());
                let picked = inner.bridge.borrow_mut().pick_vertex(
                    &mut *inner.engine.borrow_mut(),
                    demo.name,
                    demo.width,
                    demo.height,
                    &params,
                    p.x,
                    p.y,
                    demo.pick_radius,
                    demo.points.len(),
                );
                match (picked, inner.vertex.borrow_mut().as_mut()) {
                    (Some(i), Some(drag)) => {
                        drag.begin_at(ev.pointer_id(), i, p, ev.button(), &demo.points)
                    }
                    _ => false,
                }
            } else {
                match inner.vertex.borrow_mut().as_mut() {
                    Some(drag) => {
                        drag.pointer_down(ev.pointer_id(), p, ev.button(), &demo.points)
                    }
                    None => false,
                }
            };
            if began {
                ev.prevent_default();
                let _ = inner.canvas.set_pointer_capture(ev.pointer_id());
            }
        }
        Gesture::RotateScale { .. } | Gesture::Focal { .. } => {
            if apply_pointer_gesture(inner, &demo, p, ev.buttons()) {
                ev.prevent_default();
                let _ = inner.canvas.set_pointer_capture(ev.pointer_id());
            }
        }
    }
    drop(demo);
    drain_queue(inner);
}

fn gesture_move(inner: &Inner, ev: &PointerEvent) {
    let mut demo = inner.demo.borrow_mut();
    let geom = geometry(inner, &demo);
    let p = map_pointer(
        ev.offset_x() as f64,
        ev.offset_y() as f64,
        &geom,
        demo.y_axis,
    );
    match demo.gesture {
        Gesture::None => {}
        Gesture::VertexDrag { .. } => {
            let moved = match inner.vertex.borrow_mut().as_mut() {
                Some(drag) => drag.pointer_move(ev.pointer_id(), p, &mut demo.points),
                None => false,
            };
            if moved {
                inner.store.borrow_mut().request_redraw();
            }
        }
        Gesture::RotateScale { .. } | Gesture::Focal { .. } => {
            apply_pointer_gesture(inner, &demo, p, ev.buttons());
        }
    }
    drop(demo);
    drain_queue(inner);
}

fn gesture_up(inner: &Inner, ev: &PointerEvent) {
    if let Some(drag) = inner.vertex.borrow_mut().as_mut() {
        drag.pointer_up(ev.pointer_id());
    }
    let _ = inner.canvas.release_pointer_capture(ev.pointer_id());
}

/// Apply a rotate/scale or focal-point reading. Returns whether any button
/// contributed (the caller captures the pointer on down when one did).
fn apply_pointer_gesture(inner: &Inner, demo: &Demo, p: Point, buttons: u16) -> bool {
    match demo.gesture {
        Gesture::RotateScale {
            angle,
            scale,
            skew_x,
            skew_y,
        } => {
            let update = inner
                .rotate
                .update(p, demo.width as f64, demo.height as f64, buttons);
            if update.is_empty() {
                return false;
            }
            let mut store = inner.store.borrow_mut();
            store.batch(|s| {
                if let Some((a, k)) = update.rotate_scale {
                    s.set_number(angle, a);
                    s.set_number(scale, k);
                }
                if let Some(sp) = update.secondary {
                    s.set_number(skew_x, sp.x);
                    s.set_number(skew_y, sp.y);
                }
            });
            true
        }
        Gesture::Focal { x, y } => {
            if buttons & BUTTONS_PRIMARY == 0 {
                return false;
            }
            let params = demo.build_params(&inner.store.borrow());
            let mapped = inner.engine.borrow_mut().screen_to_shape(
                demo.name,
                demo.width,
                demo.height,
                &params,
                p.x,
                p.y,
            );
            let (fx, fy) = match mapped {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "focal mapping failed, using raw coordinates");
                    (p.x, p.y)
                }
            };
            let mut store = inner.store.borrow_mut();
            store.batch(|s| {
                s.set_number(x, fx);
                s.set_number(y, fy);
            });
            true
        }
        _ => false,
    }
}

// ============================================================================
// Frame loop
// ============================================================================

fn start_frame_loop(inner: &Rc<Inner>) {
    let weak = Rc::downgrade(inner);
    let closure = Closure::<dyn FnMut(f64)>::wrap(Box::new(move |timestamp: f64| {
        let Some(inner) = weak.upgrade() else { return };
        if !inner.running.get() {
            return;
        }
        frame(&inner, timestamp);
        schedule_frame(&inner);
    }));
    *inner.raf.borrow_mut() = Some(closure);
    schedule_frame(inner);
}

fn schedule_frame(inner: &Inner) {
    let Some(win) = web_sys::window() else { return };
    let raf = inner.raf.borrow();
    if let Some(cb) = raf.as_ref() {
        if let Ok(handle) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
            inner.raf_handle.set(Some(handle));
        }
    }
}

fn frame(inner: &Inner, timestamp: f64) {
    let dt = match inner.last_frame.replace(Some(timestamp)) {
        Some(prev) => (timestamp - prev).max(0.0),
        None => 0.0,
    };
    let demo = inner.demo.borrow();
    if let Some(tick) = demo.tick {
        tick(&mut *inner.store.borrow_mut(), &demo, dt);
    }
    drop(demo);
    drain_queue(inner);
    if inner.store.borrow_mut().take_redraw() {
        draw(inner);
    }
}

fn draw(inner: &Inner) {
    let demo = inner.demo.borrow();
    let params = demo.build_params(&inner.store.borrow());

    let Some(ctx) = inner.ctx.as_ref() else {
        let status = RenderStatus::Failed(RenderError::NoContext.to_string());
        canvas::show_status(inner.status_line.as_ref(), &status.to_string());
        return;
    };

    let mut bridge = inner.bridge.borrow_mut();
    let start = js_sys::Date::now();
    let result = bridge.render(
        &mut *inner.engine.borrow_mut(),
        demo.name,
        demo.width,
        demo.height,
        &params,
    );
    let millis = js_sys::Date::now() - start;
    let status = RenderStatus::from_result(&result, millis);

    if let Ok(mut frame) = result {
        canvas::orient(&mut frame, bridge.y_axis());
        let changed = bridge.size_changed(demo.width, demo.height);
        canvas::ensure_size(&inner.canvas, demo.width, demo.height, changed);
        if canvas::paint_frame(ctx, &frame).is_ok() {
            let store = inner.store.borrow();
            let mut cmds = Vec::new();
            for (_, ctrl) in demo.registry.iter() {
                cmds.extend(chrome(ctrl, &store));
            }
            canvas::replay(ctx, &cmds);
        }
    }
    canvas::show_status(inner.status_line.as_ref(), &status.to_string());
}
