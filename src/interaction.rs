//! The control interaction state machine.
//!
//! Hit-testing runs exactly once, on pointer-down; the resolved control (if
//! any) owns the pointer until release. Sliders are click-to-set: the value
//! at the down position is pushed immediately. Scale controls resolve their
//! grip on down but push nothing until the first move. Checkboxes, radio
//! groups, and buttons apply immediately and hold no drag session.
//!
//! The host must register the canvas-control pointer listeners in the
//! capture phase, ahead of demo-level listeners, and stop propagation and
//! prevent default whenever [`DownResponse::consumed`] is set, so that a
//! gesture aimed at a control is never also seen by the vertex-drag or
//! rotate/scale primitives bound to the same canvas.
//!
//! One drag session per pointer: a pointer-down from a second pointer while
//! a session is held is swallowed (consumed, no state change) until the
//! first pointer releases.

use tracing::debug;

use crate::coords::Point;
use crate::ctrl::{
    enforce_min_gap, radio_item_at, scale_along, scale_grip_at, scale_value_at, slider_value_at,
    CtrlId, CtrlKind, CtrlRegistry, Grip, ScaleGrab,
};
use crate::store::{ActionId, ParamStore};

/// Result of offering a pointer-down to the control layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownResponse {
    /// A control was recognized as hit: stop propagation, prevent default.
    pub consumed: bool,
    /// The host must capture the pointer on the canvas element.
    pub capture: bool,
    /// A button fired; the host runs the paired action.
    pub action: Option<ActionId>,
}

impl DownResponse {
    const PASS: DownResponse = DownResponse {
        consumed: false,
        capture: false,
        action: None,
    };

    const CONSUMED: DownResponse = DownResponse {
        consumed: true,
        capture: false,
        action: None,
    };
}

enum ActiveDrag {
    None,
    Slider(CtrlId),
    Scale { id: CtrlId, grab: ScaleGrab },
}

/// Owns the active control drag (at most one) across a pointer session.
pub struct Interaction {
    active: ActiveDrag,
    pointer: Option<i32>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self {
            active: ActiveDrag::None,
            pointer: None,
        }
    }

    pub fn dragging(&self) -> bool {
        !matches!(self.active, ActiveDrag::None)
    }

    /// Offer a pointer-down. Applies immediate-action controls, starts drag
    /// sessions for slider/scale hits, and reports what the host must do.
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        p: Point,
        registry: &CtrlRegistry,
        store: &mut ParamStore,
    ) -> DownResponse {
        if self.dragging() && self.pointer != Some(pointer_id) {
            // Second simultaneous pointer: swallowed until release.
            return DownResponse::CONSUMED;
        }
        let Some(id) = registry.hit_test(p) else {
            return DownResponse::PASS;
        };
        match registry.get(id).kind {
            CtrlKind::Slider { min, max, widget } => {
                debug!(?id, "slider drag begins");
                self.active = ActiveDrag::Slider(id);
                self.pointer = Some(pointer_id);
                // Click-to-set: the down position already moves the value.
                store.set_number(widget, slider_value_at(registry.get(id).bounds, min, max, p.x));
                DownResponse {
                    consumed: true,
                    capture: true,
                    action: None,
                }
            }
            CtrlKind::Scale {
                min,
                max,
                low,
                high,
                ..
            } => {
                let lo = store.number(low);
                let hi = store.number(high);
                match scale_grip_at(registry.get(id).bounds, min, max, lo, hi, p) {
                    Some(grab) => {
                        debug!(?id, grip = ?grab.grip, "scale drag begins");
                        self.active = ActiveDrag::Scale { id, grab };
                        self.pointer = Some(pointer_id);
                        // No value push on down; handles move on first move.
                        DownResponse {
                            consumed: true,
                            capture: true,
                            action: None,
                        }
                    }
                    None => DownResponse::CONSUMED,
                }
            }
            CtrlKind::Checkbox { widget } => {
                store.toggle(widget);
                DownResponse::CONSUMED
            }
            CtrlKind::RadioGroup { items, widget } => {
                if let Some(i) = radio_item_at(registry.get(id).bounds, items, p) {
                    store.set_choice(widget, i);
                }
                DownResponse::CONSUMED
            }
            CtrlKind::Button { action } => DownResponse {
                consumed: true,
                capture: false,
                action: Some(action),
            },
        }
    }

    /// Drive the active session with a new pointer position. Returns whether
    /// any widget value changed.
    pub fn pointer_move(
        &mut self,
        pointer_id: i32,
        p: Point,
        registry: &CtrlRegistry,
        store: &mut ParamStore,
    ) -> bool {
        if self.pointer != Some(pointer_id) {
            return false;
        }
        match self.active {
            ActiveDrag::None => false,
            ActiveDrag::Slider(id) => match registry.get(id).kind {
                CtrlKind::Slider { min, max, widget } => {
                    store.set_number(widget, slider_value_at(registry.get(id).bounds, min, max, p.x));
                    true
                }
                _ => unreachable!("slider session on non-slider control"),
            },
            ActiveDrag::Scale { id, grab } => match registry.get(id).kind {
                CtrlKind::Scale {
                    min,
                    max,
                    min_gap,
                    low,
                    high,
                } => {
                    let bounds = registry.get(id).bounds;
                    let along = scale_along(bounds, p);
                    let target = scale_value_at(bounds, min, max, along) + grab.grab;
                    let (lo, hi) = match grab.grip {
                        Grip::Low => enforce_min_gap(target, store.number(high), min, max, min_gap),
                        Grip::High => enforce_min_gap(store.number(low), target, min, max, min_gap),
                        Grip::Both => {
                            let lo = target.clamp(min, max - grab.span);
                            enforce_min_gap(lo, lo + grab.span, min, max, min_gap)
                        }
                    };
                    store.set_number(low, lo);
                    store.set_number(high, hi);
                    true
                }
                _ => unreachable!("scale session on non-scale control"),
            },
        }
    }

    /// End the session for `pointer_id` (release or cancel). No value is
    /// pushed; releasing never moves anything.
    pub fn pointer_up(&mut self, pointer_id: i32) {
        if self.pointer == Some(pointer_id) {
            self.active = ActiveDrag::None;
            self.pointer = None;
        }
    }

    /// Drop any session regardless of pointer (demo teardown).
    pub fn reset(&mut self) {
        self.active = ActiveDrag::None;
        self.pointer = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctrl::{radio_bullet_center, scale_handle_pos, Bounds, Ctrl};
    use crate::store::{Value, WidgetId, WidgetSink};
    use std::cell::RefCell;
    use std::rc::Rc;

    const PTR: i32 = 1;

    #[derive(Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<(WidgetId, Value)>>>,
    }

    impl WidgetSink for Recorder {
        fn widget_changed(&mut self, id: WidgetId, value: Value) {
            self.log.borrow_mut().push((id, value));
        }
    }

    fn slider_setup(min: f64, max: f64, initial: f64) -> (Interaction, CtrlRegistry, ParamStore, WidgetId) {
        let mut store = ParamStore::new();
        let widget = store.define_number(initial);
        let mut reg = CtrlRegistry::new();
        reg.add(Ctrl::new(
            Bounds::new(10.0, 5.0, 210.0, 14.0),
            CtrlKind::Slider { min, max, widget },
            "v",
        ));
        (Interaction::new(), reg, store, widget)
    }

    fn scale_setup(
        min: f64,
        max: f64,
        min_gap: f64,
        lo: f64,
        hi: f64,
    ) -> (Interaction, CtrlRegistry, ParamStore, WidgetId, WidgetId) {
        let mut store = ParamStore::new();
        let low = store.define_number(lo);
        let high = store.define_number(hi);
        let mut reg = CtrlRegistry::new();
        reg.add(Ctrl::new(
            Bounds::new(0.0, 0.0, 200.0, 10.0),
            CtrlKind::Scale {
                min,
                max,
                min_gap,
                low,
                high,
            },
            "range",
        ));
        (Interaction::new(), reg, store, low, high)
    }

    #[test]
    fn test_slider_click_to_set_at_midpoint() {
        // Registered with min=0 max=255, current value 26; a click at the
        // track's horizontal midpoint lands on 127.5 without any move, and
        // the paired native input hears about it exactly once.
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = ParamStore::new();
        store.set_sink(Box::new(Recorder { log: log.clone() }));
        let widget = store.define_number(26.0);
        let mut reg = CtrlRegistry::new();
        reg.add(Ctrl::new(
            Bounds::new(10.0, 5.0, 210.0, 14.0),
            CtrlKind::Slider {
                min: 0.0,
                max: 255.0,
                widget,
            },
            "v",
        ));
        let mut it = Interaction::new();
        let mid = (11.0 + 209.0) / 2.0;
        let r = it.pointer_down(PTR, Point::new(mid, 9.0), &reg, &mut store);
        assert!(r.consumed);
        assert!(r.capture);
        assert!((store.number(widget) - 127.5).abs() < 1e-9);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0], (widget, Value::Number(127.5)));
    }

    #[test]
    fn test_slider_drag_updates_and_clamps() {
        let (mut it, reg, mut store, widget) = slider_setup(0.0, 1.0, 0.5);
        it.pointer_down(PTR, Point::new(11.0, 9.0), &reg, &mut store);
        assert_eq!(store.number(widget), 0.0);
        assert!(it.pointer_move(PTR, Point::new(209.0, 9.0), &reg, &mut store));
        assert_eq!(store.number(widget), 1.0);
        // Pointer capture keeps the drag alive far outside the box
        assert!(it.pointer_move(PTR, Point::new(-400.0, 300.0), &reg, &mut store));
        assert_eq!(store.number(widget), 0.0);
        it.pointer_up(PTR);
        assert!(!it.pointer_move(PTR, Point::new(100.0, 9.0), &reg, &mut store));
    }

    #[test]
    fn test_miss_is_not_consumed() {
        let (mut it, reg, mut store, _w) = slider_setup(0.0, 1.0, 0.5);
        let r = it.pointer_down(PTR, Point::new(300.0, 200.0), &reg, &mut store);
        assert!(!r.consumed);
        assert!(!it.dragging());
    }

    #[test]
    fn test_scale_down_pushes_nothing_until_move() {
        let (mut it, reg, mut store, low, high) = scale_setup(0.0, 100.0, 10.0, 20.0, 80.0);
        let p = scale_handle_pos(reg.get(crate::ctrl::CtrlId(0)).bounds, 0.0, 100.0, 20.0);
        let r = it.pointer_down(PTR, p, &reg, &mut store);
        assert!(r.consumed);
        assert!(r.capture);
        assert_eq!(store.number(low), 20.0);
        assert_eq!(store.number(high), 80.0);
        let _ = store.take_redraw();
        assert!(!store.take_redraw());
    }

    #[test]
    fn test_scale_drag_low_past_high_keeps_gap() {
        let (mut it, reg, mut store, low, high) = scale_setup(0.0, 100.0, 10.0, 20.0, 80.0);
        let b = reg.get(crate::ctrl::CtrlId(0)).bounds;
        it.pointer_down(PTR, scale_handle_pos(b, 0.0, 100.0, 20.0), &reg, &mut store);
        // Drag the low handle way past the high one and past the track end
        it.pointer_move(PTR, Point::new(1000.0, 5.0), &reg, &mut store);
        let (lo, hi) = (store.number(low), store.number(high));
        assert!(lo <= hi);
        assert!(hi - lo >= 10.0 - 1e-9);
        assert!(lo >= 0.0 && hi <= 100.0);
        assert_eq!(hi, 100.0);
        assert_eq!(lo, 90.0);
    }

    #[test]
    fn test_scale_move_both_preserves_gap() {
        let (mut it, reg, mut store, low, high) = scale_setup(0.0, 100.0, 10.0, 20.0, 80.0);
        let b = reg.get(crate::ctrl::CtrlId(0)).bounds;
        let p_lo = scale_handle_pos(b, 0.0, 100.0, 20.0);
        let p_hi = scale_handle_pos(b, 0.0, 100.0, 80.0);
        let mid = Point::new((p_lo.x + p_hi.x) / 2.0, 5.0);
        it.pointer_down(PTR, mid, &reg, &mut store);
        it.pointer_move(PTR, Point::new(mid.x + 30.0, 5.0), &reg, &mut store);
        let gap = store.number(high) - store.number(low);
        assert!((gap - 60.0).abs() < 1e-9);
        // Shoved past the end of the track the pair still fits
        it.pointer_move(PTR, Point::new(2000.0, 5.0), &reg, &mut store);
        assert_eq!(store.number(high), 100.0);
        assert!((store.number(low) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_dead_zone_consumes_without_session() {
        let (mut it, reg, mut store, _low, _high) = scale_setup(0.0, 100.0, 10.0, 20.0, 80.0);
        // Inside the padded box but outside handles and the between band
        let r = it.pointer_down(PTR, Point::new(100.0, -4.0), &reg, &mut store);
        assert!(r.consumed);
        assert!(!r.capture);
        assert!(!it.dragging());
    }

    #[test]
    fn test_checkbox_toggles_immediately() {
        let mut store = ParamStore::new();
        let w = store.define_flag(false);
        let mut reg = CtrlRegistry::new();
        reg.add(Ctrl::new(
            Bounds::new(10.0, 10.0, 24.0, 24.0),
            CtrlKind::Checkbox { widget: w },
            "on",
        ));
        let mut it = Interaction::new();
        let r = it.pointer_down(PTR, Point::new(15.0, 15.0), &reg, &mut store);
        assert!(r.consumed);
        assert!(!r.capture);
        assert!(store.flag(w));
        assert!(!it.dragging());
    }

    #[test]
    fn test_radio_selects_item() {
        let mut store = ParamStore::new();
        let w = store.define_choice(0);
        let mut reg = CtrlRegistry::new();
        let bounds = Bounds::new(10.0, 10.0, 150.0, 100.0);
        reg.add(Ctrl::new(
            bounds,
            CtrlKind::RadioGroup { items: 4, widget: w },
            "",
        ));
        let mut it = Interaction::new();
        it.pointer_down(PTR, radio_bullet_center(bounds, 2), &reg, &mut store);
        assert_eq!(store.choice(w), 2);
    }

    #[test]
    fn test_button_fires_action() {
        let mut store = ParamStore::new();
        let mut reg = CtrlRegistry::new();
        reg.add(Ctrl::new(
            Bounds::new(0.0, 0.0, 60.0, 20.0),
            CtrlKind::Button { action: ActionId(7) },
            "reset",
        ));
        let mut it = Interaction::new();
        let r = it.pointer_down(PTR, Point::new(30.0, 10.0), &reg, &mut store);
        assert_eq!(r.action, Some(ActionId(7)));
        assert!(r.consumed);
    }

    #[test]
    fn test_second_pointer_rejected_during_drag() {
        let (mut it, reg, mut store, widget) = slider_setup(0.0, 1.0, 0.0);
        it.pointer_down(PTR, Point::new(100.0, 9.0), &reg, &mut store);
        let before = store.number(widget);
        let r = it.pointer_down(PTR + 1, Point::new(11.0, 9.0), &reg, &mut store);
        assert!(r.consumed);
        assert!(!r.capture);
        assert_eq!(store.number(widget), before);
        // And the second pointer's moves are ignored
        assert!(!it.pointer_move(PTR + 1, Point::new(209.0, 9.0), &reg, &mut store));
        assert_eq!(store.number(widget), before);
    }
}
