//! Authoritative widget state and its projection to both presentations.
//!
//! Every control on the canvas is paired with a native input in the side
//! panel, and both must always display the same value no matter which side
//! the user edited. Instead of pushing values back and forth between the two
//! presentations (which needs a re-entrancy guard to avoid update loops),
//! the value lives exactly once, in [`ParamStore`]. The canvas chrome and
//! the native inputs are both one-directional projections of the store:
//!
//! - canvas edits call [`ParamStore::set`];
//! - native-input events call [`ParamStore::set`];
//! - every accepted mutation is forwarded once to the installed
//!   [`WidgetSink`] (which updates the native input's `value`/`checked` and
//!   fires its change notification), and a redraw is marked pending.
//!
//! Redraws are level-triggered: the host drains [`ParamStore::take_redraw`]
//! from its event loop, so any burst of mutations (for example the four
//! sliders updated by a single rotate/scale gesture) collapses into one
//! repaint with no suppression flag anywhere.

use tracing::debug;

/// Handle to one widget value in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetId(pub(crate) usize);

impl WidgetId {
    /// Position in definition order. Hosts use this to pair widgets with
    /// their native inputs.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Handle to a host-side button action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionId(pub usize);

/// A widget value. Sliders and scale handles are `Number`, checkboxes are
/// `Flag`, radio groups are `Choice` (the selected index).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Flag(bool),
    Choice(usize),
}

/// Receives every accepted store mutation, exactly once per mutation.
///
/// The web crate's implementation writes the value into the paired native
/// input and dispatches its change event, so demo-level listeners observe
/// canvas edits exactly as if the user had used the native widget.
pub trait WidgetSink {
    fn widget_changed(&mut self, id: WidgetId, value: Value);
}

/// The single authoritative home of all widget values for one demo page.
///
/// Created on demo activation, discarded on teardown; holds no external
/// resources.
#[derive(Default)]
pub struct ParamStore {
    values: Vec<Value>,
    sink: Option<Box<dyn WidgetSink>>,
    redraw_pending: bool,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the projection sink. At most one; installing replaces.
    pub fn set_sink(&mut self, sink: Box<dyn WidgetSink>) {
        self.sink = Some(sink);
    }

    pub fn define_number(&mut self, initial: f64) -> WidgetId {
        self.values.push(Value::Number(initial));
        WidgetId(self.values.len() - 1)
    }

    pub fn define_flag(&mut self, initial: bool) -> WidgetId {
        self.values.push(Value::Flag(initial));
        WidgetId(self.values.len() - 1)
    }

    pub fn define_choice(&mut self, initial: usize) -> WidgetId {
        self.values.push(Value::Choice(initial));
        WidgetId(self.values.len() - 1)
    }

    pub fn get(&self, id: WidgetId) -> Value {
        self.values[id.0]
    }

    /// Numeric value of `id`. Panics if `id` holds a flag or choice; a kind
    /// mismatch is a programming error, not a runtime condition.
    pub fn number(&self, id: WidgetId) -> f64 {
        match self.values[id.0] {
            Value::Number(v) => v,
            other => panic!("widget {:?} is not a number: {:?}", id, other),
        }
    }

    pub fn flag(&self, id: WidgetId) -> bool {
        match self.values[id.0] {
            Value::Flag(v) => v,
            other => panic!("widget {:?} is not a flag: {:?}", id, other),
        }
    }

    pub fn choice(&self, id: WidgetId) -> usize {
        match self.values[id.0] {
            Value::Choice(v) => v,
            other => panic!("widget {:?} is not a choice: {:?}", id, other),
        }
    }

    /// Store `value`, forward it to the sink, and mark a redraw pending.
    ///
    /// The new value kind must match the defined kind. Setting the value a
    /// widget already holds is a no-op: the projection to a native input
    /// fires that input's change event, whose listener echoes the value
    /// back into the store, and the echo must die here rather than cycle.
    pub fn set(&mut self, id: WidgetId, value: Value) {
        let slot = &mut self.values[id.0];
        match (&slot, &value) {
            (Value::Number(_), Value::Number(_))
            | (Value::Flag(_), Value::Flag(_))
            | (Value::Choice(_), Value::Choice(_)) => {}
            _ => panic!("widget {:?} kind mismatch: {:?} <- {:?}", id, slot, value),
        }
        if *slot == value {
            return;
        }
        *slot = value;
        debug!(?id, ?value, "widget changed");
        if let Some(sink) = self.sink.as_mut() {
            sink.widget_changed(id, value);
        }
        self.redraw_pending = true;
    }

    pub fn set_number(&mut self, id: WidgetId, v: f64) {
        self.set(id, Value::Number(v));
    }

    pub fn set_flag(&mut self, id: WidgetId, v: bool) {
        self.set(id, Value::Flag(v));
    }

    pub fn set_choice(&mut self, id: WidgetId, v: usize) {
        self.set(id, Value::Choice(v));
    }

    /// Flip a flag widget and return the new state.
    pub fn toggle(&mut self, id: WidgetId) -> bool {
        let next = !self.flag(id);
        self.set_flag(id, next);
        next
    }

    /// Group several mutations. Purely organizational: redraws are
    /// level-triggered, so the group repaints once either way, but call
    /// sites read better when a multi-widget push is one expression.
    pub fn batch<F: FnOnce(&mut Self)>(&mut self, f: F) {
        f(self);
    }

    /// True once per burst of mutations; clears the pending flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    /// Request a repaint without changing any widget (used by gestures that
    /// mutate demo-owned geometry such as vertex lists).
    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<(WidgetId, Value)>>>,
    }

    impl WidgetSink for Recorder {
        fn widget_changed(&mut self, id: WidgetId, value: Value) {
            self.log.borrow_mut().push((id, value));
        }
    }

    fn store_with_recorder() -> (ParamStore, Rc<RefCell<Vec<(WidgetId, Value)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = ParamStore::new();
        store.set_sink(Box::new(Recorder { log: log.clone() }));
        (store, log)
    }

    #[test]
    fn test_set_forwards_to_sink_once() {
        let (mut store, log) = store_with_recorder();
        let id = store.define_number(1.0);
        store.set_number(id, 2.5);
        assert_eq!(store.number(id), 2.5);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0], (id, Value::Number(2.5)));
    }

    #[test]
    fn test_double_toggle_round_trips_with_two_notifications() {
        let (mut store, log) = store_with_recorder();
        let id = store.define_flag(true);
        store.toggle(id);
        store.toggle(id);
        assert!(store.flag(id));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_redraw_is_level_triggered() {
        let (mut store, _log) = store_with_recorder();
        let a = store.define_number(0.0);
        let b = store.define_number(0.0);
        assert!(!store.take_redraw());
        store.batch(|s| {
            s.set_number(a, 1.0);
            s.set_number(b, 2.0);
        });
        assert!(store.take_redraw());
        assert!(!store.take_redraw());
    }

    #[test]
    fn test_choice_widget() {
        let (mut store, log) = store_with_recorder();
        let id = store.define_choice(0);
        store.set_choice(id, 3);
        assert_eq!(store.choice(id), 3);
        assert_eq!(log.borrow()[0], (id, Value::Choice(3)));
    }

    #[test]
    fn test_setting_unchanged_value_is_silent() {
        // The projection echo: a native input's change listener writes the
        // value it just received straight back. No notification, no redraw.
        let (mut store, log) = store_with_recorder();
        let id = store.define_number(4.0);
        store.set_number(id, 4.0);
        assert!(log.borrow().is_empty());
        assert!(!store.take_redraw());
    }

    #[test]
    #[should_panic]
    fn test_kind_mismatch_panics() {
        let mut store = ParamStore::new();
        let id = store.define_flag(false);
        store.set_number(id, 1.0);
    }
}
