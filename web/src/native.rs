//! Projection of store values onto the side panel's native inputs.
//!
//! [`SidePanel`] is the store's [`WidgetSink`]: whenever a widget changes
//! (from the canvas or anywhere else), the paired input's `value` or
//! `checked` is set and its change event is dispatched programmatically, so
//! listeners attached by the page behave exactly as if the user had edited
//! the native widget. Setting a value property never re-fires an event by
//! itself, so this projection cannot loop.

use agg_gallery::{Value, WidgetId, WidgetSink};
use tracing::warn;
use web_sys::{Event, HtmlInputElement};

enum Slot {
    /// Range/number input holding a numeric value.
    Number(HtmlInputElement),
    Flag(HtmlInputElement),
    /// One radio input per choice, in index order.
    Choice(Vec<HtmlInputElement>),
    /// Widget with no native pairing (gesture-only values).
    Unbound,
}

pub struct SidePanel {
    slots: Vec<Slot>,
}

fn dispatch(input: &HtmlInputElement, event: &str) {
    if let Ok(ev) = Event::new(event) {
        let _ = input.dispatch_event(&ev);
    }
}

impl SidePanel {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    fn slot_mut(&mut self, index: usize) -> &mut Slot {
        while self.slots.len() <= index {
            self.slots.push(Slot::Unbound);
        }
        &mut self.slots[index]
    }

    pub fn bind_number(&mut self, widget: WidgetId, input: HtmlInputElement) {
        *self.slot_mut(widget.index()) = Slot::Number(input);
    }

    pub fn bind_flag(&mut self, widget: WidgetId, input: HtmlInputElement) {
        *self.slot_mut(widget.index()) = Slot::Flag(input);
    }

    pub fn bind_choice(&mut self, widget: WidgetId, inputs: Vec<HtmlInputElement>) {
        *self.slot_mut(widget.index()) = Slot::Choice(inputs);
    }
}

impl Default for SidePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetSink for SidePanel {
    fn widget_changed(&mut self, id: WidgetId, value: Value) {
        let Some(slot) = self.slots.get(id.index()) else {
            return;
        };
        match (slot, value) {
            (Slot::Number(input), Value::Number(v)) => {
                input.set_value(&format!("{v}"));
                dispatch(input, "input");
            }
            (Slot::Flag(input), Value::Flag(v)) => {
                input.set_checked(v);
                dispatch(input, "change");
            }
            (Slot::Choice(inputs), Value::Choice(i)) => {
                if let Some(input) = inputs.get(i) {
                    input.set_checked(true);
                    dispatch(input, "change");
                } else {
                    warn!(?id, i, "choice index has no paired radio input");
                }
            }
            (Slot::Unbound, _) => {}
            (_, v) => warn!(?id, ?v, "widget value kind does not match its input"),
        }
    }
}
