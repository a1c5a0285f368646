//! Browser bindings for the AGG demo gallery control layer.
//!
//! The core crate (`agg-gallery`) owns every decision: hit-testing, drag
//! sessions, value math, buffer validation. This crate only moves data
//! between the DOM and the core: it turns pointer events into logical
//! coordinates, replays the core's chrome display list onto the canvas,
//! projects store changes into the side panel's native inputs, and calls
//! the external rendering module through `js_sys::Function` handles handed
//! over at page initialization.
//!
//! One [`page::DemoPage`] exists per activated demo; navigating away calls
//! its teardown, which unbinds every listener and invalidates the
//! animation-frame handle. Nothing in this crate is a process-wide
//! singleton.

mod canvas;
mod demos;
mod engine;
mod events;
mod native;
mod page;

pub use page::DemoPage;

use wasm_bindgen::prelude::*;

/// Demo names this gallery can wire up.
#[wasm_bindgen]
pub fn demo_names() -> String {
    demos::NAMES.join(",")
}
