//! # agg-gallery
//!
//! Interactive in-canvas control layer for the AGG demo gallery.
//!
//! The gallery shows parameterized 2D drawings produced by an external
//! rendering engine. Each demo draws its UI controls (sliders, dual-handle
//! scale controls, checkboxes, radio groups, buttons) directly on the same
//! canvas as the rendered output, keeps them synchronized with paired native
//! inputs in a side panel, and resolves pointer gestures into parameter
//! edits.
//!
//! This crate is the platform-independent core. It knows nothing about the
//! DOM; the `agg-gallery-web` crate in `web/` binds it to a browser canvas.
//!
//! ## Architecture
//!
//! Pointer input flows through a fixed pipeline:
//!
//! 1. **`coords`** maps client pointer coordinates into the canvas buffer's
//!    logical space, optionally flipping the y axis to the renderer's
//!    bottom-left convention.
//! 2. **`ctrl`** holds the declarative control registry and resolves a
//!    logical point to at most one control (first match in registration
//!    order wins).
//! 3. **`interaction`** owns the drag session and turns pointer motion into
//!    value updates.
//! 4. **`store`** is the single authoritative home of widget values; both
//!    the canvas chrome and the paired native inputs are projections of it.
//! 5. **`params`** rebuilds the flat parameter vector from the store on
//!    every redraw.
//! 6. **`render_bridge`** hands the vector to the external engine, validates
//!    the returned pixel buffer, and reports success or a displayable
//!    failure without ever panicking across the boundary.
//!
//! The free-form gesture primitives (`vertex_drag`, `rotate_scale`) sit
//! beside the control pipeline and receive only the gestures the control
//! layer did not consume.

pub mod coords;
pub mod ctrl;
pub mod interaction;
pub mod params;
pub mod render_bridge;
pub mod rotate_scale;
pub mod store;
pub mod vertex_drag;

pub use coords::{map_pointer, CanvasGeometry, Point, PointerInput, YAxis};
pub use ctrl::{chrome, Bounds, Ctrl, CtrlId, CtrlKind, CtrlRegistry, DrawCmd, Grip, Rgba8};
pub use interaction::{DownResponse, Interaction};
pub use params::ParamVec;
pub use render_bridge::{Engine, EngineError, Frame, RenderBridge, RenderError, RenderStatus};
pub use rotate_scale::{GestureUpdate, RotateScale};
pub use store::{ActionId, ParamStore, Value, WidgetId, WidgetSink};
pub use vertex_drag::VertexDragger;
