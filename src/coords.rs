//! Pointer coordinate mapping between the displayed canvas and its backing
//! pixel buffer.
//!
//! The canvas element may be displayed at a different size than its backing
//! buffer (CSS scaling), and the rendering engine uses a bottom-left origin
//! while pointer events use a top-left origin. `map_pointer` compensates for
//! both, per axis, as a pure function of the event offset and the canvas
//! geometry.

/// A point in logical (buffer) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Distance between two points.
pub fn calc_distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Vertical axis convention of a coordinate space.
///
/// Pointer events grow y downward (`Down`); the rendering engine's device
/// space grows y upward from the bottom-left corner (`Up`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAxis {
    /// Top-left origin, y grows downward (native pointer semantics).
    Down,
    /// Bottom-left origin, y grows upward (renderer device semantics).
    Up,
}

/// On-screen and backing-buffer dimensions of the canvas.
///
/// `display_*` are the CSS pixel dimensions of the element's bounding
/// rectangle; `buffer_*` are the dimensions of the pixel buffer behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub buffer_width: f64,
    pub buffer_height: f64,
    pub display_width: f64,
    pub display_height: f64,
}

impl CanvasGeometry {
    /// Geometry for an unscaled canvas (display size equals buffer size).
    pub fn unscaled(width: f64, height: f64) -> Self {
        Self {
            buffer_width: width,
            buffer_height: height,
            display_width: width,
            display_height: height,
        }
    }
}

/// Map an element-relative pointer offset (CSS pixels, top-left origin) to
/// logical buffer coordinates.
///
/// Scaling is independent per axis. With `YAxis::Up` the y coordinate is
/// flipped: `y = buffer_height - scaled_y`. Always returns a coordinate
/// pair; there are no error conditions.
pub fn map_pointer(offset_x: f64, offset_y: f64, geom: &CanvasGeometry, y_axis: YAxis) -> Point {
    let x = offset_x * (geom.buffer_width / geom.display_width);
    let y = offset_y * (geom.buffer_height / geom.display_height);
    match y_axis {
        YAxis::Down => Point::new(x, y),
        YAxis::Up => Point::new(x, geom.buffer_height - y),
    }
}

/// Primary button, as reported in a pointer event's `button` field.
pub const BUTTON_PRIMARY: i16 = 0;
/// Secondary button, as reported in a pointer event's `button` field.
pub const BUTTON_SECONDARY: i16 = 2;

/// Primary button bit in a pointer event's `buttons` bitmask.
pub const BUTTONS_PRIMARY: u16 = 1;
/// Secondary button bit in a pointer event's `buttons` bitmask.
pub const BUTTONS_SECONDARY: u16 = 2;

/// A pointer event reduced to what the gesture layer needs: the
/// element-relative offset plus which button changed (`button`) and which
/// are currently held (`buttons`).
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub offset_x: f64,
    pub offset_y: f64,
    pub button: i16,
    pub buttons: u16,
}

impl PointerInput {
    pub fn primary_held(&self) -> bool {
        self.buttons & BUTTONS_PRIMARY != 0
    }

    pub fn secondary_held(&self) -> bool {
        self.buttons & BUTTONS_SECONDARY != 0
    }
}

// ============================================================================
// Tests
// ============================================================================
