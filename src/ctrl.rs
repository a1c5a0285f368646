//! Canvas control descriptors, the registry, hit-testing, and per-kind
//! value math.
//!
//! Controls are declarative: a bounding box in logical coordinates plus a
//! closed tagged kind. They hold no displayed value of their own; geometry
//! shown on the canvas is derived from the paired widget's value in the
//! [`ParamStore`](crate::store::ParamStore) on every repaint, and value
//! edits flow back through the store. Each kind is matched exhaustively at
//! every consumption site (hit-test, value push, chrome), so adding a kind
//! is a compile error until all sites handle it.
//!
//! Hit-testing is first-match-wins in registration order. Overlapping
//! controls are disambiguated solely by that order; there is no z priority.
//! Callers register the more specific control first when overlap is
//! possible.

use crate::coords::{calc_distance, Point};
use crate::store::{ActionId, ParamStore, WidgetId};

// ============================================================================
// Geometry and colors
// ============================================================================

/// Axis-aligned bounding box in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bounds {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// The box's thin dimension.
    pub fn thickness(&self) -> f64 {
        self.width().min(self.height())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    pub fn expanded(&self, pad: f64) -> Bounds {
        Bounds::new(self.x1 - pad, self.y1 - pad, self.x2 + pad, self.y2 + pad)
    }
}

/// 8-bit RGBA color for control chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

const COLOR_BACKGROUND: Rgba8 = Rgba8::new(255, 230, 204, 255);
const COLOR_RBOX_BACKGROUND: Rgba8 = Rgba8::new(255, 255, 230, 255);
const COLOR_POINTER: Rgba8 = Rgba8::new(204, 0, 0, 153);
const COLOR_TRACK: Rgba8 = Rgba8::new(179, 153, 153, 255);
const COLOR_TEXT: Rgba8 = Rgba8::new(0, 0, 0, 255);
const COLOR_ACTIVE: Rgba8 = Rgba8::new(102, 0, 0, 255);

/// Text height used by all control labels.
const TEXT_HEIGHT: f64 = 9.0;
/// Radius of a scale-control handle.
const HANDLE_RADIUS: f64 = 8.0;
/// Perpendicular tolerance band for the move-both grip of a scale control.
const BETWEEN_TOLERANCE: f64 = 8.0;
/// Vertical distance between radio items.
const RADIO_ROW: f64 = TEXT_HEIGHT * 2.0;
/// Offset of a radio bullet center from the box corner.
const RADIO_BULLET_OFFSET: f64 = RADIO_ROW / 1.3;
/// Drawn radius of a radio bullet.
const RADIO_BULLET_RADIUS: f64 = TEXT_HEIGHT / 1.5;
/// Hit radius of a radio bullet.
const RADIO_HIT_RADIUS: f64 = RADIO_BULLET_RADIUS * 1.5;

// ============================================================================
// Descriptors
// ============================================================================

/// Handle to a registered control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlId(pub(crate) usize);

/// Which part of a scale (dual-handle range) control a drag holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grip {
    Low,
    High,
    /// Both handles move together, preserving their current gap.
    Both,
}

/// The closed set of control kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CtrlKind {
    /// Single-handle value slider over `[min, max]`.
    Slider { min: f64, max: f64, widget: WidgetId },
    /// Dual-handle range slider. The two handles never come closer than
    /// `min_gap` (in value units).
    Scale {
        min: f64,
        max: f64,
        min_gap: f64,
        low: WidgetId,
        high: WidgetId,
    },
    Checkbox { widget: WidgetId },
    /// Vertical stack of `items` radio bullets; the paired widget holds the
    /// selected index as a choice value.
    RadioGroup { items: usize, widget: WidgetId },
    /// Fires a host action on pointer-down.
    Button { action: ActionId },
}

/// One registered canvas control.
#[derive(Debug, Clone, PartialEq)]
pub struct Ctrl {
    pub bounds: Bounds,
    pub kind: CtrlKind,
    pub label: String,
}

impl Ctrl {
    pub fn new(bounds: Bounds, kind: CtrlKind, label: &str) -> Self {
        Self {
            bounds,
            kind,
            label: label.to_string(),
        }
    }

    /// Bounds used for hit-testing. Thin strip kinds (slider, scale) are
    /// padded by half their own thickness so they are easier to grab.
    fn hit_bounds(&self) -> Bounds {
        match self.kind {
            CtrlKind::Slider { .. } | CtrlKind::Scale { .. } => {
                self.bounds.expanded(self.bounds.thickness() / 2.0)
            }
            CtrlKind::Checkbox { .. } | CtrlKind::RadioGroup { .. } | CtrlKind::Button { .. } => {
                self.bounds
            }
        }
    }
}

/// Ordered list of the controls registered for one demo.
///
/// Built once on demo activation and discarded on teardown.
#[derive(Default)]
pub struct CtrlRegistry {
    ctrls: Vec<Ctrl>,
}

impl CtrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ctrl: Ctrl) -> CtrlId {
        self.ctrls.push(ctrl);
        CtrlId(self.ctrls.len() - 1)
    }

    pub fn get(&self, id: CtrlId) -> &Ctrl {
        &self.ctrls[id.0]
    }

    pub fn len(&self) -> usize {
        self.ctrls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ctrls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CtrlId, &Ctrl)> {
        self.ctrls.iter().enumerate().map(|(i, c)| (CtrlId(i), c))
    }

    /// First control (in registration order) whose padded bounds contain
    /// the point.
    pub fn hit_test(&self, p: Point) -> Option<CtrlId> {
        self.iter()
            .find(|(_, c)| c.hit_bounds().contains(p))
            .map(|(id, _)| id)
    }
}

// ============================================================================
// Slider value math
// ============================================================================

/// Usable track span of a slider box (1px inset at each end).
fn track_span(a1: f64, a2: f64) -> (f64, f64) {
    (a1 + 1.0, a2 - 1.0)
}

/// Value at horizontal position `x`, clamped to the track.
///
/// Exact at the edges: the track start maps to `min`, the end to `max`,
/// and the result is monotonic non-decreasing in `x`.
pub fn slider_value_at(bounds: Bounds, min: f64, max: f64, x: f64) -> f64 {
    let (t1, t2) = track_span(bounds.x1, bounds.x2);
    let t = ((x - t1) / (t2 - t1)).clamp(0.0, 1.0);
    min + t * (max - min)
}

/// Horizontal pixel position of the slider pointer for `value`.
pub fn slider_pos(bounds: Bounds, min: f64, max: f64, value: f64) -> f64 {
    let (t1, t2) = track_span(bounds.x1, bounds.x2);
    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
    t1 + t * (t2 - t1)
}

// ============================================================================
// Scale (dual-range) value math
// ============================================================================

/// An in-progress grab of a scale control, resolved on pointer-down.
///
/// `grab` is the value-space offset between the grabbed handle and the
/// click, so the handle does not snap to the pointer; `span` is the gap at
/// grab time, preserved by the move-both grip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleGrab {
    pub grip: Grip,
    pub grab: f64,
    pub span: f64,
}

fn scale_is_horizontal(bounds: Bounds) -> bool {
    bounds.width() > bounds.height()
}

/// Along-axis coordinate of a point (x for horizontal controls, y for
/// vertical ones).
pub fn scale_along(bounds: Bounds, p: Point) -> f64 {
    if scale_is_horizontal(bounds) {
        p.x
    } else {
        p.y
    }
}

/// (along, perpendicular-distance-from-centerline) of a point relative to
/// the control's long axis.
fn scale_axis_coords(bounds: Bounds, p: Point) -> (f64, f64) {
    if scale_is_horizontal(bounds) {
        (p.x, (p.y - (bounds.y1 + bounds.y2) / 2.0).abs())
    } else {
        (p.y, (p.x - (bounds.x1 + bounds.x2) / 2.0).abs())
    }
}

fn scale_track(bounds: Bounds) -> (f64, f64) {
    if scale_is_horizontal(bounds) {
        track_span(bounds.x1, bounds.x2)
    } else {
        track_span(bounds.y1, bounds.y2)
    }
}

/// Along-axis pixel position of a handle for `value`.
fn scale_handle_along(bounds: Bounds, min: f64, max: f64, value: f64) -> f64 {
    let (t1, t2) = scale_track(bounds);
    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
    t1 + t * (t2 - t1)
}

/// Handle center in logical coordinates.
pub fn scale_handle_pos(bounds: Bounds, min: f64, max: f64, value: f64) -> Point {
    let along = scale_handle_along(bounds, min, max, value);
    if scale_is_horizontal(bounds) {
        Point::new(along, (bounds.y1 + bounds.y2) / 2.0)
    } else {
        Point::new((bounds.x1 + bounds.x2) / 2.0, along)
    }
}

/// Value at an along-axis pixel position, clamped to the track.
pub fn scale_value_at(bounds: Bounds, min: f64, max: f64, along: f64) -> f64 {
    let (t1, t2) = scale_track(bounds);
    let t = ((along - t1) / (t2 - t1)).clamp(0.0, 1.0);
    min + t * (max - min)
}

/// Resolve a pointer-down on a scale control to a grip, or `None` when the
/// click lands on neither handle nor the span between them.
///
/// Between the handles' inner edges (within the perpendicular tolerance
/// band) the whole pair is grabbed; otherwise the low handle is tried
/// before the high one.
pub fn scale_grip_at(
    bounds: Bounds,
    min: f64,
    max: f64,
    low: f64,
    high: f64,
    p: Point,
) -> Option<ScaleGrab> {
    let (along, perp) = scale_axis_coords(bounds, p);
    let a_low = scale_handle_along(bounds, min, max, low);
    let a_high = scale_handle_along(bounds, min, max, high);
    let v = scale_value_at(bounds, min, max, along);
    let span = high - low;

    if perp <= BETWEEN_TOLERANCE && along > a_low + HANDLE_RADIUS && along < a_high - HANDLE_RADIUS
    {
        return Some(ScaleGrab {
            grip: Grip::Both,
            grab: low - v,
            span,
        });
    }
    if calc_distance(p, scale_handle_pos(bounds, min, max, low)) <= HANDLE_RADIUS {
        return Some(ScaleGrab {
            grip: Grip::Low,
            grab: low - v,
            span,
        });
    }
    if calc_distance(p, scale_handle_pos(bounds, min, max, high)) <= HANDLE_RADIUS {
        return Some(ScaleGrab {
            grip: Grip::High,
            grab: high - v,
            span,
        });
    }
    None
}

/// Clamp both handles into `[min, max]` and restore `min_gap` by
/// re-centering the pair around its midpoint, shifting the whole pair
/// inward at a range boundary rather than truncating one side.
///
/// Requires `min_gap <= max - min`.
pub fn enforce_min_gap(low: f64, high: f64, min: f64, max: f64, min_gap: f64) -> (f64, f64) {
    let mut low = low.clamp(min, max);
    let mut high = high.clamp(min, max);
    if high - low < min_gap {
        let mid = (low + high) / 2.0;
        low = mid - min_gap / 2.0;
        high = mid + min_gap / 2.0;
        if low < min {
            low = min;
            high = min + min_gap;
        }
        if high > max {
            high = max;
            low = max - min_gap;
        }
    }
    (low, high)
}

// ============================================================================
// Radio-group hit math
// ============================================================================

/// Item index of a click on a radio group, or `None` when the click misses
/// every bullet. Bullets are a vertical stack on a fixed row height and
/// indent, each a circular hit target of fixed radius.
pub fn radio_item_at(bounds: Bounds, items: usize, p: Point) -> Option<usize> {
    for i in 0..items {
        let center = Point::new(
            bounds.x1 + RADIO_BULLET_OFFSET,
            bounds.y1 + RADIO_ROW * i as f64 + RADIO_BULLET_OFFSET,
        );
        if calc_distance(p, center) <= RADIO_HIT_RADIUS {
            return Some(i);
        }
    }
    None
}

/// Drawn center of radio bullet `i` (shared by hit math and chrome).
pub fn radio_bullet_center(bounds: Bounds, i: usize) -> Point {
    Point::new(
        bounds.x1 + RADIO_BULLET_OFFSET,
        bounds.y1 + RADIO_ROW * i as f64 + RADIO_BULLET_OFFSET,
    )
}

// ============================================================================
// Chrome
// ============================================================================

/// One 2D drawing command for control chrome. The web crate replays these
/// on the canvas context after blitting the rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect { x: f64, y: f64, w: f64, h: f64, color: Rgba8 },
    StrokeRect { x: f64, y: f64, w: f64, h: f64, width: f64, color: Rgba8 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Rgba8 },
    FillCircle { cx: f64, cy: f64, r: f64, color: Rgba8 },
    StrokeCircle { cx: f64, cy: f64, r: f64, width: f64, color: Rgba8 },
    Text { x: f64, y: f64, size: f64, color: Rgba8, text: String },
}

fn fill_bounds(b: Bounds, color: Rgba8) -> DrawCmd {
    DrawCmd::FillRect {
        x: b.x1,
        y: b.y1,
        w: b.width(),
        h: b.height(),
        color,
    }
}

fn stroke_bounds(b: Bounds, width: f64, color: Rgba8) -> DrawCmd {
    DrawCmd::StrokeRect {
        x: b.x1,
        y: b.y1,
        w: b.width(),
        h: b.height(),
        width,
        color,
    }
}

/// Build the display list for one control from its authoritative widget
/// values. Nothing here is cached; geometry is re-derived on every repaint.
pub fn chrome(ctrl: &Ctrl, store: &ParamStore) -> Vec<DrawCmd> {
    let b = ctrl.bounds;
    let mut out = Vec::new();
    match ctrl.kind {
        CtrlKind::Slider { min, max, widget } => {
            let value = store.number(widget);
            let cy = (b.y1 + b.y2) / 2.0;
            out.push(fill_bounds(b.expanded(b.thickness() / 2.0), COLOR_BACKGROUND));
            out.push(DrawCmd::Line {
                x1: b.x1 + 1.0,
                y1: cy,
                x2: b.x2 - 1.0,
                y2: cy,
                width: 1.0,
                color: COLOR_TRACK,
            });
            out.push(DrawCmd::FillCircle {
                cx: slider_pos(b, min, max, value),
                cy,
                r: b.height(),
                color: COLOR_POINTER,
            });
            if !ctrl.label.is_empty() {
                out.push(DrawCmd::Text {
                    x: b.x1,
                    y: b.y1 - 2.0,
                    size: TEXT_HEIGHT,
                    color: COLOR_TEXT,
                    text: format!("{}={:.2}", ctrl.label, value),
                });
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
            let p_lo = scale_handle_pos(b, min, max, lo);
            let p_hi = scale_handle_pos(b, min, max, hi);
            out.push(fill_bounds(b.expanded(b.thickness() / 2.0), COLOR_BACKGROUND));
            out.push(DrawCmd::Line {
                x1: p_lo.x,
                y1: p_lo.y,
                x2: p_hi.x,
                y2: p_hi.y,
                width: b.thickness() / 2.0,
                color: COLOR_TRACK,
            });
            out.push(DrawCmd::FillCircle {
                cx: p_lo.x,
                cy: p_lo.y,
                r: HANDLE_RADIUS,
                color: COLOR_POINTER,
            });
            out.push(DrawCmd::FillCircle {
                cx: p_hi.x,
                cy: p_hi.y,
                r: HANDLE_RADIUS,
                color: COLOR_POINTER,
            });
        }
        CtrlKind::Checkbox { widget } => {
            let checked = store.flag(widget);
            out.push(stroke_bounds(b, 1.5, COLOR_TEXT));
            if checked {
                let t = 3.0;
                out.push(DrawCmd::FillRect {
                    x: b.x1 + t,
                    y: b.y1 + t,
                    w: b.width() - 2.0 * t,
                    h: b.height() - 2.0 * t,
                    color: COLOR_ACTIVE,
                });
            }
            if !ctrl.label.is_empty() {
                out.push(DrawCmd::Text {
                    x: b.x2 + TEXT_HEIGHT,
                    y: b.y2 - TEXT_HEIGHT / 3.0,
                    size: TEXT_HEIGHT,
                    color: COLOR_TEXT,
                    text: ctrl.label.clone(),
                });
            }
        }
        CtrlKind::RadioGroup { items, widget } => {
            let selected = store.choice(widget);
            out.push(fill_bounds(b, COLOR_RBOX_BACKGROUND));
            out.push(stroke_bounds(b, 1.0, COLOR_TEXT));
            for i in 0..items {
                let c = radio_bullet_center(b, i);
                out.push(DrawCmd::StrokeCircle {
                    cx: c.x,
                    cy: c.y,
                    r: RADIO_BULLET_RADIUS,
                    width: 1.5,
                    color: COLOR_TEXT,
                });
                if i == selected {
                    out.push(DrawCmd::FillCircle {
                        cx: c.x,
                        cy: c.y,
                        r: TEXT_HEIGHT / 2.0,
                        color: COLOR_ACTIVE,
                    });
                }
            }
        }
        CtrlKind::Button { .. } => {
            out.push(fill_bounds(b, COLOR_BACKGROUND));
            out.push(stroke_bounds(b, 1.0, COLOR_TEXT));
            if !ctrl.label.is_empty() {
                out.push(DrawCmd::Text {
                    x: b.x1 + TEXT_HEIGHT / 2.0,
                    y: (b.y1 + b.y2) / 2.0 + TEXT_HEIGHT / 2.0,
                    size: TEXT_HEIGHT,
                    color: COLOR_TEXT,
                    text: ctrl.label.clone(),
                });
            }
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn slider(x1: f64, y1: f64, x2: f64, y2: f64, min: f64, max: f64) -> (Ctrl, ParamStore, WidgetId) {
        let mut store = ParamStore::new();
        let widget = store.define_number(min);
        let ctrl = Ctrl::new(
            Bounds::new(x1, y1, x2, y2),
            CtrlKind::Slider { min, max, widget },
            "v",
        );
        (ctrl, store, widget)
    }

    #[test]
    fn test_slider_edges_are_exact() {
        let b = Bounds::new(10.0, 5.0, 210.0, 14.0);
        assert_eq!(slider_value_at(b, 0.0, 255.0, 11.0), 0.0);
        assert_eq!(slider_value_at(b, 0.0, 255.0, 209.0), 255.0);
        // Beyond the track clamps
        assert_eq!(slider_value_at(b, 0.0, 255.0, -50.0), 0.0);
        assert_eq!(slider_value_at(b, 0.0, 255.0, 1000.0), 255.0);
    }

    #[test]
    fn test_slider_value_monotonic_in_x() {
        let b = Bounds::new(10.0, 5.0, 210.0, 14.0);
        let mut last = f64::NEG_INFINITY;
        let mut x = 0.0;
        while x <= 220.0 {
            let v = slider_value_at(b, -3.0, 7.0, x);
            assert!(v >= last);
            last = v;
            x += 0.5;
        }
    }

    #[test]
    fn test_slider_midpoint_click() {
        // min=0 max=255: a click at the track's exact midpoint gives 127.5
        let b = Bounds::new(10.0, 5.0, 210.0, 14.0);
        let mid = (11.0 + 209.0) / 2.0;
        let v = slider_value_at(b, 0.0, 255.0, mid);
        assert!((v - 127.5).abs() < 1e-9);
    }

    #[test]
    fn test_slider_pos_round_trips_value() {
        let b = Bounds::new(0.0, 0.0, 100.0, 8.0);
        for &v in &[0.0, 12.5, 50.0, 99.0, 100.0] {
            let x = slider_pos(b, 0.0, 100.0, v);
            assert!((slider_value_at(b, 0.0, 100.0, x) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hit_test_first_match_wins() {
        let mut store = ParamStore::new();
        let w1 = store.define_flag(false);
        let w2 = store.define_flag(false);
        let mut reg = CtrlRegistry::new();
        let a = reg.add(Ctrl::new(
            Bounds::new(10.0, 10.0, 50.0, 50.0),
            CtrlKind::Checkbox { widget: w1 },
            "a",
        ));
        let _b = reg.add(Ctrl::new(
            Bounds::new(10.0, 10.0, 50.0, 50.0),
            CtrlKind::Checkbox { widget: w2 },
            "b",
        ));
        // Point in the overlap always resolves to the first registration.
        assert_eq!(reg.hit_test(Point::new(30.0, 30.0)), Some(a));
    }

    #[test]
    fn test_thin_slider_gets_tolerance_padding() {
        let (ctrl, _store, _w) = slider(10.0, 100.0, 210.0, 108.0, 0.0, 1.0);
        let mut reg = CtrlRegistry::new();
        let id = reg.add(ctrl);
        // 4px above the strip: inside the half-thickness padding
        assert_eq!(reg.hit_test(Point::new(100.0, 97.0)), Some(id));
        // Way outside
        assert_eq!(reg.hit_test(Point::new(100.0, 80.0)), None);
    }

    #[test]
    fn test_checkbox_has_no_padding() {
        let mut store = ParamStore::new();
        let w = store.define_flag(false);
        let mut reg = CtrlRegistry::new();
        reg.add(Ctrl::new(
            Bounds::new(10.0, 10.0, 24.0, 24.0),
            CtrlKind::Checkbox { widget: w },
            "c",
        ));
        assert_eq!(reg.hit_test(Point::new(9.0, 9.0)), None);
    }

    #[test]
    fn test_scale_grip_low_high_and_both() {
        let b = Bounds::new(0.0, 0.0, 200.0, 10.0);
        let (min, max) = (0.0, 100.0);
        let (low, high) = (20.0, 80.0);
        let p_lo = scale_handle_pos(b, min, max, low);
        let p_hi = scale_handle_pos(b, min, max, high);

        let g = scale_grip_at(b, min, max, low, high, p_lo).unwrap();
        assert_eq!(g.grip, Grip::Low);
        let g = scale_grip_at(b, min, max, low, high, p_hi).unwrap();
        assert_eq!(g.grip, Grip::High);

        let mid = Point::new((p_lo.x + p_hi.x) / 2.0, 5.0);
        let g = scale_grip_at(b, min, max, low, high, mid).unwrap();
        assert_eq!(g.grip, Grip::Both);
        assert!((g.span - 60.0).abs() < 1e-9);

        // Far off the track: nothing starts
        assert!(scale_grip_at(b, min, max, low, high, Point::new(100.0, 40.0)).is_none());
    }

    #[test]
    fn test_scale_vertical_orientation() {
        let b = Bounds::new(0.0, 0.0, 10.0, 200.0);
        let p = scale_handle_pos(b, 0.0, 1.0, 0.0);
        assert_eq!(p.x, 5.0);
        assert_eq!(p.y, 1.0);
    }

    #[test]
    fn test_enforce_min_gap_recenters() {
        // Handles collapsed mid-track: pair re-centers around the midpoint
        let (lo, hi) = enforce_min_gap(50.0, 52.0, 0.0, 100.0, 10.0);
        assert!((lo - 46.0).abs() < 1e-9);
        assert!((hi - 56.0).abs() < 1e-9);
    }

    #[test]
    fn test_enforce_min_gap_at_boundaries() {
        // Collapsed at the low end: pair shifts inward, gap intact
        let (lo, hi) = enforce_min_gap(0.0, 2.0, 0.0, 100.0, 10.0);
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 10.0);
        // Collapsed at the high end
        let (lo, hi) = enforce_min_gap(99.0, 100.0, 0.0, 100.0, 10.0);
        assert_eq!(hi, 100.0);
        assert_eq!(lo, 90.0);
        // Invariant after any input: low <= high and gap respected
        for &(a, b) in &[(-20.0, -10.0), (110.0, 120.0), (70.0, 30.0_f64)] {
            let (lo, hi) = enforce_min_gap(a, b, 0.0, 100.0, 10.0);
            assert!(lo <= hi);
            assert!(hi - lo >= 10.0 - 1e-9);
            assert!(lo >= 0.0 && hi <= 100.0);
        }
    }

    #[test]
    fn test_radio_item_hit() {
        let b = Bounds::new(10.0, 10.0, 150.0, 100.0);
        let c0 = radio_bullet_center(b, 0);
        let c2 = radio_bullet_center(b, 2);
        assert_eq!(radio_item_at(b, 4, c0), Some(0));
        assert_eq!(radio_item_at(b, 4, c2), Some(2));
        // On the label text, away from the bullets: no selection
        assert_eq!(radio_item_at(b, 4, Point::new(100.0, 20.0)), None);
        // Bullet of an item index past the end does not exist
        assert_eq!(radio_item_at(b, 2, c2), None);
    }

    #[test]
    fn test_chrome_derives_geometry_from_store() {
        let (ctrl, mut store, widget) = slider(10.0, 5.0, 210.0, 14.0, 0.0, 100.0);
        store.set_number(widget, 0.0);
        let at_min = chrome(&ctrl, &store);
        store.set_number(widget, 100.0);
        let at_max = chrome(&ctrl, &store);
        let cx = |cmds: &[DrawCmd]| {
            cmds.iter()
                .find_map(|c| match c {
                    DrawCmd::FillCircle { cx, .. } => Some(*cx),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(cx(&at_min), 11.0);
        assert_eq!(cx(&at_max), 209.0);
    }

    #[test]
    fn test_chrome_radio_marks_selection() {
        let mut store = ParamStore::new();
        let w = store.define_choice(1);
        let ctrl = Ctrl::new(
            Bounds::new(0.0, 0.0, 100.0, 80.0),
            CtrlKind::RadioGroup { items: 3, widget: w },
            "",
        );
        let cmds = chrome(&ctrl, &store);
        let fills = cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::FillCircle { .. }))
            .count();
        assert_eq!(fills, 1);
    }
}
