//! Rotate/scale drag gesture relative to the canvas center.
//!
//! A primary-button drag is read as an angle and a scale factor: the angle
//! of the pointer around the center, and its distance over a fixed
//! reference radius. A secondary-button drag, when the caller opts in,
//! reports raw logical coordinates for a caller-defined effect (the lion
//! demo derives skew from them). Both buttons are bitmask-tested per event,
//! so a simultaneous left+right drag yields both readings from one move.
//!
//! Hosts using the secondary button must suppress the native context menu
//! on the canvas, or the drag is cut short; the web crate does this in its
//! event bindings.

use crate::coords::{Point, BUTTONS_PRIMARY, BUTTONS_SECONDARY};

/// Pointer distance at which scale reads 1.0.
const REFERENCE_RADIUS: f64 = 100.0;

/// What one pointer event contributed to the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureUpdate {
    /// (angle in radians, scale factor), present while the primary button
    /// is held.
    pub rotate_scale: Option<(f64, f64)>,
    /// Raw logical pointer position, present while the secondary button is
    /// held and the secondary effect was requested.
    pub secondary: Option<Point>,
}

impl GestureUpdate {
    pub fn is_empty(&self) -> bool {
        self.rotate_scale.is_none() && self.secondary.is_none()
    }
}

/// Stateless interpreter for the rotate/scale gesture.
pub struct RotateScale {
    with_secondary: bool,
}

impl RotateScale {
    pub fn new() -> Self {
        Self {
            with_secondary: false,
        }
    }

    /// Also report secondary-button positions.
    pub fn with_secondary(mut self, yes: bool) -> Self {
        self.with_secondary = yes;
        self
    }

    /// Evaluate a pointer-down or pointer-move with `buttons` held at
    /// position `p`, relative to the canvas center.
    pub fn update(&self, p: Point, width: f64, height: f64, buttons: u16) -> GestureUpdate {
        let mut out = GestureUpdate::default();
        if buttons == 0 {
            return out;
        }
        let dx = p.x - width / 2.0;
        let dy = p.y - height / 2.0;
        if buttons & BUTTONS_PRIMARY != 0 {
            let angle = dy.atan2(dx);
            let scale = dx.hypot(dy) / REFERENCE_RADIUS;
            out.rotate_scale = Some((angle, scale));
        }
        if self.with_secondary && buttons & BUTTONS_SECONDARY != 0 {
            out.secondary = Some(p);
        }
        out
    }
}

impl Default for RotateScale {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
