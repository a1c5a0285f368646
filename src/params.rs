//! Flat parameter vector assembly.
//!
//! The rendering engine takes its input as an ordered sequence of numbers.
//! Demos rebuild the vector from scratch on every redraw from the current
//! store and gesture state; it has no identity beyond its current value and
//! is never diffed.

use crate::coords::Point;

/// Builder for one render call's parameter vector.
#[derive(Debug, Clone, Default)]
pub struct ParamVec {
    values: Vec<f64>,
}

impl ParamVec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, v: f64) -> Self {
        self.values.push(v);
        self
    }

    /// Booleans travel as 0.0 / 1.0.
    pub fn push_flag(mut self, v: bool) -> Self {
        self.values.push(if v { 1.0 } else { 0.0 });
        self
    }

    /// Choice indices travel as their numeric value.
    pub fn push_choice(mut self, v: usize) -> Self {
        self.values.push(v as f64);
        self
    }

    /// Append x,y pairs for a vertex list.
    pub fn extend_points(mut self, points: &[Point]) -> Self {
        for p in points {
            self.values.push(p.x);
            self.values.push(p.y);
        }
        self
    }

    pub fn build(self) -> Vec<f64> {
        self.values
    }
}

// ============================================================================
// Tests
// ============================================================================
