//! Boundary to the external rendering engine.
//!
//! The engine receives a demo name, target dimensions, and the flat
//! parameter vector, and returns a raw RGBA8 pixel buffer of at least
//! `width * height * 4` bytes. Everything the engine returns is treated as
//! untrusted: short buffers are rejected, excess bytes are truncated away,
//! and out-of-range vertex picks become "no hit". A render failure is
//! reported as a displayable status line and never propagates past this
//! module; the interaction layer stays alive no matter what the engine
//! does.

use thiserror::Error;
use tracing::warn;

use crate::coords::YAxis;

/// Failure from an engine entry point itself (trap, thrown exception,
/// missing export).
#[derive(Debug, Error)]
#[error("engine call failed: {0}")]
pub struct EngineError(pub String);

/// The external rendering engine, as consumed by this crate.
///
/// `pick_vertex` and `screen_to_shape` serve demos whose geometry lives
/// inside the engine: the first hit-tests a logical point against the named
/// demo's current shape (negative result means no hit), the second maps a
/// screen point into the shape's local coordinates.
pub trait Engine {
    fn render(
        &mut self,
        demo: &str,
        width: u32,
        height: u32,
        params: &[f64],
    ) -> Result<Vec<u8>, EngineError>;

    fn pick_vertex(
        &mut self,
        demo: &str,
        width: u32,
        height: u32,
        params: &[f64],
        x: f64,
        y: f64,
        radius: f64,
    ) -> Result<i32, EngineError>;

    fn screen_to_shape(
        &mut self,
        demo: &str,
        width: u32,
        height: u32,
        params: &[f64],
        x: f64,
        y: f64,
    ) -> Result<(f64, f64), EngineError>;
}

/// Why a render call produced no frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("engine returned {got} bytes, need at least {need}")]
    BufferTooSmall { got: usize, need: usize },
    #[error("canvas has no 2d drawing context")]
    NoContext,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A validated frame: exactly `width * height * 4` RGBA bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Reverse the row order in place.
    ///
    /// Canvas `putImageData` ignores the context transform, so a
    /// bottom-left-origin frame is flipped here before blitting instead of
    /// through a display transform.
    pub fn flip_vertical(&mut self) {
        let stride = self.width as usize * 4;
        let h = self.height as usize;
        for row in 0..h / 2 {
            let (top, rest) = self.pixels.split_at_mut((h - 1 - row) * stride);
            let a = &mut top[row * stride..row * stride + stride];
            let b = &mut rest[..stride];
            a.swap_with_slice(b);
        }
    }
}

/// Wraps engine calls with buffer validation and canvas bookkeeping.
pub struct RenderBridge {
    y_axis: YAxis,
    last_size: Option<(u32, u32)>,
}

impl RenderBridge {
    /// `y_axis` is the engine's coordinate convention; `YAxis::Up` tells
    /// the host to apply a vertical-flip display transform when painting.
    pub fn new(y_axis: YAxis) -> Self {
        Self {
            y_axis,
            last_size: None,
        }
    }

    pub fn y_axis(&self) -> YAxis {
        self.y_axis
    }

    /// True when the canvas backing store must be resized for these
    /// dimensions. Remembers the size, so an unchanged size reports false
    /// and the host skips the reallocation (resizing clears the canvas).
    pub fn size_changed(&mut self, width: u32, height: u32) -> bool {
        let changed = self.last_size != Some((width, height));
        self.last_size = Some((width, height));
        changed
    }

    /// Render one frame. The returned frame holds exactly
    /// `width * height * 4` bytes; engine excess is truncated.
    pub fn render(
        &mut self,
        engine: &mut dyn Engine,
        demo: &str,
        width: u32,
        height: u32,
        params: &[f64],
    ) -> Result<Frame, RenderError> {
        let mut pixels = engine.render(demo, width, height, params)?;
        let need = width as usize * height as usize * 4;
        if pixels.len() < need {
            warn!(demo, got = pixels.len(), need, "engine buffer too small");
            return Err(RenderError::BufferTooSmall {
                got: pixels.len(),
                need,
            });
        }
        pixels.truncate(need);
        Ok(Frame {
            width,
            height,
            pixels,
        })
    }

    /// Hit-test a logical point against engine-owned geometry. A failure or
    /// an index outside `0..num_points` is "no hit", not an error.
    #[allow(clippy::too_many_arguments)]
    pub fn pick_vertex(
        &mut self,
        engine: &mut dyn Engine,
        demo: &str,
        width: u32,
        height: u32,
        params: &[f64],
        x: f64,
        y: f64,
        radius: f64,
        num_points: usize,
    ) -> Option<usize> {
        match engine.pick_vertex(demo, width, height, params, x, y, radius) {
            Ok(idx) if idx >= 0 && (idx as usize) < num_points => Some(idx as usize),
            Ok(idx) if idx >= 0 => {
                warn!(demo, idx, num_points, "pick index out of range, treating as no hit");
                None
            }
            Ok(_) => None,
            Err(e) => {
                warn!(demo, error = %e, "pick failed, treating as no hit");
                None
            }
        }
    }
}

/// What the status line next to the canvas shows after a render attempt:
/// the frame time on success, the failure text in its place otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderStatus {
    Ok { millis: f64 },
    Failed(String),
}

impl RenderStatus {
    pub fn from_result<T>(result: &Result<T, RenderError>, millis: f64) -> Self {
        match result {
            Ok(_) => RenderStatus::Ok { millis },
            Err(e) => RenderStatus::Failed(e.to_string()),
        }
    }
}

impl std::fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderStatus::Ok { millis } => write!(f, "{millis:.1} ms"),
            RenderStatus::Failed(msg) => write!(f, "render failed: {msg}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Scriptable engine double.
    struct FakeEngine {
        buffer_len: usize,
        pick: i32,
        fail: bool,
    }

    impl FakeEngine {
        fn returning(buffer_len: usize) -> Self {
            Self {
                buffer_len,
                pick: -1,
                fail: false,
            }
        }
    }

    impl Engine for FakeEngine {
        fn render(
            &mut self,
            _demo: &str,
            _width: u32,
            _height: u32,
            _params: &[f64],
        ) -> Result<Vec<u8>, EngineError> {
            if self.fail {
                return Err(EngineError("boom".into()));
            }
            Ok(vec![7u8; self.buffer_len])
        }

        fn pick_vertex(
            &mut self,
            _demo: &str,
            _width: u32,
            _height: u32,
            _params: &[f64],
            _x: f64,
            _y: f64,
            _radius: f64,
        ) -> Result<i32, EngineError> {
            if self.fail {
                return Err(EngineError("boom".into()));
            }
            Ok(self.pick)
        }

        fn screen_to_shape(
            &mut self,
            _demo: &str,
            _width: u32,
            _height: u32,
            _params: &[f64],
            x: f64,
            y: f64,
        ) -> Result<(f64, f64), EngineError> {
            Ok((x, y))
        }
    }

    #[test]
    fn test_exact_buffer_passes() {
        let mut engine = FakeEngine::returning(8 * 6 * 4);
        let mut bridge = RenderBridge::new(YAxis::Up);
        let frame = bridge.render(&mut engine, "lion", 8, 6, &[]).unwrap();
        assert_eq!(frame.pixels.len(), 8 * 6 * 4);
    }

    #[test]
    fn test_one_byte_short_fails_without_painting() {
        // width*height*4 - 1 bytes must not produce a frame, and the
        // failure must be displayable, not a panic.
        let mut engine = FakeEngine::returning(8 * 6 * 4 - 1);
        let mut bridge = RenderBridge::new(YAxis::Up);
        let result = bridge.render(&mut engine, "lion", 8, 6, &[]);
        assert!(matches!(
            result,
            Err(RenderError::BufferTooSmall { got, need }) if got == need - 1
        ));
        let status = RenderStatus::from_result(&result, 0.0);
        assert!(status.to_string().starts_with("render failed:"));
    }

    #[test]
    fn test_excess_bytes_are_truncated() {
        let mut engine = FakeEngine::returning(8 * 6 * 4 + 100);
        let mut bridge = RenderBridge::new(YAxis::Up);
        let frame = bridge.render(&mut engine, "lion", 8, 6, &[]).unwrap();
        assert_eq!(frame.pixels.len(), 8 * 6 * 4);
    }

    #[test]
    fn test_engine_failure_is_caught() {
        let mut engine = FakeEngine::returning(0);
        engine.fail = true;
        let mut bridge = RenderBridge::new(YAxis::Up);
        let result = bridge.render(&mut engine, "lion", 8, 6, &[]);
        assert!(matches!(result, Err(RenderError::Engine(_))));
    }

    #[test]
    fn test_size_changed_only_on_change() {
        let mut bridge = RenderBridge::new(YAxis::Down);
        assert!(bridge.size_changed(400, 300));
        assert!(!bridge.size_changed(400, 300));
        assert!(bridge.size_changed(400, 301));
        assert!(!bridge.size_changed(400, 301));
    }

    #[test]
    fn test_pick_sanitizes_out_of_range() {
        let mut bridge = RenderBridge::new(YAxis::Up);
        let mut engine = FakeEngine::returning(0);
        engine.pick = 2;
        assert_eq!(
            bridge.pick_vertex(&mut engine, "d", 8, 6, &[], 0.0, 0.0, 5.0, 3),
            Some(2)
        );
        engine.pick = 3;
        assert_eq!(
            bridge.pick_vertex(&mut engine, "d", 8, 6, &[], 0.0, 0.0, 5.0, 3),
            None
        );
        engine.pick = -1;
        assert_eq!(
            bridge.pick_vertex(&mut engine, "d", 8, 6, &[], 0.0, 0.0, 5.0, 3),
            None
        );
        engine.fail = true;
        assert_eq!(
            bridge.pick_vertex(&mut engine, "d", 8, 6, &[], 0.0, 0.0, 5.0, 3),
            None
        );
    }

    #[test]
    fn test_status_formats_timing() {
        let status = RenderStatus::Ok { millis: 12.34 };
        assert_eq!(status.to_string(), "12.3 ms");
    }

    #[test]
    fn test_flip_vertical_reverses_rows() {
        // 2x3 frame, each row filled with its own row index
        let mut frame = Frame {
            width: 2,
            height: 3,
            pixels: (0u8..3).flat_map(|r| [r; 8]).collect(),
        };
        frame.flip_vertical();
        let rows: Vec<u8> = frame.pixels.chunks(8).map(|c| c[0]).collect();
        assert_eq!(rows, vec![2, 1, 0]);
        // Odd height leaves the middle row in place; flipping twice is identity
        frame.flip_vertical();
        let rows: Vec<u8> = frame.pixels.chunks(8).map(|c| c[0]).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }
}
