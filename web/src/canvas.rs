//! Canvas painting: frame blit, chrome replay, status line.

use agg_gallery::{DrawCmd, Frame, Rgba8, YAxis};
use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, ImageData};

fn css(color: Rgba8) -> String {
    format!(
        "rgba({},{},{},{})",
        color.r,
        color.g,
        color.b,
        color.a as f64 / 255.0
    )
}

/// Resize the backing store only when the dimensions differ (resizing
/// clears the canvas and costs a reallocation).
pub fn ensure_size(canvas: &HtmlCanvasElement, width: u32, height: u32, changed: bool) {
    if changed {
        canvas.set_width(width);
        canvas.set_height(height);
    }
}

/// Blit a validated frame. The frame was already row-flipped by the caller
/// when the engine convention is bottom-left.
pub fn paint_frame(ctx: &CanvasRenderingContext2d, frame: &Frame) -> Result<(), JsValue> {
    let image = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(&frame.pixels),
        frame.width,
        frame.height,
    )?;
    ctx.put_image_data(&image, 0.0, 0.0)
}

/// Flip a frame into display orientation when the engine is bottom-left.
pub fn orient(frame: &mut Frame, y_axis: YAxis) {
    if y_axis == YAxis::Up {
        frame.flip_vertical();
    }
}

/// Replay the core's chrome display list on top of the blitted frame.
pub fn replay(ctx: &CanvasRenderingContext2d, cmds: &[DrawCmd]) {
    use std::f64::consts::TAU;
    for cmd in cmds {
        match cmd {
            DrawCmd::FillRect { x, y, w, h, color } => {
                ctx.set_fill_style_str(&css(*color));
                ctx.fill_rect(*x, *y, *w, *h);
            }
            DrawCmd::StrokeRect {
                x,
                y,
                w,
                h,
                width,
                color,
            } => {
                ctx.set_line_width(*width);
                ctx.set_stroke_style_str(&css(*color));
                ctx.stroke_rect(*x, *y, *w, *h);
            }
            DrawCmd::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                ctx.begin_path();
                ctx.move_to(*x1, *y1);
                ctx.line_to(*x2, *y2);
                ctx.set_line_width(*width);
                ctx.set_stroke_style_str(&css(*color));
                ctx.stroke();
            }
            DrawCmd::FillCircle { cx, cy, r, color } => {
                ctx.begin_path();
                let _ = ctx.arc(*cx, *cy, *r, 0.0, TAU);
                ctx.set_fill_style_str(&css(*color));
                ctx.fill();
            }
            DrawCmd::StrokeCircle {
                cx,
                cy,
                r,
                width,
                color,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(*cx, *cy, *r, 0.0, TAU);
                ctx.set_line_width(*width);
                ctx.set_stroke_style_str(&css(*color));
                ctx.stroke();
            }
            DrawCmd::Text {
                x,
                y,
                size,
                color,
                text,
            } => {
                ctx.set_font(&format!("{size}px sans-serif"));
                ctx.set_fill_style_str(&css(*color));
                let _ = ctx.fill_text(text, *x, *y);
            }
        }
    }
}

/// Write the timing readout or the render-failure text, in the same place.
pub fn show_status(status_line: Option<&Element>, text: &str) {
    if let Some(el) = status_line {
        el.set_text_content(Some(text));
    }
}
