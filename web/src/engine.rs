//! `Engine` implementation over function handles to the external rendering
//! module.
//!
//! The rendering engine lives in a separate wasm module; the page hands its
//! exported functions (`render_demo`, `pick_vertex`, `screen_to_shape`) to
//! [`JsEngine`] at initialization. Pick and shape-mapping entry points are
//! optional; demos that need them simply get "no hit" when absent.

use agg_gallery::{Engine, EngineError};
use js_sys::{Array, Float64Array, Function, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};

pub struct JsEngine {
    render: Function,
    pick_vertex: Option<Function>,
    screen_to_shape: Option<Function>,
}

fn js_err(v: JsValue) -> EngineError {
    EngineError(v.as_string().unwrap_or_else(|| format!("{v:?}")))
}

fn engine_args(demo: &str, width: u32, height: u32, params: &[f64]) -> Array {
    let args = Array::new();
    args.push(&JsValue::from_str(demo));
    args.push(&JsValue::from_f64(width as f64));
    args.push(&JsValue::from_f64(height as f64));
    args.push(&Float64Array::from(params).into());
    args
}

impl JsEngine {
    pub fn new(render: Function, pick_vertex: Option<Function>, screen_to_shape: Option<Function>) -> Self {
        Self {
            render,
            pick_vertex,
            screen_to_shape,
        }
    }
}

impl Engine for JsEngine {
    fn render(
        &mut self,
        demo: &str,
        width: u32,
        height: u32,
        params: &[f64],
    ) -> Result<Vec<u8>, EngineError> {
        let args = engine_args(demo, width, height, params);
        let out = self.render.apply(&JsValue::NULL, &args).map_err(js_err)?;
        let bytes: Uint8Array = out
            .dyn_into()
            .map_err(|_| EngineError("render did not return a byte buffer".into()))?;
        Ok(bytes.to_vec())
    }

    fn pick_vertex(
        &mut self,
        demo: &str,
        width: u32,
        height: u32,
        params: &[f64],
        x: f64,
        y: f64,
        radius: f64,
    ) -> Result<i32, EngineError> {
        let Some(f) = self.pick_vertex.as_ref() else {
            return Ok(-1);
        };
        let args = engine_args(demo, width, height, params);
        args.push(&JsValue::from_f64(x));
        args.push(&JsValue::from_f64(y));
        args.push(&JsValue::from_f64(radius));
        let out = f.apply(&JsValue::NULL, &args).map_err(js_err)?;
        out.as_f64()
            .map(|v| v as i32)
            .ok_or_else(|| EngineError("pick_vertex did not return a number".into()))
    }

    fn screen_to_shape(
        &mut self,
        demo: &str,
        width: u32,
        height: u32,
        params: &[f64],
        x: f64,
        y: f64,
    ) -> Result<(f64, f64), EngineError> {
        let Some(f) = self.screen_to_shape.as_ref() else {
            return Ok((x, y));
        };
        let args = engine_args(demo, width, height, params);
        args.push(&JsValue::from_f64(x));
        args.push(&JsValue::from_f64(y));
        let out = f.apply(&JsValue::NULL, &args).map_err(js_err)?;
        let pair: Float64Array = out
            .dyn_into()
            .map_err(|_| EngineError("screen_to_shape did not return a pair".into()))?;
        if pair.length() < 2 {
            return Err(EngineError("screen_to_shape returned too few values".into()));
        }
        Ok((pair.get_index(0), pair.get_index(1)))
    }
}
