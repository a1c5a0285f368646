//! Per-demo wiring: which widgets exist, which canvas controls and native
//! inputs pair with them, which gesture the demo speaks, and how the flat
//! parameter vector is laid out for the engine.
//!
//! Everything here is declarative data handed to `DemoPage`; the behavior
//! all lives in the core crate. Native input element ids follow the
//! `{demo}-{param}` convention of the gallery markup.

use agg_gallery::{
    ActionId, Bounds, Ctrl, CtrlKind, CtrlRegistry, ParamStore, ParamVec, Point, Value, WidgetId,
    YAxis,
};

pub const NAMES: [&str; 6] = [
    "lion",
    "aa_demo",
    "bezier_div",
    "gradient_focal",
    "rasterizers",
    "circles",
];

/// The free-form gesture a demo binds beside its canvas controls.
#[derive(Debug, Clone, Copy)]
pub enum Gesture {
    None,
    /// Drag the nearest point of `Demo::points` (optionally the whole set).
    VertexDrag { threshold: f64, drag_all: bool },
    /// Primary-button drag writes angle/scale, secondary writes raw skew
    /// coordinates.
    RotateScale {
        angle: WidgetId,
        scale: WidgetId,
        skew_x: WidgetId,
        skew_y: WidgetId,
    },
    /// Primary-button drag moves a focal point, through the engine's
    /// screen-to-shape mapping.
    Focal { x: WidgetId, y: WidgetId },
}

/// Native input pairing for one widget.
pub enum PanelKind {
    Number(&'static str),
    Flag(&'static str),
    /// One radio input id per choice, in index order.
    Choice(Vec<&'static str>),
}

pub struct PanelBinding {
    pub widget: WidgetId,
    pub kind: PanelKind,
}

/// Everything the page needs to run one demo.
pub struct Demo {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Coordinate convention of the demo's own geometry (vertex lists,
    /// focal points). Canvas controls always live in top-left pointer
    /// space regardless.
    pub y_axis: YAxis,
    pub registry: CtrlRegistry,
    /// Widget order of the parameter vector; points are appended after.
    pub param_widgets: Vec<WidgetId>,
    pub points: Vec<Point>,
    /// Resolve vertex grabs through the engine's `pick_vertex` instead of
    /// local distance scanning.
    pub engine_pick: bool,
    pub pick_radius: f64,
    pub gesture: Gesture,
    pub panel: Vec<PanelBinding>,
    /// Button actions: widget defaults restored when the button fires.
    pub actions: Vec<Vec<(WidgetId, Value)>>,
    /// Per-frame advance for animated demos; checked against its own flag
    /// widget inside.
    pub tick: Option<fn(&mut ParamStore, &Demo, f64)>,
}

impl Demo {
    /// Rebuild the flat parameter vector from current state. Called fresh
    /// on every redraw; never cached, never diffed.
    pub fn build_params(&self, store: &ParamStore) -> Vec<f64> {
        let mut params = ParamVec::new();
        for &w in &self.param_widgets {
            params = match store.get(w) {
                Value::Number(v) => params.push(v),
                Value::Flag(v) => params.push_flag(v),
                Value::Choice(v) => params.push_choice(v),
            };
        }
        params.extend_points(&self.points).build()
    }
}

/// Construct the named demo's wiring, registering its widgets in `store`.
pub fn build(name: &str, store: &mut ParamStore) -> Option<Demo> {
    match name {
        "lion" => Some(lion(store)),
        "aa_demo" => Some(aa_demo(store)),
        "bezier_div" => Some(bezier_div(store)),
        "gradient_focal" => Some(gradient_focal(store)),
        "rasterizers" => Some(rasterizers(store)),
        "circles" => Some(circles(store)),
        _ => None,
    }
}

fn slider(b: Bounds, min: f64, max: f64, widget: WidgetId, label: &str) -> Ctrl {
    Ctrl::new(b, CtrlKind::Slider { min, max, widget }, label)
}

/// The classic lion: left drag rotates and scales around the canvas
/// center, right drag skews, a slider fades alpha.
/// Params: [angle, scale, skew_x, skew_y, alpha].
fn lion(store: &mut ParamStore) -> Demo {
    let angle = store.define_number(0.0);
    let scale = store.define_number(1.0);
    let skew_x = store.define_number(0.0);
    let skew_y = store.define_number(0.0);
    let alpha = store.define_number(255.0);

    let mut registry = CtrlRegistry::new();
    registry.add(slider(Bounds::new(5.0, 5.0, 150.0, 12.0), 0.0, 255.0, alpha, "alpha"));

    Demo {
        name: "lion",
        width: 512,
        height: 400,
        y_axis: YAxis::Down,
        registry,
        param_widgets: vec![angle, scale, skew_x, skew_y, alpha],
        points: Vec::new(),
        engine_pick: false,
        pick_radius: 0.0,
        gesture: Gesture::RotateScale {
            angle,
            scale,
            skew_x,
            skew_y,
        },
        panel: vec![PanelBinding {
            widget: alpha,
            kind: PanelKind::Number("lion-alpha"),
        }],
        actions: Vec::new(),
        tick: None,
    }
}

/// Anti-aliasing triangle: drag a corner, or the whole triangle from its
/// interior; a slider drives gamma. Params: [gamma, x0,y0, x1,y1, x2,y2].
fn aa_demo(store: &mut ParamStore) -> Demo {
    let gamma = store.define_number(1.0);

    let mut registry = CtrlRegistry::new();
    registry.add(slider(Bounds::new(120.0, 5.0, 400.0, 14.0), 0.1, 3.0, gamma, "gamma"));

    Demo {
        name: "aa_demo",
        width: 440,
        height: 330,
        y_axis: YAxis::Down,
        registry,
        param_widgets: vec![gamma],
        points: vec![
            Point::new(57.0, 60.0),
            Point::new(369.0, 170.0),
            Point::new(243.0, 310.0),
        ],
        engine_pick: false,
        pick_radius: 0.0,
        gesture: Gesture::VertexDrag {
            threshold: 10.0,
            drag_all: true,
        },
        panel: vec![PanelBinding {
            widget: gamma,
            kind: PanelKind::Number("aa_demo-gamma"),
        }],
        actions: Vec::new(),
        tick: None,
    }
}

/// Cubic curve subdivision: the four control points are engine-owned
/// geometry, so grabs resolve through `pick_vertex`.
/// Params: [width, show_points, x0,y0 .. x3,y3].
fn bezier_div(store: &mut ParamStore) -> Demo {
    let width = store.define_number(3.0);
    let show_points = store.define_flag(true);

    let mut registry = CtrlRegistry::new();
    registry.add(slider(Bounds::new(120.0, 5.0, 400.0, 14.0), 0.0, 50.0, width, "width"));
    registry.add(Ctrl::new(
        Bounds::new(10.0, 5.0, 24.0, 19.0),
        CtrlKind::Checkbox {
            widget: show_points,
        },
        "show points",
    ));

    Demo {
        name: "bezier_div",
        width: 500,
        height: 340,
        y_axis: YAxis::Down,
        registry,
        param_widgets: vec![width, show_points],
        points: vec![
            Point::new(170.0, 124.0),
            Point::new(13.0, 87.0),
            Point::new(488.0, 56.0),
            Point::new(26.0, 333.0),
        ],
        engine_pick: true,
        pick_radius: 10.0,
        gesture: Gesture::VertexDrag {
            threshold: 10.0,
            drag_all: false,
        },
        panel: vec![
            PanelBinding {
                widget: width,
                kind: PanelKind::Number("bezier_div-width"),
            },
            PanelBinding {
                widget: show_points,
                kind: PanelKind::Flag("bezier_div-points"),
            },
        ],
        actions: Vec::new(),
        tick: None,
    }
}

/// Radial gradient with a draggable focal point. The engine's device space
/// is bottom-left, so the gesture maps with a flipped y and the frame is
/// re-oriented before blitting. Params: [fx, fy, extended].
fn gradient_focal(store: &mut ParamStore) -> Demo {
    let fx = store.define_number(200.0);
    let fy = store.define_number(150.0);
    let extended = store.define_flag(false);

    let mut registry = CtrlRegistry::new();
    registry.add(Ctrl::new(
        Bounds::new(10.0, 10.0, 24.0, 24.0),
        CtrlKind::Checkbox { widget: extended },
        "extended radius",
    ));

    Demo {
        name: "gradient_focal",
        width: 400,
        height: 320,
        y_axis: YAxis::Up,
        registry,
        param_widgets: vec![fx, fy, extended],
        points: Vec::new(),
        engine_pick: false,
        pick_radius: 0.0,
        gesture: Gesture::Focal { x: fx, y: fy },
        panel: vec![
            PanelBinding {
                widget: fx,
                kind: PanelKind::Number("gradient_focal-x"),
            },
            PanelBinding {
                widget: fy,
                kind: PanelKind::Number("gradient_focal-y"),
            },
            PanelBinding {
                widget: extended,
                kind: PanelKind::Flag("gradient_focal-extended"),
            },
        ],
        actions: Vec::new(),
        tick: None,
    }
}

/// Scanline rasterizer comparison: radio group picks the method, a
/// dual-handle scale control bounds the coverage window, a checkbox fills,
/// and a button restores the defaults.
/// Params: [method, low, high, fill].
fn rasterizers(store: &mut ParamStore) -> Demo {
    let method = store.define_choice(0);
    let low = store.define_number(0.25);
    let high = store.define_number(0.75);
    let fill = store.define_flag(true);

    let mut registry = CtrlRegistry::new();
    registry.add(Ctrl::new(
        Bounds::new(10.0, 10.0, 130.0, 90.0),
        CtrlKind::RadioGroup {
            items: 4,
            widget: method,
        },
        "method",
    ));
    registry.add(Ctrl::new(
        Bounds::new(10.0, 104.0, 210.0, 112.0),
        CtrlKind::Scale {
            min: 0.0,
            max: 1.0,
            min_gap: 0.05,
            low,
            high,
        },
        "window",
    ));
    registry.add(Ctrl::new(
        Bounds::new(10.0, 126.0, 24.0, 140.0),
        CtrlKind::Checkbox { widget: fill },
        "fill",
    ));
    registry.add(Ctrl::new(
        Bounds::new(10.0, 150.0, 70.0, 170.0),
        CtrlKind::Button {
            action: ActionId(0),
        },
        "reset",
    ));

    Demo {
        name: "rasterizers",
        width: 500,
        height: 330,
        y_axis: YAxis::Down,
        registry,
        param_widgets: vec![method, low, high, fill],
        points: Vec::new(),
        engine_pick: false,
        pick_radius: 0.0,
        gesture: Gesture::None,
        panel: vec![
            PanelBinding {
                widget: method,
                kind: PanelKind::Choice(vec![
                    "rasterizers-m0",
                    "rasterizers-m1",
                    "rasterizers-m2",
                    "rasterizers-m3",
                ]),
            },
            PanelBinding {
                widget: low,
                kind: PanelKind::Number("rasterizers-low"),
            },
            PanelBinding {
                widget: high,
                kind: PanelKind::Number("rasterizers-high"),
            },
            PanelBinding {
                widget: fill,
                kind: PanelKind::Flag("rasterizers-fill"),
            },
        ],
        actions: vec![vec![
            (method, Value::Choice(0)),
            (low, Value::Number(0.25)),
            (high, Value::Number(0.75)),
            (fill, Value::Flag(true)),
        ]],
        tick: None,
    }
}

fn circles_tick(store: &mut ParamStore, demo: &Demo, dt_ms: f64) {
    // param_widgets = [size, animate, spin]
    let animate = demo.param_widgets[1];
    let spin = demo.param_widgets[2];
    if store.flag(animate) {
        store.set_number(spin, store.number(spin) + dt_ms * 0.06);
    }
}

/// Bouncing circles: a size slider plus an animate checkbox driving a
/// self-rescheduling frame callback. Params: [size, animate, spin].
fn circles(store: &mut ParamStore) -> Demo {
    let size = store.define_number(20.0);
    let animate = store.define_flag(false);
    let spin = store.define_number(0.0);

    let mut registry = CtrlRegistry::new();
    registry.add(slider(Bounds::new(120.0, 5.0, 400.0, 14.0), 1.0, 100.0, size, "size"));
    registry.add(Ctrl::new(
        Bounds::new(10.0, 5.0, 24.0, 19.0),
        CtrlKind::Checkbox { widget: animate },
        "animate",
    ));

    Demo {
        name: "circles",
        width: 440,
        height: 330,
        y_axis: YAxis::Down,
        registry,
        param_widgets: vec![size, animate, spin],
        points: Vec::new(),
        engine_pick: false,
        pick_radius: 0.0,
        gesture: Gesture::None,
        panel: vec![
            PanelBinding {
                widget: size,
                kind: PanelKind::Number("circles-size"),
            },
            PanelBinding {
                widget: animate,
                kind: PanelKind::Flag("circles-animate"),
            },
        ],
        actions: Vec::new(),
        tick: Some(circles_tick),
    }
}
