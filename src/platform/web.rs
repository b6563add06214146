//! Browser binding: canvas surface, RAF ticks and window listeners

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, Window};

use crate::color::Rgba;
use crate::engine::pointer::PointerSignal;
use crate::engine::render_loop::{TickId, TickSource};
use crate::engine::surface::{BlendMode, GradientStop, Surface};
use crate::error::MountError;
use crate::scene::{SceneHandle, SceneKind, mount, unmount};
use crate::settings::Settings;

/// [`Surface`] over a `<canvas>` 2D context
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, MountError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| MountError::ResourceUnavailable("canvas has no 2d context".to_string()))?;
        Ok(Self { canvas, ctx })
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }
}

impl Surface for Canvas2dSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, size: Vec2) {
        self.canvas.set_width(size.x.max(0.0).round() as u32);
        self.canvas.set_height(size.y.max(0.0).round() as u32);
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        let op = match mode {
            BlendMode::Alpha => "source-over",
            BlendMode::Additive => "lighter",
        };
        let _ = self.ctx.set_global_composite_operation(op);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.stroke();
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: Rgba) {
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x.max(0.0) as f64,
            radii.y.max(0.0) as f64,
            0.0,
            0.0,
            TAU,
        );
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.stroke();
    }

    fn fill_radial_gradient(&mut self, center: Vec2, inner: f32, outer: f32, stops: &[GradientStop]) {
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(x, y, inner.max(0.0) as f64, x, y, outer.max(0.0) as f64)
        else {
            return;
        };
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css());
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle_path(center, outer);
        self.ctx.fill();
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// [`TickSource`] over `requestAnimationFrame` / `cancelAnimationFrame`
pub struct RafTicker {
    window: Window,
    callback: Rc<FrameCallback>,
    /// Id of the most recent request, read back by the callback
    last: Rc<Cell<i32>>,
}

impl TickSource for RafTicker {
    fn schedule(&mut self) -> TickId {
        let id = self
            .window
            .request_animation_frame((*self.callback).as_ref().unchecked_ref())
            .unwrap_or_default();
        self.last.set(id);
        TickId(id as u32 as u64)
    }

    fn cancel(&mut self, id: TickId) {
        let _ = self.window.cancel_animation_frame(id.0 as u32 as i32);
    }
}

type WebHandle = SceneHandle<Canvas2dSurface, RafTicker>;
type Listener = Closure<dyn FnMut(Event)>;

fn viewport(window: &Window) -> Vec2 {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Vec2::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// A scene running on a page canvas. Dropping it unmounts the scene and
/// removes its window listeners.
#[wasm_bindgen]
pub struct WebScene {
    window: Window,
    handle: Rc<RefCell<Option<WebHandle>>>,
    listeners: Vec<(&'static str, Listener)>,
}

#[wasm_bindgen]
impl WebScene {
    pub fn resize(&self, width: f32, height: f32) {
        if let Some(handle) = self.handle.borrow_mut().as_mut() {
            handle.resize(width, height);
        }
    }

    pub fn start(&self) -> bool {
        self.handle.borrow_mut().as_mut().is_some_and(|h| h.start())
    }

    pub fn stop(&self) -> bool {
        self.handle.borrow_mut().as_mut().is_some_and(|h| h.stop())
    }

    /// Frames drawn so far
    pub fn frame(&self) -> f64 {
        self.handle.borrow().as_ref().map_or(0.0, |h| h.frame() as f64)
    }

    pub fn population(&self) -> u32 {
        self.handle.borrow().as_ref().map_or(0, |h| h.population() as u32)
    }
}

impl Drop for WebScene {
    fn drop(&mut self) {
        for (event, listener) in self.listeners.drain(..) {
            let _ = self
                .window
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
        }
        if let Some(handle) = self.handle.borrow_mut().take() {
            unmount(handle);
        }
    }
}

/// Mount the `kind` preset (e.g. "starfield") on the canvas with id `canvas_id`
#[wasm_bindgen]
pub fn mount_scene(canvas_id: &str, kind: &str) -> Result<WebScene, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let kind = SceneKind::from_str(kind).ok_or_else(|| JsValue::from_str(&format!("unknown scene '{kind}'")))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(|| JsValue::from_str(&format!("no canvas '{canvas_id}'")))?;

    let settings = Settings::load();
    let config = kind.config(viewport(&window));
    canvas.set_width(config.width.round() as u32);
    canvas.set_height(config.height.round() as u32);
    let surface = Canvas2dSurface::new(canvas.clone()).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let slot: Rc<RefCell<Option<WebHandle>>> = Rc::new(RefCell::new(None));
    let last = Rc::new(Cell::new(0));
    let callback = {
        let slot = Rc::downgrade(&slot);
        let last = Rc::clone(&last);
        Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            if let Some(handle) = slot.borrow_mut().as_mut() {
                handle.on_tick(TickId(last.get() as u32 as u64));
            }
        })
    };
    let ticker = RafTicker {
        window: window.clone(),
        callback: Rc::new(callback),
        last,
    };

    let pointer = PointerSignal::new();
    let handle = mount(surface, &config, &settings, pointer.clone(), ticker).map_err(|e| {
        log::warn!("Scene '{}' failed to mount: {e}", kind.as_str());
        JsValue::from_str(&e.to_string())
    })?;
    *slot.borrow_mut() = Some(handle);

    let mut listeners: Vec<(&'static str, Listener)> = Vec::new();
    {
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let rect = canvas.get_bounding_client_rect();
                pointer.set_from_rect(
                    Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32),
                    Vec2::new(rect.left() as f32, rect.top() as f32),
                    Vec2::new(rect.width() as f32, rect.height() as f32),
                );
            }
        });
        listeners.push(("mousemove", listener));
    }
    if kind.default_size().is_none() {
        let slot = Rc::downgrade(&slot);
        let window_for_size = window.clone();
        let fixed_height = (kind == SceneKind::Finale).then_some(config.height);
        let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let size = viewport(&window_for_size);
            if let Some(slot) = slot.upgrade()
                && let Some(handle) = slot.borrow_mut().as_mut()
            {
                handle.resize(size.x, fixed_height.unwrap_or(size.y));
            }
        });
        listeners.push(("resize", listener));
    }
    for (event, listener) in &listeners {
        let _ = window.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
    }

    Ok(WebScene {
        window,
        handle: slot,
        listeners,
    })
}

/// Stop a scene and release its listeners
#[wasm_bindgen]
pub fn unmount_scene(scene: WebScene) {
    drop(scene);
}

/// Persist settings given as JSON; they apply to scenes mounted afterwards
#[wasm_bindgen]
pub fn save_settings(json: &str) -> Result<bool, JsValue> {
    let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(settings.save())
}

/// Current stored settings as JSON
#[wasm_bindgen]
pub fn load_settings() -> Result<String, JsValue> {
    Settings::load().to_json().map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Stellar Canvas loaded");
}
