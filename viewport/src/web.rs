//! Browser bindings: DOM-backed host implementations and the JS entry point.
//!
//! `DomSurface` sizes itself from a container element and moves a root
//! element with a CSS transform. `DomEventSource` turns mouse, wheel, touch,
//! and window-resize events into [`InputEvent`]s with container-relative
//! coordinates. `RafScheduler` drives frames with `requestAnimationFrame`.
//!
//! Every closure handed to the DOM is kept alive by the struct that
//! registered it and removed again in `unlisten` / `unbind`.

#[cfg(test)]
#[path = "web_test.rs"]
mod web_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlElement, MouseEvent, TouchEvent, TouchList, WheelEvent, Window,
};

use crate::camera::{Camera, Point, Viewport};
use crate::config::ViewportConfig;
use crate::consts::INTERACTABLE_HIT_RADIUS_PX;
use crate::controller::Controller;
use crate::engine::Cursor;
use crate::hit::hit_interactable;
use crate::host::{EventSink, EventSource, FrameHandle, FrameScheduler, FrameSink, HostError, Surface};
use crate::input::{Button, InputEvent, WheelDelta};
use crate::world::{AssetEntry, Interactables, WorldState, asset_manifest, default_interactables};

/// CSS `transform` for `camera`; pairs with `transform-origin: 0 0`.
#[must_use]
pub fn transform_css(camera: &Camera) -> String {
    format!("translate({}px, {}px) scale({})", camera.x, camera.y, camera.scale)
}

fn container_viewport(container: &HtmlElement) -> Viewport {
    Viewport::new(f64::from(container.client_width()), f64::from(container.client_height()))
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("viewport: failed to set {property}: {e:?}");
    }
}

// ── Surface ─────────────────────────────────────────────────────

pub struct DomSurface {
    container: HtmlElement,
    root: HtmlElement,
}

impl DomSurface {
    #[must_use]
    pub fn new(container: HtmlElement, root: HtmlElement) -> Self {
        set_style(&root, "transform-origin", "0 0");
        Self { container, root }
    }
}

impl Surface for DomSurface {
    fn viewport(&self) -> Viewport {
        container_viewport(&self.container)
    }

    fn apply_transform(&mut self, camera: &Camera) {
        set_style(&self.root, "transform", &transform_css(camera));
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        set_style(&self.container, "cursor", cursor.css());
    }
}

// ── Events ──────────────────────────────────────────────────────

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

pub struct DomEventSource {
    container: HtmlElement,
    window: Window,
    listeners: Vec<Listener>,
}

impl DomEventSource {
    /// # Errors
    ///
    /// Returns [`HostError::NoWindow`] outside a browser main thread.
    pub fn new(container: HtmlElement) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        Ok(Self { container, window, listeners: Vec::new() })
    }

    fn add(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), HostError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| HostError::Listen { event, reason: format!("{e:?}") })?;
        self.listeners.push(Listener { target: target.clone(), event, callback });
        Ok(())
    }

    fn add_mouse(
        &mut self,
        event: &'static str,
        to_input: fn(Point, &MouseEvent) -> InputEvent,
        sink: &EventSink,
    ) -> Result<(), HostError> {
        let (container, sink) = (self.container.clone(), Rc::clone(sink));
        let target = self.container.clone().unchecked_into::<EventTarget>();
        self.add(&target, event, true, move |e| {
            if let Some(mouse) = e.dyn_ref::<MouseEvent>() {
                sink(to_input(local_point(&container, mouse.client_x(), mouse.client_y()), mouse));
            }
        })
    }

    fn add_touch(
        &mut self,
        event: &'static str,
        to_input: fn(Vec<Point>) -> InputEvent,
        sink: &EventSink,
    ) -> Result<(), HostError> {
        let (container, sink) = (self.container.clone(), Rc::clone(sink));
        let target = self.container.clone().unchecked_into::<EventTarget>();
        self.add(&target, event, false, move |e| {
            if let Some(touch) = e.dyn_ref::<TouchEvent>() {
                touch.prevent_default();
                sink(to_input(touch_points(&container, &touch.touches())));
            }
        })
    }
}

fn local_point(container: &HtmlElement, client_x: i32, client_y: i32) -> Point {
    let rect = container.get_bounding_client_rect();
    Point::new(f64::from(client_x) - rect.left(), f64::from(client_y) - rect.top())
}

fn touch_points(container: &HtmlElement, list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| local_point(container, t.client_x(), t.client_y()))
        .collect()
}

impl EventSource for DomEventSource {
    fn listen(&mut self, sink: EventSink) -> Result<(), HostError> {
        self.add_mouse(
            "mousedown",
            |at, e| InputEvent::MouseDown { at, button: Button::from_dom(e.button()) },
            &sink,
        )?;
        self.add_mouse("mousemove", |at, _| InputEvent::MouseMove { at }, &sink)?;
        self.add_mouse("mouseup", |at, _| InputEvent::MouseUp { at }, &sink)?;
        self.add_mouse("mouseleave", |_, _| InputEvent::MouseLeave, &sink)?;

        let (container, wheel_sink) = (self.container.clone(), Rc::clone(&sink));
        let target = self.container.clone().unchecked_into::<EventTarget>();
        self.add(&target, "wheel", false, move |e| {
            if let Some(wheel) = e.dyn_ref::<WheelEvent>() {
                wheel.prevent_default();
                let at = local_point(&container, wheel.client_x(), wheel.client_y());
                let delta = WheelDelta { dx: wheel.delta_x(), dy: wheel.delta_y() };
                wheel_sink(InputEvent::Wheel { at, delta });
            }
        })?;

        self.add_touch("touchstart", |touches| InputEvent::TouchStart { touches }, &sink)?;
        self.add_touch("touchmove", |touches| InputEvent::TouchMove { touches }, &sink)?;
        self.add_touch("touchend", |touches| InputEvent::TouchEnd { touches }, &sink)?;
        self.add_touch("touchcancel", |touches| InputEvent::TouchEnd { touches }, &sink)?;

        let (container, resize_sink) = (self.container.clone(), Rc::clone(&sink));
        let window = self.window.clone().unchecked_into::<EventTarget>();
        self.add(&window, "resize", true, move |_| {
            let viewport = container_viewport(&container);
            resize_sink(InputEvent::Resize { viewport });
        })
    }

    fn unlisten(&mut self) {
        for listener in self.listeners.drain(..) {
            let callback = listener.callback.as_ref().unchecked_ref();
            if let Err(e) = listener.target.remove_event_listener_with_callback(listener.event, callback) {
                log::warn!("viewport: failed to remove {} listener: {e:?}", listener.event);
            }
        }
    }
}

impl Drop for DomEventSource {
    fn drop(&mut self) {
        self.unlisten();
    }
}

// ── Frames ──────────────────────────────────────────────────────

pub struct RafScheduler {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl RafScheduler {
    /// # Errors
    ///
    /// Returns [`HostError::NoWindow`] outside a browser main thread.
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        Ok(Self { window, callback: None })
    }
}

impl FrameScheduler for RafScheduler {
    fn bind(&mut self, sink: FrameSink) {
        self.callback = Some(Closure::wrap(Box::new(move |now_ms: f64| sink(now_ms)) as Box<dyn FnMut(f64)>));
    }

    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        let Some(callback) = self.callback.as_ref() else {
            return Err(HostError::Schedule("scheduler is not bound".into()));
        };
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| HostError::Schedule(format!("{e:?}")))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::warn!("viewport: failed to cancel frame {handle}: {e:?}");
        }
    }

    fn unbind(&mut self) {
        self.callback = None;
    }
}

// ── JS entry point ──────────────────────────────────────────────

type DomController = Controller<DomSurface, DomEventSource, RafScheduler>;

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn init_logging() {
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("viewport: console logger already installed");
    }
}

/// A mounted map view. Dropping it (or calling `detach`) stops all input.
#[wasm_bindgen]
pub struct MapView {
    controller: Rc<RefCell<DomController>>,
    interactables: Interactables,
}

/// Attach a viewport controller to `container`, transforming `root`.
///
/// `config_json` overrides any [`ViewportConfig`] field; `on_change` is called
/// as `on_change(mode, scale)` on every gesture-mode transition.
///
/// # Errors
///
/// Returns a string error for invalid config or a missing browser window.
#[wasm_bindgen(js_name = mountMapView)]
pub fn mount_map_view(
    container: HtmlElement,
    root: HtmlElement,
    config_json: Option<String>,
    on_change: Option<js_sys::Function>,
) -> Result<MapView, JsValue> {
    init_logging();
    let config = match config_json.as_deref() {
        Some(raw) => ViewportConfig::from_json(raw).map_err(to_js)?,
        None => ViewportConfig::default(),
    };
    let events = DomEventSource::new(container.clone()).map_err(to_js)?;
    let scheduler = RafScheduler::new().map_err(to_js)?;
    let surface = DomSurface::new(container, root);
    let mut controller = Controller::new(config, surface, events, scheduler).map_err(to_js)?;
    if let Some(function) = on_change {
        controller = controller.with_state_callback(move |camera, mode| {
            let (mode, scale) = (JsValue::from_str(mode.as_str()), JsValue::from_f64(camera.scale));
            if let Err(e) = function.call2(&JsValue::NULL, &mode, &scale) {
                log::warn!("viewport: state callback threw: {e:?}");
            }
        });
    }
    let controller = controller.mount().map_err(to_js)?;
    Ok(MapView { controller, interactables: default_interactables() })
}

impl MapView {
    fn with_controller(&self, f: impl FnOnce(&mut DomController)) {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => f(&mut controller),
            Err(_) => log::warn!("viewport: map view busy, call dropped"),
        }
    }

    /// Camera snapshot, or `None` when called from inside a controller callback.
    fn camera_snapshot(&self) -> Option<Camera> {
        match self.controller.try_borrow() {
            Ok(controller) => Some(controller.camera()),
            Err(_) => {
                log::warn!("viewport: map view busy, read dropped");
                None
            }
        }
    }
}

#[wasm_bindgen]
impl MapView {
    #[wasm_bindgen(js_name = zoomTo)]
    pub fn zoom_to(&self, scale: f64) {
        self.with_controller(|c| c.zoom_to(scale));
    }

    #[wasm_bindgen(js_name = zoomBy)]
    pub fn zoom_by(&self, delta: f64) {
        self.with_controller(|c| c.zoom_by(delta));
    }

    pub fn detach(&self) {
        self.with_controller(DomController::detach);
    }

    /// Current scale; `NaN` while the controller is busy.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.camera_snapshot().map_or(f64::NAN, |camera| camera.scale)
    }

    #[must_use]
    pub fn mode(&self) -> Option<String> {
        match self.controller.try_borrow() {
            Ok(controller) => Some(controller.mode().as_str().to_owned()),
            Err(_) => None,
        }
    }

    /// Id of the interactable under the container-relative point, if any.
    #[wasm_bindgen(js_name = interactableAt)]
    #[must_use]
    pub fn interactable_at(&self, x: f64, y: f64) -> Option<String> {
        let camera = self.camera_snapshot()?;
        let world = camera.screen_to_world(Point::new(x, y));
        hit_interactable(self.interactables.iter(), world, &camera, INTERACTABLE_HIT_RADIUS_PX)
            .map(|hit| hit.interactable.id.clone())
    }
}

#[derive(Serialize)]
struct MapData {
    state: WorldState,
    assets: Vec<AssetEntry>,
    interactables: Interactables,
}

/// Default world state, asset manifest, and interactables as one JSON object.
///
/// # Errors
///
/// Returns a string error if serialization fails.
#[wasm_bindgen(js_name = mapDataJson)]
pub fn map_data_json() -> Result<String, JsValue> {
    let data = MapData {
        state: WorldState::default(),
        assets: asset_manifest(),
        interactables: default_interactables(),
    };
    serde_json::to_string(&data).map_err(to_js)
}
