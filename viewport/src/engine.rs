//! Gesture state machine and animation stepping, independent of any host.
//!
//! [`EngineCore`] consumes [`InputEvent`]s and animation-frame timestamps and
//! answers with a list of [`Action`]s for the host to carry out (apply a
//! transform, change the cursor, request or cancel a frame). It never touches
//! the DOM, which keeps every gesture rule testable on the native target.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::animation::{self, AnimationDriver, Friction, LoopKind, Velocity};
use crate::camera::{Camera, Limits, Point, Viewport};
use crate::config::{ConfigError, ViewportConfig};
use crate::input::{Button, GestureMode, GestureState, InputEvent, WheelDelta, touch_distance, touch_midpoint};

/// Pointer cursor shown over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

/// Actions returned from input handlers for the host to process, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Camera changed; apply it to the surface.
    Transform(Camera),
    SetCursor(Cursor),
    /// Schedule one animation frame, replacing any pending one.
    RequestFrame,
    /// Drop the pending animation frame, if any.
    CancelFrame,
    ModeChanged(GestureMode),
}

/// Core controller state: all logic that doesn't depend on a host surface.
///
/// Separated from [`crate::controller::Controller`] so it can be tested
/// without browser dependencies.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub config: ViewportConfig,
    pub camera: Camera,
    pub gesture: GestureState,
    pub velocity: Velocity,
    pub animation: AnimationDriver,
    pub viewport: Viewport,
}

impl EngineCore {
    /// Build a core for `viewport`, with the initial scale already clamped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `config` fails validation.
    pub fn new(config: ViewportConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut core = Self {
            config,
            camera: Camera::at_scale(config.initial_scale),
            gesture: GestureState::Idle,
            velocity: Velocity::ZERO,
            animation: AnimationDriver::default(),
            viewport,
        };
        core.fit();
        Ok(core)
    }

    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits::new(&self.config, self.viewport)
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.gesture.mode()
    }

    /// Route one host event to its handler.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::MouseDown { at, button } => self.on_mouse_down(at, button),
            InputEvent::MouseMove { at } => self.on_mouse_move(at),
            InputEvent::MouseUp { .. } | InputEvent::MouseLeave => self.release_drag(),
            InputEvent::Wheel { at, delta } => self.on_wheel(at, delta),
            InputEvent::TouchStart { touches } => self.on_touch_start(&touches),
            InputEvent::TouchMove { touches } => self.on_touch_move(&touches),
            InputEvent::TouchEnd { touches } => self.on_touch_end(&touches),
            InputEvent::Resize { viewport } => self.on_resize(viewport),
        }
    }

    // --- Lifecycle ---

    /// First layout after attach: fit the camera and show the idle cursor.
    pub fn initialize(&mut self) -> Vec<Action> {
        self.fit();
        vec![Action::Transform(self.camera), Action::SetCursor(Cursor::Grab)]
    }

    pub fn on_resize(&mut self, viewport: Viewport) -> Vec<Action> {
        self.viewport = viewport;
        self.fit();
        log::debug!("viewport: resized to {}x{}, scale {}", viewport.width, viewport.height, self.camera.scale);
        vec![Action::Transform(self.camera)]
    }

    /// Pull scale and target into the current range and re-clamp translation.
    fn fit(&mut self) {
        let limits = self.limits();
        self.camera.scale = limits.clamp_scale(self.camera.scale);
        self.camera.target_scale = limits.clamp_scale(self.camera.target_scale);
        self.camera.constrain(&limits);
    }

    // --- Mouse ---

    pub fn on_mouse_down(&mut self, at: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.begin_drag(at)
    }

    pub fn on_mouse_move(&mut self, at: Point) -> Vec<Action> {
        let GestureState::Dragging { last_screen } = self.gesture else {
            return Vec::new();
        };
        let (dx, dy) = (at.x - last_screen.x, at.y - last_screen.y);
        self.camera.pan_by(dx, dy, &self.limits());
        self.velocity = Velocity::from_drag(dx, dy, self.config.drag_velocity_gain, self.config.max_velocity);
        self.gesture = GestureState::Dragging { last_screen: at };
        vec![Action::Transform(self.camera)]
    }

    pub fn on_mouse_up(&mut self) -> Vec<Action> {
        self.release_drag()
    }

    pub fn on_mouse_leave(&mut self) -> Vec<Action> {
        self.release_drag()
    }

    fn begin_drag(&mut self, at: Point) -> Vec<Action> {
        if self.gesture == GestureState::ZoomSettling {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.stop_loop(&mut actions);
        self.velocity = Velocity::ZERO;
        self.set_gesture(GestureState::Dragging { last_screen: at }, &mut actions);
        actions.push(Action::SetCursor(Cursor::Grabbing));
        actions
    }

    fn release_drag(&mut self) -> Vec<Action> {
        if !matches!(self.gesture, GestureState::Dragging { .. }) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.set_gesture(GestureState::Coasting, &mut actions);
        actions.push(Action::SetCursor(Cursor::Grab));
        self.start_loop(LoopKind::Inertia, &mut actions);
        actions
    }

    // --- Wheel ---

    /// Zoom about the pointer. Takes effect immediately; outside a held
    /// gesture it also hands over to the zoom-settling loop.
    pub fn on_wheel(&mut self, at: Point, delta: WheelDelta) -> Vec<Action> {
        let step = -delta.dy * self.config.zoom_speed;
        if !self.camera.zoom_about(at, step, &self.limits()) {
            return Vec::new();
        }
        let mut actions = vec![Action::Transform(self.camera)];
        if self.gesture.is_pointer_active() {
            return actions;
        }
        self.velocity = Velocity::ZERO;
        self.set_gesture(GestureState::ZoomSettling, &mut actions);
        if self.animation.running() != Some(LoopKind::ZoomSettle) {
            self.start_loop(LoopKind::ZoomSettle, &mut actions);
        }
        actions
    }

    // --- Touch ---

    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        match touches {
            [_, _] => self.begin_pinch(touches),
            [only] if !matches!(self.gesture, GestureState::Pinching { .. }) => self.begin_drag(*only),
            _ => Vec::new(),
        }
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        match (self.gesture, touches) {
            (GestureState::Pinching { last_distance, .. }, [_, _]) => {
                let (Some(distance), Some(center)) = (touch_distance(touches), touch_midpoint(touches)) else {
                    return Vec::new();
                };
                let delta = (distance - last_distance) * self.config.pinch_zoom_factor;
                let changed = self.camera.zoom_about(center, delta, &self.limits());
                self.gesture = GestureState::Pinching { last_distance: distance, last_center: center };
                if changed { vec![Action::Transform(self.camera)] } else { Vec::new() }
            }
            (GestureState::Dragging { .. }, [only]) => self.on_mouse_move(*only),
            _ => Vec::new(),
        }
    }

    /// `remaining` lists the touches still on the surface.
    pub fn on_touch_end(&mut self, remaining: &[Point]) -> Vec<Action> {
        match self.gesture {
            GestureState::Pinching { .. } if remaining.len() < 2 => {
                let mut actions = Vec::new();
                self.set_gesture(GestureState::Idle, &mut actions);
                actions
            }
            GestureState::Dragging { .. } if remaining.is_empty() => self.release_drag(),
            _ => Vec::new(),
        }
    }

    fn begin_pinch(&mut self, touches: &[Point]) -> Vec<Action> {
        let (Some(distance), Some(center)) = (touch_distance(touches), touch_midpoint(touches)) else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        self.stop_loop(&mut actions);
        self.velocity = Velocity::ZERO;
        self.set_gesture(GestureState::Pinching { last_distance: distance, last_center: center }, &mut actions);
        actions
    }

    // --- Programmatic zoom ---

    /// Ease toward `scale` (clamped) about the camera's own origin. Ignored
    /// while a pointer gesture holds the camera.
    pub fn zoom_to(&mut self, scale: f64) -> Vec<Action> {
        if self.gesture.is_pointer_active() || !scale.is_finite() {
            return Vec::new();
        }
        self.camera.target_scale = self.limits().clamp_scale(scale);
        self.velocity = Velocity::ZERO;
        let mut actions = Vec::new();
        self.set_gesture(GestureState::ZoomSettling, &mut actions);
        if self.animation.running() != Some(LoopKind::ZoomSettle) {
            self.start_loop(LoopKind::ZoomSettle, &mut actions);
        }
        actions
    }

    /// Ease by `delta` relative to the current target.
    pub fn zoom_by(&mut self, delta: f64) -> Vec<Action> {
        self.zoom_to(self.camera.target_scale + delta)
    }

    // --- Animation ---

    /// Advance the running loop. A frame with no running loop is a no-op.
    pub fn on_frame(&mut self, now_ms: f64) -> Vec<Action> {
        let Some(kind) = self.animation.running() else {
            return Vec::new();
        };
        let steps = self.animation.frame_steps(now_ms, self.config.frame_ms, self.config.max_frame_steps);
        let limits = self.limits();
        let done = match kind {
            LoopKind::ZoomSettle => animation::settle_zoom(
                &mut self.camera,
                &limits,
                self.config.zoom_smoothing,
                self.config.zoom_epsilon,
                steps,
            ),
            LoopKind::Inertia => {
                let friction = Friction { factor: self.config.friction, min_velocity: self.config.min_velocity };
                animation::coast(&mut self.camera, &mut self.velocity, &limits, friction, steps)
            }
        };

        let mut actions = vec![Action::Transform(self.camera)];
        if done {
            self.animation.stop();
            log::debug!("animation: {kind:?} loop converged");
            if !self.gesture.is_pointer_active() {
                self.set_gesture(GestureState::Idle, &mut actions);
            }
        } else {
            actions.push(Action::RequestFrame);
        }
        actions
    }

    /// Jump straight to rest: scale at target, no velocity, no loop. Used
    /// when the host cannot schedule frames.
    pub fn settle_now(&mut self) -> Vec<Action> {
        self.animation.stop();
        self.velocity = Velocity::ZERO;
        self.camera.rescale(self.camera.target_scale, &self.limits());
        let mut actions = vec![Action::Transform(self.camera)];
        if !self.gesture.is_pointer_active() {
            self.set_gesture(GestureState::Idle, &mut actions);
        }
        actions
    }

    /// Settle to rest and end any pointer gesture, so nothing carries over
    /// to a later attach.
    pub fn teardown(&mut self) -> Vec<Action> {
        let mut actions = self.settle_now();
        if self.gesture.is_pointer_active() {
            self.set_gesture(GestureState::Idle, &mut actions);
            actions.push(Action::SetCursor(Cursor::Grab));
        }
        actions
    }

    fn start_loop(&mut self, kind: LoopKind, actions: &mut Vec<Action>) {
        self.animation.start(kind);
        actions.push(Action::RequestFrame);
    }

    /// Stop any running loop. An interrupted zoom keeps the scale it reached.
    fn stop_loop(&mut self, actions: &mut Vec<Action>) {
        let Some(kind) = self.animation.running() else {
            return;
        };
        if kind == LoopKind::ZoomSettle {
            self.camera.target_scale = self.camera.scale;
        }
        self.animation.stop();
        actions.push(Action::CancelFrame);
    }

    fn set_gesture(&mut self, next: GestureState, actions: &mut Vec<Action>) {
        let (from, to) = (self.gesture.mode(), next.mode());
        self.gesture = next;
        if from != to {
            log::debug!("gesture: {} -> {}", from.as_str(), to.as_str());
            actions.push(Action::ModeChanged(to));
        }
    }
}
