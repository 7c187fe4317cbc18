//! Binds an [`EngineCore`] to a host surface, event source, and frame
//! scheduler.
//!
//! DESIGN
//! ======
//! The controller is an owned value with an explicit lifecycle: build it with
//! [`Controller::new`], [`Controller::mount`] it (which registers listeners
//! and applies the first transform), and [`Controller::detach`] it to remove
//! every registration. Host callbacks hold a `Weak` reference, so dropping the
//! last `Rc` ends delivery without a teardown step.
//!
//! The controller owns at most one pending frame handle. Every frame request
//! first cancels the previous handle, so no two loops can ever be scheduled.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::camera::Camera;
use crate::config::{ConfigError, ViewportConfig};
use crate::engine::{Action, EngineCore};
use crate::host::{EventSink, EventSource, FrameHandle, FrameScheduler, FrameSink, HostError, Surface};
use crate::input::{GestureMode, InputEvent};

/// Invoked on every gesture-mode transition with the camera at that moment.
pub type StateCallback = Box<dyn FnMut(&Camera, GestureMode)>;

pub struct Controller<S, E, F> {
    core: EngineCore,
    surface: S,
    events: E,
    scheduler: F,
    pending_frame: Option<FrameHandle>,
    on_change: Option<StateCallback>,
    attached: bool,
}

impl<S: Surface, E: EventSource, F: FrameScheduler> Controller<S, E, F> {
    /// Build a detached controller sized to the surface's current viewport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `config` fails validation.
    pub fn new(config: ViewportConfig, surface: S, events: E, scheduler: F) -> Result<Self, ConfigError> {
        let core = EngineCore::new(config, surface.viewport())?;
        Ok(Self { core, surface, events, scheduler, pending_frame: None, on_change: None, attached: false })
    }

    #[must_use]
    pub fn with_state_callback(mut self, callback: impl FnMut(&Camera, GestureMode) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.core.mode()
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    #[must_use]
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Deliver one input event. The viewport is re-read first; a size change
    /// is handled as a resize before the event itself.
    pub fn dispatch(&mut self, event: InputEvent) {
        self.sync_viewport();
        let actions = self.core.handle(event);
        self.apply(actions);
    }

    /// Deliver one animation frame.
    pub fn frame(&mut self, now_ms: f64) {
        self.pending_frame = None;
        if !self.attached {
            return;
        }
        self.sync_viewport();
        let actions = self.core.on_frame(now_ms);
        self.apply(actions);
    }

    pub fn zoom_to(&mut self, scale: f64) {
        let actions = self.core.zoom_to(scale);
        self.apply(actions);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        let actions = self.core.zoom_by(delta);
        self.apply(actions);
    }

    /// Settle to rest, drop any gesture in progress, cancel the pending
    /// frame, and remove every listener.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.cancel_pending();
        let actions = self.core.teardown();
        self.apply(actions);
        self.events.unlisten();
        self.scheduler.unbind();
        self.attached = false;
        log::info!("viewport: detached");
    }

    fn sync_viewport(&mut self) {
        let viewport = self.surface.viewport();
        if viewport != self.core.viewport {
            let actions = self.core.on_resize(viewport);
            self.apply(actions);
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Transform(camera) => self.surface.apply_transform(&camera),
                Action::SetCursor(cursor) => self.surface.set_cursor(cursor),
                Action::CancelFrame => self.cancel_pending(),
                Action::RequestFrame => self.request_frame(),
                Action::ModeChanged(mode) => {
                    if let Some(callback) = self.on_change.as_mut() {
                        callback(&self.core.camera, mode);
                    }
                }
            }
        }
    }

    fn request_frame(&mut self) {
        self.cancel_pending();
        match self.scheduler.request_frame() {
            Ok(handle) => self.pending_frame = Some(handle),
            Err(e) => {
                log::warn!("viewport: {e}; settling without animation");
                let actions = self.core.settle_now();
                self.apply(actions);
            }
        }
    }
}

impl<S, E, F> Controller<S, E, F>
where
    S: Surface + 'static,
    E: EventSource + 'static,
    F: FrameScheduler + 'static,
{
    /// Wrap the controller for shared ownership and attach it.
    ///
    /// # Errors
    ///
    /// Propagates the [`HostError`] from [`Controller::attach`].
    pub fn mount(self) -> Result<Rc<RefCell<Self>>, HostError> {
        let this = Rc::new(RefCell::new(self));
        Self::attach(&this)?;
        Ok(this)
    }

    /// Register listeners and the frame sink, then apply the initial layout.
    ///
    /// # Errors
    ///
    /// Returns the event source's [`HostError`]; on failure nothing stays
    /// registered.
    pub fn attach(this: &Rc<RefCell<Self>>) -> Result<(), HostError> {
        let events = event_sink(Rc::downgrade(this));
        let frames = frame_sink(Rc::downgrade(this));

        let mut ctrl = this.borrow_mut();
        if ctrl.attached {
            return Ok(());
        }
        ctrl.scheduler.bind(frames);
        if let Err(e) = ctrl.events.listen(events) {
            ctrl.events.unlisten();
            ctrl.scheduler.unbind();
            return Err(e);
        }
        ctrl.attached = true;
        let viewport = ctrl.surface.viewport();
        ctrl.core.viewport = viewport;
        let actions = ctrl.core.initialize();
        ctrl.apply(actions);
        log::info!("viewport: attached at {}x{}", viewport.width, viewport.height);
        Ok(())
    }
}

fn event_sink<S, E, F>(weak: Weak<RefCell<Controller<S, E, F>>>) -> EventSink
where
    S: Surface + 'static,
    E: EventSource + 'static,
    F: FrameScheduler + 'static,
{
    Rc::new(move |event| {
        let Some(ctrl) = weak.upgrade() else {
            return;
        };
        match ctrl.try_borrow_mut() {
            Ok(mut ctrl) => ctrl.dispatch(event),
            Err(_) => log::warn!("viewport: dropped reentrant input event"),
        }
    })
}

fn frame_sink<S, E, F>(weak: Weak<RefCell<Controller<S, E, F>>>) -> FrameSink
where
    S: Surface + 'static,
    E: EventSource + 'static,
    F: FrameScheduler + 'static,
{
    Rc::new(move |now_ms| {
        let Some(ctrl) = weak.upgrade() else {
            return;
        };
        match ctrl.try_borrow_mut() {
            Ok(mut ctrl) => ctrl.frame(now_ms),
            Err(_) => log::warn!("viewport: dropped reentrant animation frame"),
        }
    })
}
