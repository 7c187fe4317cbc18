//! Seams between the controller and whatever hosts it.
//!
//! A host supplies three things: a [`Surface`] to draw the transform on, an
//! [`EventSource`] that delivers input, and a [`FrameScheduler`] that delivers
//! animation-frame timestamps. The browser implementations live in
//! [`crate::web`]; tests use in-memory fakes.

use std::rc::Rc;

use crate::camera::{Camera, Viewport};
use crate::engine::Cursor;
use crate::input::InputEvent;

/// Callback an [`EventSource`] delivers input through.
pub type EventSink = Rc<dyn Fn(InputEvent)>;

/// Callback a [`FrameScheduler`] delivers frame timestamps (ms) through.
pub type FrameSink = Rc<dyn Fn(f64)>;

/// Opaque id of one scheduled frame.
pub type FrameHandle = i32;

/// Errors raised by host integrations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// No global `window` (not running in a browser main thread).
    #[error("no window available")]
    NoWindow,

    /// Registering a listener was refused by the host.
    #[error("failed to listen for {event}: {reason}")]
    Listen { event: &'static str, reason: String },

    /// The host could not schedule an animation frame.
    #[error("failed to schedule frame: {0}")]
    Schedule(String),
}

/// Where the camera transform ends up.
pub trait Surface {
    /// Current pixel size. Read before every event and frame.
    fn viewport(&self) -> Viewport;
    fn apply_transform(&mut self, camera: &Camera);
    fn set_cursor(&mut self, cursor: Cursor);
}

/// Producer of input events.
pub trait EventSource {
    /// Begin delivering events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Listen`] when a registration is refused.
    fn listen(&mut self, sink: EventSink) -> Result<(), HostError>;

    /// Remove every registration made by [`EventSource::listen`].
    fn unlisten(&mut self);
}

/// Producer of animation-frame callbacks.
pub trait FrameScheduler {
    /// Route future frames to `sink`.
    fn bind(&mut self, sink: FrameSink);

    /// Ask for one frame.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Schedule`] when no frame can be scheduled.
    fn request_frame(&mut self) -> Result<FrameHandle, HostError>;

    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Drop the sink; pending frames become no-ops.
    fn unbind(&mut self);
}
