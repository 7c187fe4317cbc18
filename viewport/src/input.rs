//! Input model: raw host events, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the engine. [`InputEvent`] is
//! the host-neutral shape every DOM (or fake) event is translated into before
//! it reaches [`crate::engine::EngineCore`]. [`GestureState`] is the active
//! gesture, carrying the context needed to compute incremental deltas between
//! events. All positions are viewport-relative screen pixels.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Serialize;

use crate::camera::{Point, Viewport};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button. The only button that starts a drag.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            _ => Self::Secondary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down, zooms out).
    pub dy: f64,
}

/// One host input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown { at: Point, button: Button },
    MouseMove { at: Point },
    MouseUp { at: Point },
    MouseLeave,
    Wheel { at: Point, delta: WheelDelta },
    /// All touches currently on the surface.
    TouchStart { touches: Vec<Point> },
    /// All touches currently on the surface.
    TouchMove { touches: Vec<Point> },
    /// Touches still on the surface after the lift (or cancel).
    TouchEnd { touches: Vec<Point> },
    Resize { viewport: Viewport },
}

/// Public, context-free view of [`GestureState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureMode {
    Idle,
    Dragging,
    Pinching,
    ZoomSettling,
    Coasting,
}

impl GestureMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Pinching => "pinching",
            Self::ZoomSettling => "zoomSettling",
            Self::Coasting => "coasting",
        }
    }
}

/// Internal state for the gesture state machine.
///
/// Exactly one variant is active. Each pointer-driven variant carries the
/// previous sample so the next event can compute a delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture and no animation in progress.
    #[default]
    Idle,
    /// A mouse button or single finger is panning the map.
    Dragging {
        /// Screen position of the previous sample.
        last_screen: Point,
    },
    /// Two fingers are zooming the map.
    Pinching {
        /// Distance between the two touches at the previous sample.
        last_distance: f64,
        /// Midpoint of the two touches at the previous sample.
        last_center: Point,
    },
    /// Scale is easing toward `target_scale` on the animation loop.
    ZoomSettling,
    /// The map is gliding on released drag velocity.
    Coasting,
}

impl GestureState {
    #[must_use]
    pub fn mode(&self) -> GestureMode {
        match self {
            Self::Idle => GestureMode::Idle,
            Self::Dragging { .. } => GestureMode::Dragging,
            Self::Pinching { .. } => GestureMode::Pinching,
            Self::ZoomSettling => GestureMode::ZoomSettling,
            Self::Coasting => GestureMode::Coasting,
        }
    }

    /// Whether a pointer is currently held down on the map.
    #[must_use]
    pub fn is_pointer_active(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Pinching { .. })
    }
}

/// Distance between the first two touches, if there are exactly two.
#[must_use]
pub fn touch_distance(touches: &[Point]) -> Option<f64> {
    match touches {
        [a, b] => Some(a.distance(*b)),
        _ => None,
    }
}

/// Midpoint of the first two touches, if there are exactly two.
#[must_use]
pub fn touch_midpoint(touches: &[Point]) -> Option<Point> {
    match touches {
        [a, b] => Some(a.midpoint(*b)),
        _ => None,
    }
}
