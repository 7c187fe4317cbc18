//! Shared numeric constants for the viewport crate.
//!
//! These are the defaults behind [`crate::config::ViewportConfig`]; the
//! controller itself only ever reads the config.

// ── World ───────────────────────────────────────────────────────

/// Width of the base map in world pixels.
pub const MAP_WIDTH: f64 = 4434.0;

/// Height of the base map in world pixels.
pub const MAP_HEIGHT: f64 = 2470.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Lowest scale ever allowed, regardless of how small the viewport is.
pub const MIN_SCALE_FLOOR: f64 = 0.5;

/// Highest scale (1:1 world pixels).
pub const MAX_SCALE: f64 = 1.0;

/// Scale the camera starts at before the first viewport clamp.
pub const INITIAL_SCALE: f64 = 1.0;

/// Scale change per wheel pixel.
pub const ZOOM_SPEED: f64 = 0.0005;

/// Fraction of the remaining scale gap closed per settling frame.
pub const ZOOM_SMOOTHING: f64 = 0.15;

/// Settling stops once the scale is this close to its target.
pub const ZOOM_EPSILON: f64 = 0.001;

/// Scale change per pixel of pinch distance change. Tuned by feel.
pub const PINCH_ZOOM_FACTOR: f64 = 0.01;

// ── Inertia ─────────────────────────────────────────────────────

/// Per-frame velocity multiplier while coasting. Tuned by feel.
pub const FRICTION: f64 = 0.95;

/// Velocity magnitude (px/frame) below which an axis snaps to rest.
pub const MIN_VELOCITY: f64 = 0.1;

/// Velocity cap (px/frame) recorded from a drag sample.
pub const MAX_VELOCITY: f64 = 30.0;

/// Drag delta to velocity ratio.
pub const DRAG_VELOCITY_GAIN: f64 = 0.8;

// ── Frame timing ────────────────────────────────────────────────

/// Nominal frame duration the per-frame constants are tuned against.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Most nominal frames a single late tick may integrate.
pub const MAX_FRAME_STEPS: f64 = 4.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius in pixels within which an interactable point is hit.
pub const INTERACTABLE_HIT_RADIUS_PX: f64 = 24.0;
