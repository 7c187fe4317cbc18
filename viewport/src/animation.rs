//! Animation driver: loop state, frame-step normalization, and the two loop
//! bodies (zoom settling and inertia).
//!
//! DESIGN
//! ======
//! At most one loop runs at a time. The driver only tracks *which* loop is
//! running and when the previous frame arrived; scheduling real frames is the
//! controller's job. Loop bodies are plain functions of camera state, velocity
//! and elapsed steps, so a stop at any point followed by a restart resumes
//! from the current state with no jump.
//!
//! Per-frame tuning (smoothing, friction) is expressed per nominal 60 Hz
//! frame. A tick that arrives late integrates `elapsed / frame_ms` steps, up
//! to `max_frame_steps`.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use crate::camera::{Camera, Limits};

/// Which loop body is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    ZoomSettle,
    Inertia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running(LoopKind),
}

/// Pan velocity in screen pixels per nominal frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub const ZERO: Self = Self { vx: 0.0, vy: 0.0 };

    /// Velocity implied by one drag sample, capped per axis.
    #[must_use]
    pub fn from_drag(dx: f64, dy: f64, gain: f64, max: f64) -> Self {
        Self { vx: (dx * gain).clamp(-max, max), vy: (dy * gain).clamp(-max, max) }
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_zero(&self) -> bool {
        self.vx == 0.0 && self.vy == 0.0
    }

    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

/// Tracks the running loop and the timestamp of its previous frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationDriver {
    state: LoopState,
    last_frame_ms: Option<f64>,
}

impl AnimationDriver {
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn running(&self) -> Option<LoopKind> {
        match self.state {
            LoopState::Running(kind) => Some(kind),
            LoopState::Stopped => None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running().is_some()
    }

    /// Start (or switch to) `kind`. The next frame counts as one full step.
    pub fn start(&mut self, kind: LoopKind) {
        self.state = LoopState::Running(kind);
        self.last_frame_ms = None;
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.last_frame_ms = None;
    }

    /// Nominal frames elapsed since the previous tick.
    ///
    /// First tick after a start is `1.0`. A timestamp that does not advance
    /// (or is not finite) yields `0.0` and leaves the reference untouched.
    pub fn frame_steps(&mut self, now_ms: f64, frame_ms: f64, max_steps: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let steps = match self.last_frame_ms {
            None => 1.0,
            Some(prev) if now_ms > prev => ((now_ms - prev) / frame_ms).min(max_steps),
            Some(_) => return 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        steps
    }
}

/// Advance eased zoom by `steps` frames. Returns `true` once converged, in
/// which case `scale` has snapped to `target_scale`.
pub fn settle_zoom(camera: &mut Camera, limits: &Limits, smoothing: f64, epsilon: f64, steps: f64) -> bool {
    let k = 1.0 - (1.0 - smoothing).powf(steps);
    let next = camera.scale + (camera.target_scale - camera.scale) * k;
    if (camera.target_scale - next).abs() <= epsilon {
        camera.rescale(camera.target_scale, limits);
        return true;
    }
    camera.rescale(next, limits);
    false
}

/// Inertia tuning, copied out of the config for one tick.
#[derive(Debug, Clone, Copy)]
pub struct Friction {
    pub factor: f64,
    pub min_velocity: f64,
}

/// Advance inertia by `steps` frames. Returns `true` once velocity is zero.
pub fn coast(
    camera: &mut Camera,
    velocity: &mut Velocity,
    limits: &Limits,
    friction: Friction,
    steps: f64,
) -> bool {
    let decay = friction.factor.powf(steps);
    velocity.vx = snap(velocity.vx * decay, friction.min_velocity);
    velocity.vy = snap(velocity.vy * decay, friction.min_velocity);
    if velocity.is_zero() {
        return true;
    }

    let pinned = camera.pan_by(velocity.vx * steps, velocity.vy * steps, limits);
    if pinned.x {
        velocity.vx = 0.0;
    }
    if pinned.y {
        velocity.vy = 0.0;
    }
    velocity.is_zero()
}

fn snap(v: f64, floor: f64) -> f64 {
    if v.abs() < floor { 0.0 } else { v }
}
