//! Camera state, viewport geometry, and the bounds math that keeps the map on
//! screen.
//!
//! The camera translates the world origin to `(x, y)` viewport pixels and
//! scales it by `scale`. [`Limits`] bundles everything the clamp depends on
//! (world size, live viewport size, scale range) so the same rules apply to
//! drags, zoom steps, settling frames, and resizes.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Pixel size of the host surface. Read live from the host, never owned.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Size of the map in world pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSize {
    pub width: f64,
    pub height: f64,
}

impl WorldSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Valid translation range for one scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Whether `pos` lies inside the range, with a small slack for float noise.
    #[must_use]
    pub fn contains(&self, pos: Point) -> bool {
        const SLACK: f64 = 1e-9;
        pos.x >= self.min_x - SLACK
            && pos.x <= self.max_x + SLACK
            && pos.y >= self.min_y - SLACK
            && pos.y <= self.max_y + SLACK
    }
}

/// Everything the clamp rules depend on at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub world: WorldSize,
    pub viewport: Viewport,
    pub min_scale_floor: f64,
    pub max_scale: f64,
}

impl Limits {
    #[must_use]
    pub fn new(config: &ViewportConfig, viewport: Viewport) -> Self {
        Self {
            world: config.world(),
            viewport,
            min_scale_floor: config.min_scale_floor,
            max_scale: config.max_scale,
        }
    }

    /// Smallest scale at which the world still covers the viewport, never
    /// below the configured floor.
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        let fit_x = self.viewport.width / self.world.width;
        let fit_y = self.viewport.height / self.world.height;
        fit_x.max(fit_y).max(self.min_scale_floor)
    }

    /// Clamp `scale` into `[min_scale, max_scale]`. When the viewport is so
    /// large that `min_scale > max_scale`, the ceiling wins.
    #[must_use]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale()).min(self.max_scale)
    }

    /// Translation range for `scale`.
    #[must_use]
    pub fn bounds(&self, scale: f64) -> Bounds {
        let slack_x = self.viewport.width - self.world.width * scale;
        let slack_y = self.viewport.height - self.world.height * scale;
        Bounds {
            min_x: slack_x.min(0.0),
            max_x: slack_x.max(0.0),
            min_y: slack_y.min(0.0),
            max_y: slack_y.max(0.0),
        }
    }

    /// Clamp a translation for `scale`. An axis on which the scaled world is
    /// narrower than the viewport is centered instead.
    #[must_use]
    pub fn constrain(&self, scale: f64, pos: Point) -> Point {
        let bounds = self.bounds(scale);
        Point {
            x: constrain_axis(pos.x, bounds.min_x, bounds.max_x, self.viewport.width, self.world.width * scale),
            y: constrain_axis(pos.y, bounds.min_y, bounds.max_y, self.viewport.height, self.world.height * scale),
        }
    }
}

fn constrain_axis(value: f64, min: f64, max: f64, view: f64, scaled: f64) -> f64 {
    if scaled < view { (view - scaled) / 2.0 } else { value.max(min).min(max) }
}

/// Which axes a pan was cut short on by the clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pinned {
    pub x: bool,
    pub y: bool,
}

/// Camera state for pan/zoom over the bounded map.
///
/// `x` / `y` are the viewport-pixel position of the world origin.
/// `scale` is the current render scale; `target_scale` is where eased zoom is
/// heading (equal to `scale` at rest).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub scale: f64,
    pub target_scale: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::at_scale(1.0)
    }
}

impl Camera {
    /// A camera at the world origin with `scale` and `target_scale` equal.
    #[must_use]
    pub fn at_scale(scale: f64) -> Self {
        Self { scale, target_scale: scale, x: 0.0, y: 0.0 }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Convert a viewport-space point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.x) / self.scale, y: (screen.y - self.y) / self.scale }
    }

    /// Convert a world-space point to viewport coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: world.x * self.scale + self.x, y: world.y * self.scale + self.y }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Whether eased zoom has nothing left to do.
    #[must_use]
    pub fn is_settled(&self, epsilon: f64) -> bool {
        (self.scale - self.target_scale).abs() <= epsilon
    }

    /// Re-clamp the translation for the current scale.
    pub fn constrain(&mut self, limits: &Limits) {
        let pos = limits.constrain(self.scale, self.position());
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Move by `(dx, dy)` through the clamp and report which axes were cut
    /// short of the requested position.
    pub fn pan_by(&mut self, dx: f64, dy: f64, limits: &Limits) -> Pinned {
        let requested = Point::new(self.x + dx, self.y + dy);
        let pos = limits.constrain(self.scale, requested);
        self.x = pos.x;
        self.y = pos.y;
        #[allow(clippy::float_cmp)]
        Pinned { x: pos.x != requested.x, y: pos.y != requested.y }
    }

    /// Zoom by `delta` while keeping the world point under `focal` fixed on
    /// screen. `target_scale` follows the new scale.
    ///
    /// Returns `false` (and changes nothing) when the clamped scale equals the
    /// current one.
    pub fn zoom_about(&mut self, focal: Point, delta: f64, limits: &Limits) -> bool {
        let new_scale = limits.clamp_scale(self.scale + delta);
        #[allow(clippy::float_cmp)]
        if new_scale == self.scale {
            return false;
        }
        let anchor = self.screen_to_world(focal);
        let moved = Point::new(focal.x - anchor.x * new_scale, focal.y - anchor.y * new_scale);
        let pos = limits.constrain(new_scale, moved);
        self.scale = new_scale;
        self.target_scale = new_scale;
        self.x = pos.x;
        self.y = pos.y;
        true
    }

    /// Replace the scale (no focal preservation) and re-clamp.
    pub fn rescale(&mut self, scale: f64, limits: &Limits) {
        self.scale = scale;
        self.constrain(limits);
    }
}
