//! Controller configuration.
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! host can pass `{}` (or nothing) and get the tuned behaviour, or override
//! individual "feel" values such as friction and pinch sensitivity.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::camera::WorldSize;
use crate::consts::*;

/// Errors produced while loading a [`ViewportConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field parsed but holds a value the controller cannot work with.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tuning and geometry for one viewport controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub world_width: f64,
    pub world_height: f64,
    pub initial_scale: f64,
    pub min_scale_floor: f64,
    pub max_scale: f64,
    pub zoom_speed: f64,
    pub zoom_smoothing: f64,
    pub zoom_epsilon: f64,
    pub pinch_zoom_factor: f64,
    pub friction: f64,
    pub min_velocity: f64,
    pub max_velocity: f64,
    pub drag_velocity_gain: f64,
    pub frame_ms: f64,
    pub max_frame_steps: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            world_width: MAP_WIDTH,
            world_height: MAP_HEIGHT,
            initial_scale: INITIAL_SCALE,
            min_scale_floor: MIN_SCALE_FLOOR,
            max_scale: MAX_SCALE,
            zoom_speed: ZOOM_SPEED,
            zoom_smoothing: ZOOM_SMOOTHING,
            zoom_epsilon: ZOOM_EPSILON,
            pinch_zoom_factor: PINCH_ZOOM_FACTOR,
            friction: FRICTION,
            min_velocity: MIN_VELOCITY,
            max_velocity: MAX_VELOCITY,
            drag_velocity_gain: DRAG_VELOCITY_GAIN,
            frame_ms: FRAME_MS,
            max_frame_steps: MAX_FRAME_STEPS,
        }
    }
}

impl ViewportConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against the range the integrators rely on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        positive("initial_scale", self.initial_scale)?;
        positive("min_scale_floor", self.min_scale_floor)?;
        positive("max_scale", self.max_scale)?;
        if self.min_scale_floor > self.max_scale {
            let reason = format!("{} exceeds max_scale {}", self.min_scale_floor, self.max_scale);
            return Err(invalid("min_scale_floor", reason));
        }
        positive("zoom_speed", self.zoom_speed)?;
        unit_interval("zoom_smoothing", self.zoom_smoothing, true)?;
        positive("zoom_epsilon", self.zoom_epsilon)?;
        positive("pinch_zoom_factor", self.pinch_zoom_factor)?;
        unit_interval("friction", self.friction, false)?;
        positive("min_velocity", self.min_velocity)?;
        if !(self.max_velocity.is_finite() && self.max_velocity >= self.min_velocity) {
            let reason = format!("{} is below min_velocity {}", self.max_velocity, self.min_velocity);
            return Err(invalid("max_velocity", reason));
        }
        if !(self.drag_velocity_gain.is_finite() && self.drag_velocity_gain >= 0.0) {
            return Err(invalid("drag_velocity_gain", format!("{} is negative", self.drag_velocity_gain)));
        }
        positive("frame_ms", self.frame_ms)?;
        if !(self.max_frame_steps.is_finite() && self.max_frame_steps >= 1.0) {
            return Err(invalid("max_frame_steps", format!("{} is below one frame", self.max_frame_steps)));
        }
        Ok(())
    }

    /// The world rectangle this config describes.
    #[must_use]
    pub fn world(&self) -> WorldSize {
        WorldSize::new(self.world_width, self.world_height)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be a positive number")))
    }
}

/// `(0, 1]` when `inclusive_one`, otherwise `(0, 1)`.
fn unit_interval(field: &'static str, value: f64, inclusive_one: bool) -> Result<(), ConfigError> {
    let upper_ok = if inclusive_one { value <= 1.0 } else { value < 1.0 };
    if value.is_finite() && value > 0.0 && upper_ok {
        Ok(())
    } else {
        let bound = if inclusive_one { "(0, 1]" } else { "(0, 1)" };
        Err(invalid(field, format!("{value} is outside {bound}")))
    }
}
