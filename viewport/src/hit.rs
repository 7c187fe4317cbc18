#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::world::Interactable;

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub interactable: &'a Interactable,
    /// World-space distance from the query point to the interactable's position.
    pub distance: f64,
}

/// The interactable nearest `world_pt` within `radius_px` screen pixels.
///
/// The radius is fixed on screen, so it covers more world space when zoomed
/// out. Ties go to the earlier item.
#[must_use]
pub fn hit_interactable<'a>(
    items: impl IntoIterator<Item = &'a Interactable>,
    world_pt: Point,
    camera: &Camera,
    radius_px: f64,
) -> Option<Hit<'a>> {
    let radius = camera.screen_dist_to_world(radius_px);
    items
        .into_iter()
        .map(|interactable| Hit { interactable, distance: interactable.position.distance(world_pt) })
        .filter(|hit| hit.distance <= radius)
        .fold(None, |best: Option<Hit<'a>>, hit| match best {
            Some(b) if b.distance <= hit.distance => Some(b),
            _ => Some(hit),
        })
}
