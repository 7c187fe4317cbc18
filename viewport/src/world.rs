//! Static map data: unlock flags, the asset manifest, and interactable points.
//!
//! All of it is read-only configuration for the viewport. Deciding what an
//! unlock *means* belongs to the game layer, not here.

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::camera::Point;

// ── Assets ──────────────────────────────────────────────────────

pub const ASSET_BASEMAP: &str = "BaseMap";
pub const ASSET_CHIMNEY_SMOKE: &str = "ChimneySmoke";
pub const ASSET_TEST: &str = "Test";

/// One loadable image: alias the scene refers to and the file it loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub alias: String,
    pub src: String,
}

impl AssetEntry {
    fn new(alias: &str, src: &str) -> Self {
        Self { alias: alias.to_owned(), src: src.to_owned() }
    }
}

#[must_use]
pub fn asset_manifest() -> Vec<AssetEntry> {
    let mut manifest = vec![
        AssetEntry::new(ASSET_BASEMAP, "example_map.png"),
        AssetEntry::new(ASSET_TEST, "favicon.png"),
    ];
    manifest.extend((0..4).map(|n| AssetEntry::new(&format!("Charger_{n}"), &format!("Charger_{n}.png"))));
    manifest
}

/// Source file for `alias`, if the manifest lists it.
#[must_use]
pub fn asset_src<'a>(manifest: &'a [AssetEntry], alias: &str) -> Option<&'a str> {
    manifest.iter().find(|entry| entry.alias == alias).map(|entry| entry.src.as_str())
}

// ── Unlock state ────────────────────────────────────────────────

pub const AREA_IDS: [&str; 12] = [
    "forest1",
    "forest2",
    "enchantedForest",
    "pond",
    "river",
    "ocean",
    "fishingExpedition",
    "cave1",
    "cave2",
    "cave3",
    "quarry",
    "digSite",
];

pub const BUILDING_IDS: [&str; 3] = ["blacksmith", "townHall", "windmill"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Unlock {
    pub unlocked: bool,
}

/// Unlock flags for every area and building, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub areas: BTreeMap<String, Unlock>,
    pub buildings: BTreeMap<String, Unlock>,
}

impl Default for WorldState {
    /// Every known area and building, all locked.
    fn default() -> Self {
        let locked = |ids: &[&str]| -> BTreeMap<String, Unlock> {
            ids.iter().map(|id| ((*id).to_owned(), Unlock::default())).collect()
        };
        Self { areas: locked(&AREA_IDS), buildings: locked(&BUILDING_IDS) }
    }
}

impl WorldState {
    /// # Errors
    ///
    /// Returns the parse error for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Whether the area or building `id` is unlocked. Unknown ids are locked.
    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.areas.get(id).or_else(|| self.buildings.get(id)).is_some_and(|u| u.unlocked)
    }
}

// ── Interactables ───────────────────────────────────────────────

/// A clickable point on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub asset: String,
    /// World-space position.
    pub position: Point,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Interactables {
    #[serde(default)]
    pub areas: Vec<Interactable>,
    #[serde(default)]
    pub buildings: Vec<Interactable>,
}

impl Interactables {
    /// Areas first, then buildings.
    pub fn iter(&self) -> impl Iterator<Item = &Interactable> {
        self.areas.iter().chain(self.buildings.iter())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Interactable> {
        self.iter().find(|item| item.id == id)
    }
}

/// The two starting forest areas; no buildings yet.
#[must_use]
pub fn default_interactables() -> Interactables {
    let area = |id: &str, title: &str, x: f64, y: f64| Interactable {
        id: id.to_owned(),
        title: title.to_owned(),
        description: String::new(),
        asset: ASSET_TEST.to_owned(),
        position: Point::new(x, y),
        actions: Vec::new(),
        resources: Vec::new(),
    };
    Interactables {
        areas: vec![area("forest1", "Forest 1", 200.0, 150.0), area("forest2", "Forest 2", 300.0, 450.0)],
        buildings: Vec::new(),
    }
}
