//! View configuration. Defaults match the stock look; a JSON override can be
//! stored in `localStorage` under [`CONFIG_STORAGE_KEY`].

use serde::{Deserialize, Serialize};

use crate::state::gesture::DEFAULT_DRAG_THRESHOLD;
use crate::state::viewport::{DEFAULT_CELL_SIZE, MIN_ZOOM};

pub const CONFIG_STORAGE_KEY: &str = "ig_view_config";

/// Smallest accepted cell size; keeps a cell at least one pixel wide at minimum zoom.
pub const MIN_CELL_SIZE: f64 = 1.0 / MIN_ZOOM;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Screen units per cell at zoom 1.
    pub cell_size: f64,
    /// Movement (per axis, from the down point) that turns a tap into a drag.
    pub drag_threshold: f64,
    pub background: String,
    pub grid_color: String,
    pub stone_color: String,
    pub line_width: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            background: "#ffffff".into(),
            grid_color: "#8c1c84".into(),
            stone_color: "#45a2f8".into(),
            line_width: 1.0,
        }
    }
}

impl ViewConfig {
    /// Parse a stored override. Unknown fields are ignored, missing ones default.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<ViewConfig>(raw).map(ViewConfig::sanitized)
    }

    /// Replace values that would break the transform with their defaults.
    pub fn sanitized(mut self) -> Self {
        let d = ViewConfig::default();
        if !self.cell_size.is_finite() || self.cell_size < MIN_CELL_SIZE {
            self.cell_size = d.cell_size;
        }
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            self.drag_threshold = d.drag_threshold;
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            self.line_width = d.line_width;
        }
        self
    }

    /// Read the override from local storage, falling back to defaults.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|win| win.local_storage().ok().flatten())
            .and_then(|store| store.get_item(CONFIG_STORAGE_KEY).ok().flatten());
        let Some(raw) = raw else {
            return ViewConfig::default();
        };
        match ViewConfig::from_json(&raw) {
            Ok(cfg) => {
                log::info!("loaded view config override from {CONFIG_STORAGE_KEY}");
                cfg
            }
            Err(err) => {
                log::warn!("ignoring invalid {CONFIG_STORAGE_KEY}: {err}");
                ViewConfig::default()
            }
        }
    }
}
