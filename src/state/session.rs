// Session-scoped context: the one owner of viewport, stones and gesture state.
use crate::config::ViewConfig;
use crate::model::GridStore;
use crate::render::Frame;
use crate::state::gesture::{GestureController, GestureOutcome, InputEvent, ZOOM_IN_STEP, ZOOM_OUT_STEP};
use crate::state::viewport::Viewport;

/// Snapshot for the overlay panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStatus {
    pub zoom: f64,
    pub stones: usize,
}

#[derive(Debug, Clone)]
pub struct Session {
    viewport: Viewport,
    stones: GridStore,
    gesture: GestureController,
    width: f64,
    height: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

impl Session {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            viewport: Viewport::new(config.cell_size),
            stones: GridStore::new(),
            gesture: GestureController::new(config.drag_threshold),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn stones(&self) -> &GridStore {
        &self.stones
    }

    /// Route one input event. Returns true when the view must be redrawn.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let outcome = self
            .gesture
            .handle(event, &mut self.viewport, &mut self.stones);
        if let GestureOutcome::Toggled(cell) = outcome {
            log::debug!(
                "toggled ({}, {}) -> {}",
                cell.x,
                cell.y,
                self.stones.contains(cell)
            );
        }
        outcome.needs_redraw()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Wheel-sized zoom step anchored on the surface centre.
    pub fn zoom_step(&mut self, zoom_in: bool) {
        let factor = if zoom_in { ZOOM_IN_STEP } else { ZOOM_OUT_STEP };
        self.viewport
            .zoom_about(self.width / 2.0, self.height / 2.0, factor);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    pub fn clear_stones(&mut self) {
        if !self.stones.is_empty() {
            log::info!("clearing {} stones", self.stones.len());
        }
        self.stones.clear();
    }

    pub fn frame(&self) -> Frame {
        Frame::plan(&self.viewport, self.width, self.height, &self.stones)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            zoom: self.viewport.zoom,
            stones: self.stones.len(),
        }
    }
}
