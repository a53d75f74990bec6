// World <-> screen mapping for the grid canvas.
use crate::model::{CellRange, GridCell};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
pub const DEFAULT_CELL_SIZE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: f64,
    /// Screen units per cell at zoom 1.
    pub cell_size: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl Viewport {
    pub fn new(cell_size: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
            cell_size,
        }
    }

    /// Screen units covered by one cell at the current zoom.
    pub fn scale(&self) -> f64 {
        self.cell_size * self.zoom
    }

    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        let s = self.scale();
        (wx * s + self.offset_x, wy * s + self.offset_y)
    }

    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        let s = self.scale();
        ((sx - self.offset_x) / s, (sy - self.offset_y) / s)
    }

    /// Cell whose intersection point is nearest to the screen point.
    /// Exact halves resolve towards positive infinity on both axes.
    pub fn screen_to_world_cell(&self, sx: f64, sy: f64) -> GridCell {
        let (wx, wy) = self.screen_to_world(sx, sy);
        GridCell::new((wx + 0.5).floor() as i32, (wy + 0.5).floor() as i32)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Scale by `factor` keeping the world point under `(sx, sy)` fixed on screen.
    /// The offset is solved against the clamped zoom so the anchor holds at the limits.
    pub fn zoom_about(&mut self, sx: f64, sy: f64, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let (wx, wy) = self.screen_to_world(sx, sy);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let s = self.scale();
        self.offset_x = sx - wx * s;
        self.offset_y = sy - wy * s;
    }

    /// Smallest cell range whose lines cover a `width` x `height` surface.
    pub fn visible_cell_range(&self, width: f64, height: f64) -> CellRange {
        let (left, top) = self.screen_to_world(0.0, 0.0);
        let (right, bottom) = self.screen_to_world(width, height);
        CellRange {
            min_x: left.floor() as i32,
            max_x: right.ceil() as i32,
            min_y: top.floor() as i32,
            max_y: bottom.ceil() as i32,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.cell_size);
    }
}
