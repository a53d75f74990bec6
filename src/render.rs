//! Grid drawing. [`Frame::plan`] is pure geometry; [`paint`] pushes a frame onto
//! any [`Surface`], which the canvas 2D context implements.

use web_sys::CanvasRenderingContext2d;

use crate::config::ViewConfig;
use crate::model::{CellRange, GridCell, GridStore};
use crate::state::gesture::ScreenPoint;
use crate::state::viewport::Viewport;

/// Stone radius relative to the on-screen cell size.
pub const STONE_RADIUS_RATIO: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub from: ScreenPoint,
    pub to: ScreenPoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stone {
    pub cell: GridCell,
    pub center: ScreenPoint,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub range: Option<CellRange>,
    pub lines: Vec<Line>,
    pub stones: Vec<Stone>,
}

impl Frame {
    pub fn plan(viewport: &Viewport, width: f64, height: f64, store: &GridStore) -> Frame {
        let mut frame = Frame {
            width,
            height,
            range: None,
            lines: Vec::new(),
            stones: Vec::new(),
        };
        if width <= 0.0 || height <= 0.0 {
            return frame;
        }
        let range = viewport.visible_cell_range(width, height);
        frame.range = Some(range);

        for x in range.columns() {
            let (sx, _) = viewport.world_to_screen(x as f64, 0.0);
            frame.lines.push(Line {
                from: ScreenPoint::new(sx, 0.0),
                to: ScreenPoint::new(sx, height),
            });
        }
        for y in range.rows() {
            let (_, sy) = viewport.world_to_screen(0.0, y as f64);
            frame.lines.push(Line {
                from: ScreenPoint::new(0.0, sy),
                to: ScreenPoint::new(width, sy),
            });
        }

        let radius = viewport.scale() * STONE_RADIUS_RATIO;
        for cell in store.all() {
            let (cx, cy) = viewport.world_to_screen(cell.x as f64, cell.y as f64);
            let off_screen = cx + radius < 0.0
                || cy + radius < 0.0
                || cx - radius > width
                || cy - radius > height;
            if off_screen {
                continue;
            }
            frame.stones.push(Stone {
                cell,
                center: ScreenPoint::new(cx, cy),
                radius,
            });
        }
        frame
    }
}

/// The handful of 2D drawing primitives the grid needs.
pub trait Surface {
    fn clear(&mut self, color: &str, width: f64, height: f64);
    fn stroke_lines(&mut self, lines: &[Line], color: &str, line_width: f64);
    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: &str);
}

pub fn paint<S: Surface + ?Sized>(surface: &mut S, frame: &Frame, config: &ViewConfig) {
    surface.clear(&config.background, frame.width, frame.height);
    if !frame.lines.is_empty() {
        surface.stroke_lines(&frame.lines, &config.grid_color, config.line_width);
    }
    for stone in &frame.stones {
        surface.fill_circle(stone.center, stone.radius, &config.stone_color);
    }
}

impl Surface for CanvasRenderingContext2d {
    fn clear(&mut self, color: &str, width: f64, height: f64) {
        self.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.clear_rect(0.0, 0.0, width, height);
        self.set_fill_style_str(color);
        self.fill_rect(0.0, 0.0, width, height);
    }

    fn stroke_lines(&mut self, lines: &[Line], color: &str, line_width: f64) {
        self.set_stroke_style_str(color);
        self.set_line_width(line_width);
        self.begin_path();
        for line in lines {
            self.move_to(line.from.x, line.from.y);
            self.line_to(line.to.x, line.to.y);
        }
        self.stroke();
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: &str) {
        self.set_fill_style_str(color);
        self.begin_path();
        self.arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0)
            .ok();
        self.fill();
    }
}
