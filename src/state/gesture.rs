// Pointer / touch / wheel gesture state machine.
// Turns raw input into viewport pans and zooms, or stone toggles on taps.
use crate::model::{GridCell, GridStore};
use crate::state::viewport::Viewport;

pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;
pub const ZOOM_IN_STEP: f64 = 1.1;
pub const ZOOM_OUT_STEP: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: ScreenPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Input as delivered by the host, already relative to the surface.
/// Touch variants carry every touch still on the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(ScreenPoint),
    PointerMove(ScreenPoint),
    PointerUp(ScreenPoint),
    PointerLeave,
    TouchStart(Vec<ScreenPoint>),
    TouchMove(Vec<ScreenPoint>),
    TouchEnd {
        remaining: Vec<ScreenPoint>,
        lifted: ScreenPoint,
    },
    TouchCancel,
    Wheel {
        at: ScreenPoint,
        delta_y: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Down but not yet moved past the threshold from `start`.
    PossibleTap {
        start: ScreenPoint,
        last: ScreenPoint,
    },
    Dragging {
        last: ScreenPoint,
    },
    /// `last_distance` is `None` while fewer than two fingers remain.
    Pinching {
        last_distance: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    None,
    Panned,
    Zoomed,
    Toggled(GridCell),
}

impl GestureOutcome {
    pub fn needs_redraw(self) -> bool {
        !matches!(self, GestureOutcome::None)
    }
}

#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    drag_threshold: f64,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl GestureController {
    pub fn new(drag_threshold: f64) -> Self {
        Self {
            state: GestureState::Idle,
            drag_threshold,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        viewport: &mut Viewport,
        stones: &mut GridStore,
    ) -> GestureOutcome {
        use InputEvent::*;
        let before = self.state;
        let outcome = match event {
            PointerDown(p) => self.begin_single(*p),
            PointerMove(p) => self.move_single(*p, viewport),
            PointerUp(p) => self.end_single(*p, viewport, stones),
            PointerLeave | TouchCancel => {
                self.state = GestureState::Idle;
                GestureOutcome::None
            }
            TouchStart(touches) => match touches.as_slice() {
                [] => GestureOutcome::None,
                [p] => self.begin_single(*p),
                [a, b, ..] => {
                    self.state = GestureState::Pinching {
                        last_distance: Some(a.distance(*b)),
                    };
                    GestureOutcome::None
                }
            },
            TouchMove(touches) => self.move_touches(touches, viewport),
            TouchEnd { remaining, lifted } => self.end_touch(remaining, *lifted, viewport, stones),
            Wheel { at, delta_y } => {
                if *delta_y == 0.0 || delta_y.is_nan() {
                    GestureOutcome::None
                } else {
                    let factor = if *delta_y < 0.0 { ZOOM_IN_STEP } else { ZOOM_OUT_STEP };
                    viewport.zoom_about(at.x, at.y, factor);
                    GestureOutcome::Zoomed
                }
            }
        };
        if std::mem::discriminant(&before) != std::mem::discriminant(&self.state) {
            log::debug!("gesture {:?} -> {:?}", before, self.state);
        }
        outcome
    }

    fn begin_single(&mut self, p: ScreenPoint) -> GestureOutcome {
        self.state = GestureState::PossibleTap { start: p, last: p };
        GestureOutcome::None
    }

    fn move_single(&mut self, p: ScreenPoint, viewport: &mut Viewport) -> GestureOutcome {
        match self.state {
            GestureState::PossibleTap { start, last } => {
                // Compared against the down point, so slow drift still commits.
                let past = (p.x - start.x).abs() > self.drag_threshold
                    || (p.y - start.y).abs() > self.drag_threshold;
                if !past {
                    return GestureOutcome::None;
                }
                viewport.pan_by(p.x - last.x, p.y - last.y);
                self.state = GestureState::Dragging { last: p };
                GestureOutcome::Panned
            }
            GestureState::Dragging { last } => {
                self.state = GestureState::Dragging { last: p };
                if p == last {
                    return GestureOutcome::None;
                }
                viewport.pan_by(p.x - last.x, p.y - last.y);
                GestureOutcome::Panned
            }
            GestureState::Idle | GestureState::Pinching { .. } => GestureOutcome::None,
        }
    }

    fn end_single(
        &mut self,
        p: ScreenPoint,
        viewport: &Viewport,
        stones: &mut GridStore,
    ) -> GestureOutcome {
        match self.state {
            GestureState::PossibleTap { .. } => {
                self.state = GestureState::Idle;
                let cell = viewport.screen_to_world_cell(p.x, p.y);
                stones.toggle(cell);
                GestureOutcome::Toggled(cell)
            }
            GestureState::Dragging { .. } => {
                self.state = GestureState::Idle;
                GestureOutcome::None
            }
            GestureState::Idle | GestureState::Pinching { .. } => GestureOutcome::None,
        }
    }

    fn move_touches(&mut self, touches: &[ScreenPoint], viewport: &mut Viewport) -> GestureOutcome {
        match (touches, self.state) {
            ([], _) => GestureOutcome::None,
            ([_], GestureState::Pinching { .. }) => {
                self.state = GestureState::Pinching { last_distance: None };
                GestureOutcome::None
            }
            ([p], _) => self.move_single(*p, viewport),
            ([a, b, ..], GestureState::Pinching { last_distance }) => {
                let distance = a.distance(*b);
                self.state = GestureState::Pinching {
                    last_distance: Some(distance),
                };
                match last_distance {
                    Some(prev) if distance != prev => {
                        let factor = if distance > prev { ZOOM_IN_STEP } else { ZOOM_OUT_STEP };
                        let mid = a.midpoint(*b);
                        viewport.zoom_about(mid.x, mid.y, factor);
                        GestureOutcome::Zoomed
                    }
                    _ => GestureOutcome::None,
                }
            }
            ([a, b, ..], _) => {
                self.state = GestureState::Pinching {
                    last_distance: Some(a.distance(*b)),
                };
                GestureOutcome::None
            }
        }
    }

    fn end_touch(
        &mut self,
        remaining: &[ScreenPoint],
        lifted: ScreenPoint,
        viewport: &Viewport,
        stones: &mut GridStore,
    ) -> GestureOutcome {
        match (remaining, self.state) {
            ([], GestureState::Pinching { .. }) => {
                self.state = GestureState::Idle;
                GestureOutcome::None
            }
            ([], _) => self.end_single(lifted, viewport, stones),
            ([_], GestureState::Pinching { .. }) => {
                self.state = GestureState::Pinching { last_distance: None };
                GestureOutcome::None
            }
            ([a, b, ..], GestureState::Pinching { .. }) => {
                self.state = GestureState::Pinching {
                    last_distance: Some(a.distance(*b)),
                };
                GestureOutcome::None
            }
            _ => GestureOutcome::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    struct Rig {
        ctl: GestureController,
        view: Viewport,
        stones: GridStore,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                ctl: GestureController::default(),
                view: Viewport::default(),
                stones: GridStore::new(),
            }
        }

        fn send(&mut self, ev: InputEvent) -> GestureOutcome {
            self.ctl.handle(&ev, &mut self.view, &mut self.stones)
        }
    }

    #[test]
    fn click_toggles_cell_on_and_off() {
        let mut rig = Rig::new();
        rig.send(InputEvent::PointerDown(pt(40.0, 40.0)));
        let out = rig.send(InputEvent::PointerUp(pt(40.0, 40.0)));
        assert_eq!(out, GestureOutcome::Toggled(GridCell::new(1, 1)));
        assert!(rig.stones.contains(GridCell::new(1, 1)));

        rig.send(InputEvent::PointerDown(pt(40.0, 40.0)));
        rig.send(InputEvent::PointerUp(pt(40.0, 40.0)));
        assert!(!rig.stones.contains(GridCell::new(1, 1)));
        assert_eq!(rig.ctl.state(), GestureState::Idle);
    }

    #[test]
    fn drag_pans_by_net_delta_without_toggle() {
        let mut rig = Rig::new();
        rig.send(InputEvent::PointerDown(pt(100.0, 100.0)));
        assert_eq!(rig.send(InputEvent::PointerMove(pt(150.0, 130.0))), GestureOutcome::Panned);
        assert_eq!(rig.send(InputEvent::PointerUp(pt(150.0, 130.0))), GestureOutcome::None);
        assert_eq!((rig.view.offset_x, rig.view.offset_y), (50.0, 30.0));
        assert!(rig.stones.is_empty());
    }

    #[test]
    fn shaky_tap_within_threshold_still_toggles() {
        let mut rig = Rig::new();
        rig.send(InputEvent::PointerDown(pt(80.0, 80.0)));
        for p in [pt(83.0, 79.0), pt(85.0, 75.0), pt(75.0, 85.0), pt(81.0, 82.0)] {
            assert_eq!(rig.send(InputEvent::PointerMove(p)), GestureOutcome::None);
        }
        assert!(matches!(rig.ctl.state(), GestureState::PossibleTap { .. }));
        rig.send(InputEvent::PointerUp(pt(84.0, 84.0)));
        assert_eq!(rig.stones.all(), vec![GridCell::new(2, 2)]);
        assert_eq!((rig.view.offset_x, rig.view.offset_y), (0.0, 0.0));
    }

    #[test]
    fn slow_drift_past_threshold_commits_to_drag() {
        let mut rig = Rig::new();
        rig.send(InputEvent::PointerDown(pt(0.0, 0.0)));
        for i in 1..=5 {
            rig.send(InputEvent::PointerMove(pt(i as f64, 0.0)));
        }
        assert!(matches!(rig.ctl.state(), GestureState::PossibleTap { .. }));
        rig.send(InputEvent::PointerMove(pt(6.0, 0.0)));
        assert!(matches!(rig.ctl.state(), GestureState::Dragging { .. }));
        rig.send(InputEvent::PointerMove(pt(10.0, -3.0)));
        rig.send(InputEvent::PointerUp(pt(10.0, -3.0)));
        assert!(rig.stones.is_empty());
        assert_eq!((rig.view.offset_x, rig.view.offset_y), (10.0, -3.0));
    }

    #[test]
    fn leave_cancels_without_tap() {
        let mut rig = Rig::new();
        rig.send(InputEvent::PointerDown(pt(40.0, 40.0)));
        rig.send(InputEvent::PointerLeave);
        assert_eq!(rig.send(InputEvent::PointerUp(pt(40.0, 40.0))), GestureOutcome::None);
        assert!(rig.stones.is_empty());

        rig.send(InputEvent::PointerDown(pt(0.0, 0.0)));
        rig.send(InputEvent::PointerMove(pt(20.0, 0.0)));
        rig.send(InputEvent::PointerLeave);
        assert_eq!(rig.send(InputEvent::PointerMove(pt(40.0, 0.0))), GestureOutcome::None);
        assert_eq!(rig.view.offset_x, 20.0);
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut rig = Rig::new();
        assert_eq!(rig.send(InputEvent::PointerMove(pt(300.0, 300.0))), GestureOutcome::None);
        assert_eq!(rig.view, Viewport::default());
    }

    #[test]
    fn wheel_zooms_about_cursor() {
        let mut rig = Rig::new();
        assert_eq!(
            rig.send(InputEvent::Wheel { at: pt(200.0, 200.0), delta_y: -100.0 }),
            GestureOutcome::Zoomed
        );
        assert!((rig.view.zoom - 1.1).abs() < 1e-12);
        assert!((rig.view.offset_x + 20.0).abs() < 1e-9);
        assert!((rig.view.offset_y + 20.0).abs() < 1e-9);

        rig.send(InputEvent::Wheel { at: pt(200.0, 200.0), delta_y: 3.0 });
        assert!((rig.view.zoom - 0.99).abs() < 1e-12);
        assert_eq!(rig.send(InputEvent::Wheel { at: pt(0.0, 0.0), delta_y: 0.0 }), GestureOutcome::None);
    }

    #[test]
    fn wheel_does_not_disturb_pending_tap() {
        let mut rig = Rig::new();
        rig.send(InputEvent::PointerDown(pt(40.0, 40.0)));
        rig.send(InputEvent::Wheel { at: pt(0.0, 0.0), delta_y: -1.0 });
        assert!(matches!(rig.ctl.state(), GestureState::PossibleTap { .. }));
        rig.send(InputEvent::PointerUp(pt(44.0, 44.0)));
        assert!(rig.stones.contains(GridCell::new(1, 1)));
    }

    #[test]
    fn single_touch_tap_toggles() {
        let mut rig = Rig::new();
        rig.send(InputEvent::TouchStart(vec![pt(120.0, 80.0)]));
        let out = rig.send(InputEvent::TouchEnd { remaining: vec![], lifted: pt(121.0, 81.0) });
        assert_eq!(out, GestureOutcome::Toggled(GridCell::new(3, 2)));
    }

    #[test]
    fn single_touch_drag_pans() {
        let mut rig = Rig::new();
        rig.send(InputEvent::TouchStart(vec![pt(10.0, 10.0)]));
        rig.send(InputEvent::TouchMove(vec![pt(30.0, 10.0)]));
        rig.send(InputEvent::TouchMove(vec![pt(30.0, 40.0)]));
        rig.send(InputEvent::TouchEnd { remaining: vec![], lifted: pt(30.0, 40.0) });
        assert_eq!((rig.view.offset_x, rig.view.offset_y), (20.0, 30.0));
        assert!(rig.stones.is_empty());
    }

    #[test]
    fn pinch_steps_zoom_by_direction_only() {
        let mut rig = Rig::new();
        rig.send(InputEvent::TouchStart(vec![pt(100.0, 100.0)]));
        rig.send(InputEvent::TouchStart(vec![pt(100.0, 100.0), pt(200.0, 100.0)]));
        assert_eq!(rig.ctl.state(), GestureState::Pinching { last_distance: Some(100.0) });

        // Large spread and tiny spread both step by the same factor.
        rig.send(InputEvent::TouchMove(vec![pt(0.0, 100.0), pt(300.0, 100.0)]));
        assert!((rig.view.zoom - 1.1).abs() < 1e-12);
        rig.send(InputEvent::TouchMove(vec![pt(0.0, 100.0), pt(301.0, 100.0)]));
        assert!((rig.view.zoom - 1.21).abs() < 1e-12);

        // Unchanged distance: no zoom.
        assert_eq!(
            rig.send(InputEvent::TouchMove(vec![pt(10.0, 100.0), pt(311.0, 100.0)])),
            GestureOutcome::None
        );

        rig.send(InputEvent::TouchMove(vec![pt(100.0, 100.0), pt(200.0, 100.0)]));
        assert!((rig.view.zoom - 1.089).abs() < 1e-12);
    }

    #[test]
    fn pinch_anchors_on_midpoint() {
        let mut rig = Rig::new();
        rig.send(InputEvent::TouchStart(vec![pt(100.0, 200.0), pt(300.0, 200.0)]));
        let anchor = rig.view.screen_to_world(200.0, 200.0);
        rig.send(InputEvent::TouchMove(vec![pt(90.0, 200.0), pt(310.0, 200.0)]));
        let (sx, sy) = rig.view.world_to_screen(anchor.0, anchor.1);
        assert!((sx - 200.0).abs() < 1e-9 && (sy - 200.0).abs() < 1e-9);
    }

    #[test]
    fn pinch_end_never_taps() {
        let mut rig = Rig::new();
        rig.send(InputEvent::TouchStart(vec![pt(40.0, 40.0)]));
        rig.send(InputEvent::TouchStart(vec![pt(40.0, 40.0), pt(42.0, 40.0)]));
        rig.send(InputEvent::TouchEnd { remaining: vec![pt(40.0, 40.0)], lifted: pt(42.0, 40.0) });
        assert_eq!(rig.ctl.state(), GestureState::Pinching { last_distance: None });
        // Remaining finger moves do not pan.
        assert_eq!(rig.send(InputEvent::TouchMove(vec![pt(90.0, 90.0)])), GestureOutcome::None);
        let out = rig.send(InputEvent::TouchEnd { remaining: vec![], lifted: pt(40.0, 40.0) });
        assert_eq!(out, GestureOutcome::None);
        assert_eq!(rig.ctl.state(), GestureState::Idle);
        assert!(rig.stones.is_empty());
        assert_eq!(rig.view, Viewport::default());
    }

    #[test]
    fn second_finger_returning_starts_fresh_distance() {
        let mut rig = Rig::new();
        rig.send(InputEvent::TouchStart(vec![pt(0.0, 0.0), pt(100.0, 0.0)]));
        rig.send(InputEvent::TouchEnd { remaining: vec![pt(0.0, 0.0)], lifted: pt(100.0, 0.0) });
        rig.send(InputEvent::TouchStart(vec![pt(0.0, 0.0), pt(10.0, 0.0)]));
        assert_eq!(rig.ctl.state(), GestureState::Pinching { last_distance: Some(10.0) });
        rig.send(InputEvent::TouchMove(vec![pt(0.0, 0.0), pt(20.0, 0.0)]));
        assert!((rig.view.zoom - 1.1).abs() < 1e-12);
    }

    #[test]
    fn drag_can_turn_into_pinch() {
        let mut rig = Rig::new();
        rig.send(InputEvent::TouchStart(vec![pt(0.0, 0.0)]));
        rig.send(InputEvent::TouchMove(vec![pt(50.0, 0.0)]));
        rig.send(InputEvent::TouchStart(vec![pt(50.0, 0.0), pt(150.0, 0.0)]));
        assert!(matches!(rig.ctl.state(), GestureState::Pinching { .. }));
        rig.send(InputEvent::TouchCancel);
        assert_eq!(rig.ctl.state(), GestureState::Idle);
        assert_eq!(rig.view.offset_x, 50.0);
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let mut rig = Rig::new();
        rig.ctl = GestureController::new(20.0);
        rig.send(InputEvent::PointerDown(pt(0.0, 0.0)));
        rig.send(InputEvent::PointerMove(pt(15.0, 15.0)));
        rig.send(InputEvent::PointerUp(pt(15.0, 15.0)));
        assert_eq!(rig.stones.all(), vec![GridCell::new(0, 0)]);
    }
}
