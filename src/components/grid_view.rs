use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, DomRect, Event, EventTarget, HtmlCanvasElement, MouseEvent,
    TouchEvent, TouchList, WheelEvent,
};
use yew::prelude::*;

use crate::config::ViewConfig;
use crate::error::{js_reason, SurfaceError};
use crate::render::paint;
use crate::state::{InputEvent, ScreenPoint, Session, SessionStatus};

use super::{camera_controls::CameraControls, stats_panel::StatsPanel};

type DrawSlot = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

#[derive(Properties, PartialEq, Clone)]
pub struct GridViewProps {
    pub config: ViewConfig,
}

#[function_component(GridView)]
pub fn grid_view(props: &GridViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let session = {
        let config = props.config.clone();
        use_mut_ref(move || Session::new(&config))
    };
    let draw_ref: DrawSlot = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let status = use_state_eq(|| session.borrow().status());

    // Mount: size the canvas, build the draw closure, attach listeners.
    {
        let canvas_ref = canvas_ref.clone();
        let session = session.clone();
        let draw_ref = draw_ref.clone();
        let status = status.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| {
            let mounted = canvas_ref
                .cast::<HtmlCanvasElement>()
                .ok_or(SurfaceError::CanvasMissing)
                .and_then(|canvas| mount(canvas, session, config, status, draw_ref.clone()));
            let listeners = match mounted {
                Ok(listeners) => Some(listeners),
                Err(err) => {
                    log::error!("grid surface unavailable: {err}");
                    None
                }
            };
            move || {
                draw_ref.borrow_mut().take();
                drop(listeners);
            }
        });
    }

    let action = |f: fn(&mut Session)| {
        let session = session.clone();
        let draw_ref = draw_ref.clone();
        Callback::from(move |_: ()| {
            f(&mut session.borrow_mut());
            redraw(&draw_ref);
        })
    };

    html! {
        <div style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#ffffff;">
            <canvas ref={canvas_ref} style="display:block; touch-action:none;" />
            <StatsPanel zoom={status.zoom} stones={status.stones} />
            <CameraControls
                on_zoom_in={action(|s| s.zoom_step(true))}
                on_zoom_out={action(|s| s.zoom_step(false))}
                on_reset={action(Session::reset_view)}
                on_clear={action(Session::clear_stones)}
            />
        </div>
    }
}

fn redraw(draw_ref: &DrawSlot) {
    let draw = draw_ref.borrow().clone();
    if let Some(f) = draw {
        f();
    }
}

fn mount(
    canvas: HtmlCanvasElement,
    session: Rc<RefCell<Session>>,
    config: ViewConfig,
    status: UseStateHandle<SessionStatus>,
    draw_ref: DrawSlot,
) -> Result<Listeners, SurfaceError> {
    let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
    let ctx = canvas
        .get_context("2d")
        .map_err(|e| SurfaceError::ContextUnavailable(js_reason(&e)))?
        .ok_or_else(|| SurfaceError::ContextUnavailable("null".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| SurfaceError::ContextUnavailable("not a 2d context".into()))?;

    let apply_canvas_size = {
        let canvas = canvas.clone();
        let window = window.clone();
        let session = session.clone();
        move || {
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(800.0)
                .max(0.0);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(600.0)
                .max(0.0);
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
            session.borrow_mut().resize(width, height);
        }
    };
    apply_canvas_size();

    let draw: Rc<dyn Fn()> = {
        let canvas = canvas.clone();
        let session = session.clone();
        Rc::new(move || {
            if !canvas.is_connected() {
                return;
            }
            let s = session.borrow();
            let mut ctx = ctx.clone();
            paint(&mut ctx, &s.frame(), &config);
            status.set(s.status());
        })
    };
    *draw_ref.borrow_mut() = Some(draw);
    redraw(&draw_ref);
    log::info!("grid mounted at {}x{}", canvas.width(), canvas.height());

    // Feeds one event to the session and redraws if anything changed.
    let dispatch = {
        let session = session.clone();
        let draw_ref = draw_ref.clone();
        Rc::new(move |event: InputEvent| {
            let dirty = session.borrow_mut().handle(&event);
            if dirty {
                redraw(&draw_ref);
            }
        })
    };

    let mut listeners = Listeners::default();

    {
        let canvas_m = canvas.clone();
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "mousedown", move |ev: Event| {
            let Some(e) = ev.dyn_ref::<MouseEvent>() else { return };
            if e.button() != 0 {
                return;
            }
            dispatch(InputEvent::PointerDown(mouse_point(e, &canvas_m.get_bounding_client_rect())));
        })?;
    }
    {
        let canvas_m = canvas.clone();
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "mousemove", move |ev: Event| {
            let Some(e) = ev.dyn_ref::<MouseEvent>() else { return };
            if e.buttons() & 1 == 0 {
                // Button released somewhere we did not see.
                dispatch(InputEvent::PointerLeave);
                return;
            }
            dispatch(InputEvent::PointerMove(mouse_point(e, &canvas_m.get_bounding_client_rect())));
        })?;
    }
    {
        let canvas_m = canvas.clone();
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "mouseup", move |ev: Event| {
            let Some(e) = ev.dyn_ref::<MouseEvent>() else { return };
            if e.button() != 0 {
                return;
            }
            dispatch(InputEvent::PointerUp(mouse_point(e, &canvas_m.get_bounding_client_rect())));
        })?;
    }
    {
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "mouseleave", move |_ev: Event| {
            dispatch(InputEvent::PointerLeave);
        })?;
    }
    {
        let canvas_w = canvas.clone();
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "wheel", move |ev: Event| {
            let Some(e) = ev.dyn_ref::<WheelEvent>() else { return };
            e.prevent_default();
            let at = mouse_point(e, &canvas_w.get_bounding_client_rect());
            dispatch(InputEvent::Wheel { at, delta_y: e.delta_y() });
        })?;
    }
    // Touch handlers prevent default so the browser does not also synthesize mouse events.
    {
        let canvas_t = canvas.clone();
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "touchstart", move |ev: Event| {
            let Some(e) = ev.dyn_ref::<TouchEvent>() else { return };
            e.prevent_default();
            let rect = canvas_t.get_bounding_client_rect();
            dispatch(InputEvent::TouchStart(touch_points(&e.touches(), &rect)));
        })?;
    }
    {
        let canvas_t = canvas.clone();
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "touchmove", move |ev: Event| {
            let Some(e) = ev.dyn_ref::<TouchEvent>() else { return };
            e.prevent_default();
            let rect = canvas_t.get_bounding_client_rect();
            dispatch(InputEvent::TouchMove(touch_points(&e.touches(), &rect)));
        })?;
    }
    {
        let canvas_t = canvas.clone();
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "touchend", move |ev: Event| {
            let Some(e) = ev.dyn_ref::<TouchEvent>() else { return };
            e.prevent_default();
            let rect = canvas_t.get_bounding_client_rect();
            let lifted = touch_points(&e.changed_touches(), &rect)
                .first()
                .copied()
                .unwrap_or_default();
            dispatch(InputEvent::TouchEnd {
                remaining: touch_points(&e.touches(), &rect),
                lifted,
            });
        })?;
    }
    {
        let dispatch = dispatch.clone();
        listeners.listen(&canvas, "touchcancel", move |ev: Event| {
            ev.prevent_default();
            dispatch(InputEvent::TouchCancel);
        })?;
    }
    {
        let draw_ref = draw_ref.clone();
        listeners.listen(&window, "resize", move |_ev: Event| {
            apply_canvas_size();
            redraw(&draw_ref);
        })?;
    }

    Ok(listeners)
}

fn mouse_point(e: &MouseEvent, rect: &DomRect) -> ScreenPoint {
    ScreenPoint::new(
        e.client_x() as f64 - rect.left(),
        e.client_y() as f64 - rect.top(),
    )
}

fn touch_points(list: &TouchList, rect: &DomRect) -> Vec<ScreenPoint> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| {
            ScreenPoint::new(
                t.client_x() as f64 - rect.left(),
                t.client_y() as f64 - rect.top(),
            )
        })
        .collect()
}

/// DOM listeners owned by the mounted view; removed again on drop.
#[derive(Default)]
struct Listeners {
    attached: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
}

impl Listeners {
    fn listen<F>(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: F,
    ) -> Result<(), SurfaceError>
    where
        F: FnMut(Event) + 'static,
    {
        let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
            .map_err(|e| SurfaceError::Listener {
                event,
                reason: js_reason(&e),
            })?;
        self.attached.push((target.clone(), event, cb));
        Ok(())
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (target, event, cb) in &self.attached {
            let _ = target.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
        }
    }
}
