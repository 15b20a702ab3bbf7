//! Turns pointer, wheel and touch input into pan and zoom changes.

use crate::geom::{FrameGeometry, Point};
use crate::view::{ViewState, clamp_scale};

pub const WHEEL_ZOOM_FACTOR: f64 = 0.001;
pub const PINCH_ZOOM_FACTOR: f64 = 0.005;

/// Pointer positions are in canvas coordinates. Touch points are in screen
/// pixels, so the pinch factor applies to finger travel.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary pointer pressed.
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    Wheel { delta_y: f64 },
    /// All currently active touch points, in screen pixels.
    TouchMove(Vec<Point>),
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        last: Point,
    },
}

/// Per-session gesture state: the drag in progress and the pinch baseline.
#[derive(Debug, Clone, Default)]
pub struct GestureMapper {
    drag: DragState,
    pinch_baseline: Option<f64>,
}

impl GestureMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn pinch_baseline(&self) -> Option<f64> {
        self.pinch_baseline
    }

    /// Applies `event` to `view`. Returns whether the view changed.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        view: &mut ViewState,
        geometry: &FrameGeometry,
    ) -> bool {
        let before = *view;

        match event {
            InputEvent::PointerDown(p) => {
                self.drag = DragState::Dragging { last: *p };
            }
            InputEvent::PointerMove(p) => {
                if let DragState::Dragging { last } = self.drag {
                    view.apply_pan(*p - last, geometry);
                    self.drag = DragState::Dragging { last: *p };
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.drag = DragState::Idle;
            }
            InputEvent::Wheel { delta_y } => {
                // wheel zoom is computed but not applied, only the offset is
                // re-clamped
                let candidate = clamp_scale(view.scale() - delta_y * WHEEL_ZOOM_FACTOR);
                log::trace!("wheel zoom candidate {:.3} ignored", candidate);
                view.reclamp(geometry);
            }
            InputEvent::TouchMove(touches) => {
                if let [a, b] = touches[..] {
                    self.pinch(a.distance(b), view, geometry);
                }
            }
            InputEvent::TouchEnd => {
                self.pinch_baseline = None;
            }
        }

        *view != before
    }

    fn pinch(&mut self, distance: f64, view: &mut ViewState, geometry: &FrameGeometry) {
        match self.pinch_baseline.replace(distance) {
            None => {
                view.reclamp(geometry);
            }
            Some(baseline) => {
                view.apply_zoom_delta((distance - baseline) * PINCH_ZOOM_FACTOR, geometry);
            }
        }
    }
}
