//! Widget input controllers. Pointer positions leave this module in canvas
//! coordinates, touch points in widget pixels.

use crate::gui::app::{AppModel, AppMsg};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::ComponentSender;
use ringcore::geom::Point;
use ringcore::gesture::InputEvent;
use std::cell::Cell;
use std::rc::Rc;

/// Where the canvas was last painted inside the drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFit {
    origin: Point,
    scale: f64,
}

impl Default for DisplayFit {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            scale: 1.0,
        }
    }
}

impl DisplayFit {
    /// Largest centred square that fits a `width` x `height` widget.
    pub fn new(width: f64, height: f64, canvas_size: f64) -> Self {
        let side = width.min(height);
        if side <= 0.0 || canvas_size <= 0.0 {
            return Self::default();
        }
        Self {
            origin: Point::new((width - side) / 2.0, (height - side) / 2.0),
            scale: side / canvas_size,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Widget pixels per canvas pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_canvas(&self, x: f64, y: f64) -> Point {
        Point::new(
            (x - self.origin.x) / self.scale,
            (y - self.origin.y) / self.scale,
        )
    }
}

/// Touch points stay in widget pixels so pinch sensitivity does not depend
/// on how large the canvas is displayed.
pub fn touch_move(points: &[(f64, f64)]) -> InputEvent {
    InputEvent::TouchMove(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
}

pub fn attach(
    area: &gtk::DrawingArea,
    fit: Rc<Cell<DisplayFit>>,
    sender: ComponentSender<AppModel>,
) {
    let drag = gtk::GestureDrag::new();
    {
        let (fit, sender) = (fit.clone(), sender.clone());
        drag.connect_drag_begin(move |_, x, y| {
            let p = fit.get().to_canvas(x, y);
            sender.input(AppMsg::Input(InputEvent::PointerDown(p)));
        });
    }
    {
        let sender = sender.clone();
        drag.connect_drag_update(move |gesture, dx, dy| {
            if let Some((x, y)) = gesture.start_point() {
                let p = fit.get().to_canvas(x + dx, y + dy);
                sender.input(AppMsg::Input(InputEvent::PointerMove(p)));
            }
        });
    }
    {
        let sender = sender.clone();
        drag.connect_drag_end(move |_, _, _| {
            sender.input(AppMsg::Input(InputEvent::PointerUp));
        });
    }
    area.add_controller(drag);

    let motion = gtk::EventControllerMotion::new();
    {
        let sender = sender.clone();
        motion.connect_leave(move |_| {
            sender.input(AppMsg::Input(InputEvent::PointerLeave));
        });
    }
    area.add_controller(motion);

    let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
    {
        let sender = sender.clone();
        scroll.connect_scroll(move |_, _, dy| {
            sender.input(AppMsg::Input(InputEvent::Wheel { delta_y: dy }));
            glib::Propagation::Stop
        });
    }
    area.add_controller(scroll);

    let zoom = gtk::GestureZoom::new();
    {
        let sender = sender.clone();
        zoom.connect_scale_changed(move |gesture, _| {
            let points: Vec<(f64, f64)> = gesture
                .sequences()
                .iter()
                .filter_map(|seq| gesture.point(Some(seq)))
                .collect();
            sender.input(AppMsg::Input(touch_move(&points)));
        });
    }
    {
        let sender = sender.clone();
        zoom.connect_end(move |_, _| {
            sender.input(AppMsg::Input(InputEvent::TouchEnd));
        });
    }
    area.add_controller(zoom);

    let drop_target =
        gtk::DropTarget::new(gtk::gio::File::static_type(), gtk::gdk::DragAction::COPY);
    drop_target.connect_drop(move |_, value, _, _| {
        let Some(path) = value.get::<gtk::gio::File>().ok().and_then(|f| f.path()) else {
            log::warn!("Dropped item is not a local file");
            return false;
        };
        sender.input(AppMsg::LoadImage(path));
        true
    });
    area.add_controller(drop_target);
}
