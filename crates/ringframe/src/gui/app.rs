use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::input::{self, DisplayFit};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use ringcore::canvas::Canvas;
use ringcore::geom::CANVAS_SIZE;
use ringcore::gesture::InputEvent;
use ringcore::image::RasterImage;
use ringcore::session::EditorSession;
use ringcore::surface::{Capabilities, RenderError};
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::path::PathBuf;
use std::rc::Rc;

pub struct AppModel {
    pub session: Rc<RefCell<EditorSession>>,
    pub canvas: Rc<RefCell<Option<Canvas>>>,
    pub config: Config,
    pub decode_tx: async_channel::Sender<PathBuf>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Input(InputEvent),
    LoadImage(PathBuf),
    ImageDecoded(PathBuf, Pixbuf),
    ImageFailed(PathBuf, String),
    Export(Option<PathBuf>),
    ResetView,
    Zoom(f64),
    ConfigReload,
    OpenConfig,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
            AppEvent::LoadImage(p) => AppMsg::LoadImage(p),
            AppEvent::ImageDecoded(p, pixbuf) => AppMsg::ImageDecoded(p, pixbuf),
            AppEvent::ImageFailed(p, reason) => AppMsg::ImageFailed(p, reason),
            AppEvent::Export(p) => AppMsg::Export(p),
            AppEvent::ResetView => AppMsg::ResetView,
            AppEvent::Zoom(s) => AppMsg::Zoom(s),
        }
    }
}

fn build_canvas(config: &Config) -> Option<Canvas> {
    match Canvas::with_capabilities(Capabilities {
        conic_gradient: config.editor.conic_gradient,
    }) {
        Ok(c) => Some(c),
        Err(e) => {
            log::error!("Failed to create canvas: {}", e);
            None
        }
    }
}

/// Paints the backdrop and then the canvas, re-rendering it first if the
/// session changed since the last frame.
fn paint(
    cr: &cairo::Context,
    session: &mut EditorSession,
    canvas: Option<&Canvas>,
    fit: DisplayFit,
    colors: &ThemeColors,
) -> Result<(), RenderError> {
    let (r, g, b, a) = colors.backdrop.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.paint()?;

    let Some(canvas) = canvas else {
        return Ok(());
    };
    if session.is_dirty() {
        canvas.render(session)?;
    }

    cr.save()?;
    cr.translate(fit.origin().x, fit.origin().y);
    cr.scale(fit.scale(), fit.scale());

    if session.image().loaded().is_some() {
        cr.set_source_surface(canvas.surface(), 0.0, 0.0)?;
        cr.paint()?;
    } else {
        // empty ring as a drop hint
        let geometry = session.geometry();
        let center = geometry.center();
        let (r, g, b, a) = colors.placeholder.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.set_line_width(geometry.frame_width);
        cr.arc(center.x, center.y, geometry.ring_radius(), 0.0, TAU);
        cr.stroke()?;
    }

    cr.restore()?;
    Ok(())
}

/// Ctrl shortcuts, independent of Shift and Caps Lock.
fn shortcut(key: gtk::gdk::Key, state: gtk::gdk::ModifierType) -> Option<AppMsg> {
    use gtk::gdk::Key;

    if !state.contains(gtk::gdk::ModifierType::CONTROL_MASK) {
        return None;
    }
    match key.to_lower() {
        Key::s => Some(AppMsg::Export(None)),
        Key::r => Some(AppMsg::ResetView),
        Key::comma => Some(AppMsg::OpenConfig),
        _ => None,
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Config,
        async_channel::Sender<PathBuf>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            add_css_class: "ringframe-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, state| {
                    match shortcut(key, state) {
                        Some(msg) => {
                            sender.input(msg);
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "ringframe-drawing-area",
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, decode_tx, rx) = init;

        theme::load_css();
        window::init_window(&root);

        let session = EditorSession::new(config.frame.clone(), config.text.clone());
        let canvas = build_canvas(&config);

        let model = AppModel {
            session: Rc::new(RefCell::new(session)),
            canvas: Rc::new(RefCell::new(canvas)),
            config,
            decode_tx,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let fit = Rc::new(Cell::new(DisplayFit::default()));
        input::attach(&widgets.drawing_area, fit.clone(), sender.clone());

        let session_draw = model.session.clone();
        let canvas_draw = model.canvas.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                let display = DisplayFit::new(width as f64, height as f64, CANVAS_SIZE);
                fit.set(display);
                if let Err(e) = paint(
                    cr,
                    &mut session_draw.borrow_mut(),
                    canvas_draw.borrow().as_ref(),
                    display,
                    &colors,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        if let Some(path) = model.config.editor.image.clone() {
            sender.input(AppMsg::LoadImage(path));
        }

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Input(event) => {
                if self.session.borrow_mut().handle_input(&event) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::LoadImage(path) => {
                log::info!("Loading {}", path.display());
                window::set_title(&self.root, Some(path.as_path()));
                let mut session = self.session.borrow_mut();
                session.request_image(path.as_path());
                if let Err(e) = self.decode_tx.try_send(path.clone()) {
                    log::error!("Image decoder is not running: {}", e);
                    session.fail_image_request(&path, "image decoder unavailable");
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::ImageDecoded(path, pixbuf) => {
                let mut session = self.session.borrow_mut();
                if !session.is_current_request(&path) {
                    log::debug!("Dropping stale decode of {}", path.display());
                    return;
                }
                match RasterImage::from_pixbuf(&pixbuf) {
                    Ok(image) => {
                        session.complete_image_request(&path, image);
                    }
                    Err(e) => {
                        session.fail_image_request(&path, e.to_string());
                    }
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::ImageFailed(path, reason) => {
                if self.session.borrow_mut().fail_image_request(&path, reason) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Export(path) => {
                let path = path.unwrap_or_else(|| self.config.editor.export_path.clone());
                self.export(path);
            }
            AppMsg::ResetView => {
                self.session.borrow_mut().reset_view();
                self.drawing_area.queue_draw();
            }
            AppMsg::Zoom(scale) => {
                let applied = self.session.borrow_mut().set_scale(scale);
                log::debug!("zoom {} applied as {:.2}", scale, applied);
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.apply_config(new_config);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::OpenConfig => match config::write_default_config() {
                Ok(path) => {
                    if let Err(e) = std::process::Command::new("xdg-open").arg(&path).spawn() {
                        log::error!("Failed to open {}: {}", path.display(), e);
                    }
                }
                Err(e) => log::error!("Failed to write default config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn apply_config(&mut self, new_config: Config) {
        {
            let mut session = self.session.borrow_mut();
            session.set_frame_style(new_config.frame.clone());
            session.set_text_style(new_config.text.clone());
        }

        if new_config.editor.conic_gradient != self.config.editor.conic_gradient {
            *self.canvas.borrow_mut() = build_canvas(&new_config);
            self.session.borrow_mut().mark_dirty();
        }

        self.config = new_config;
        self.drawing_area.queue_draw();
    }

    fn export(&self, path: PathBuf) {
        let mut session = self.session.borrow_mut();
        if session.image().loaded().is_none() {
            log::warn!("Nothing to export, no image loaded");
            return;
        }
        let canvas = self.canvas.borrow();
        let Some(canvas) = canvas.as_ref() else {
            log::error!("Cannot export, canvas unavailable");
            return;
        };

        if session.is_dirty()
            && let Err(e) = canvas.render(&mut session)
        {
            log::error!("Render before export failed: {}", e);
            return;
        }
        if let Err(e) = canvas.save_png(&path) {
            log::error!("Export to {} failed: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtk::gdk::{Key, ModifierType};

    #[test]
    fn test_shortcuts_ignore_shift_and_caps_lock() {
        let ctrl = ModifierType::CONTROL_MASK;
        let shifted = ctrl | ModifierType::SHIFT_MASK;
        let caps = ctrl | ModifierType::LOCK_MASK;

        for (key, state) in [(Key::s, ctrl), (Key::S, shifted), (Key::S, caps)] {
            assert!(matches!(shortcut(key, state), Some(AppMsg::Export(None))));
        }
        assert!(matches!(shortcut(Key::R, caps), Some(AppMsg::ResetView)));
        assert!(matches!(shortcut(Key::comma, ctrl), Some(AppMsg::OpenConfig)));
    }

    #[test]
    fn test_shortcuts_need_control() {
        assert!(shortcut(Key::s, ModifierType::empty()).is_none());
        assert!(shortcut(Key::S, ModifierType::SHIFT_MASK).is_none());
        assert!(shortcut(Key::q, ModifierType::CONTROL_MASK).is_none());
    }
}
