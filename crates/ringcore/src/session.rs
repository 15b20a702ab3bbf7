use crate::geom::{CANVAS_SIZE, FrameGeometry, Point};
use crate::gesture::{GestureMapper, InputEvent};
use crate::image::{ImageState, RasterImage};
use crate::render::{FrameScene, RenderOutcome, render_frame};
use crate::style::{FrameStyle, TextStyle};
use crate::surface::{RenderError, Surface};
use crate::view::ViewState;
use std::path::{Path, PathBuf};

/// One editor instance: the photo, its styles, the pan/zoom view and the
/// gesture state driving it.
///
/// Every mutation marks the session dirty; hosts redraw when
/// [`EditorSession::take_dirty`] says so.
#[derive(Debug)]
pub struct EditorSession {
    view: ViewState,
    frame: FrameStyle,
    text: TextStyle,
    image: ImageState,
    /// Latest image asked for; decode results for anything else are stale.
    image_request: Option<PathBuf>,
    gestures: GestureMapper,
    canvas_size: f64,
    dirty: bool,
}

impl EditorSession {
    pub fn new(frame: FrameStyle, text: TextStyle) -> Self {
        Self {
            view: ViewState::default(),
            frame,
            text,
            image: ImageState::Pending,
            image_request: None,
            gestures: GestureMapper::new(),
            canvas_size: CANVAS_SIZE,
            dirty: true,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn frame_style(&self) -> &FrameStyle {
        &self.frame
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text
    }

    pub fn image(&self) -> &ImageState {
        &self.image
    }

    pub fn canvas_size(&self) -> f64 {
        self.canvas_size
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::with_canvas(self.canvas_size, self.frame.frame_width)
    }

    pub fn set_frame_style(&mut self, frame: FrameStyle) {
        if frame == self.frame {
            return;
        }
        self.frame = frame;
        // offset bounds depend on the frame width
        let geometry = self.geometry();
        self.view.reclamp(&geometry);
        self.dirty = true;
    }

    pub fn set_text_style(&mut self, text: TextStyle) {
        if text == self.text {
            return;
        }
        self.text = text;
        self.dirty = true;
    }

    /// Drops the current photo while `path` decodes. Supersedes any request
    /// still in flight.
    pub fn request_image(&mut self, path: impl Into<PathBuf>) {
        self.image = ImageState::Pending;
        self.image_request = Some(path.into());
    }

    pub fn pending_request(&self) -> Option<&Path> {
        self.image_request.as_deref()
    }

    /// Whether a decode result for `path` answers the latest request.
    pub fn is_current_request(&self, path: &Path) -> bool {
        self.image_request.as_deref() == Some(path)
    }

    /// Installs the decoded `image` if `path` is still the latest request.
    /// Returns whether it was installed.
    pub fn complete_image_request(&mut self, path: &Path, image: RasterImage) -> bool {
        if !self.is_current_request(path) {
            log::debug!("dropping stale decode of {}", path.display());
            return false;
        }
        self.image_request = None;
        self.image_loaded(image);
        true
    }

    /// Records a decode failure if `path` is still the latest request.
    pub fn fail_image_request(&mut self, path: &Path, reason: impl Into<String>) -> bool {
        if !self.is_current_request(path) {
            log::debug!("ignoring failure of stale request {}", path.display());
            return false;
        }
        self.image_request = None;
        self.image_failed(format!("{}: {}", path.display(), reason.into()));
        true
    }

    /// Installs a freshly decoded photo and resets pan and zoom.
    pub fn image_loaded(&mut self, image: RasterImage) {
        log::info!(
            "image loaded: {}x{}",
            image.natural_width(),
            image.natural_height()
        );
        self.image = ImageState::Loaded(image);
        self.view.reset();
        self.dirty = true;
    }

    pub fn image_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("image failed to load: {}", reason);
        self.image = ImageState::Failed(reason);
    }

    pub fn set_scale(&mut self, scale: f64) -> f64 {
        let geometry = self.geometry();
        let before = self.view;
        let scale = self.view.set_scale(scale, &geometry);
        self.dirty |= self.view != before;
        scale
    }

    pub fn pan(&mut self, delta: Point) -> Point {
        let geometry = self.geometry();
        let before = self.view;
        let offset = self.view.apply_pan(delta, &geometry);
        self.dirty |= self.view != before;
        offset
    }

    pub fn reset_view(&mut self) {
        if self.view != ViewState::default() {
            self.view.reset();
            self.dirty = true;
        }
    }

    /// Feeds one input event through the gesture mapper. Returns whether the
    /// view changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let geometry = self.geometry();
        let changed = self.gestures.handle(event, &mut self.view, &geometry);
        self.dirty |= changed;
        changed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Draws the current state onto `surface`. Leaves the surface untouched
    /// while no image is loaded.
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<RenderOutcome, RenderError> {
        let Some(image) = self.image.loaded() else {
            log::trace!("render skipped, no image loaded");
            self.dirty = false;
            return Ok(RenderOutcome::Skipped);
        };

        let scene = FrameScene {
            view: &self.view,
            frame: &self.frame,
            text: &self.text,
            image,
            canvas_size: self.canvas_size,
        };
        // a failed frame stays dirty so the next draw retries it
        let layout = render_frame(surface, &scene)?;
        self.dirty = false;
        log::debug!(
            "frame rendered: scale {:.2}, offset ({:.1}, {:.1}), {} glyphs",
            self.view.scale(),
            self.view.offset().x,
            self.view.offset().y,
            layout.glyphs.len()
        );
        Ok(RenderOutcome::Drawn(layout))
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(FrameStyle::default(), TextStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::RecordingSurface;
    use cairo::{Format, ImageSurface};

    fn image() -> RasterImage {
        RasterImage::from_surface(ImageSurface::create(Format::ARgb32, 8, 6).unwrap())
    }

    #[test]
    fn test_render_skips_until_image_loaded() {
        let mut session = EditorSession::default();
        let mut surface = RecordingSurface::new(10.0);

        assert_eq!(session.render(&mut surface).unwrap(), RenderOutcome::Skipped);
        assert!(surface.ops.is_empty());

        session.image_failed("corrupt");
        assert_eq!(session.render(&mut surface).unwrap(), RenderOutcome::Skipped);
        assert!(surface.ops.is_empty());

        session.image_loaded(image());
        assert!(matches!(
            session.render(&mut surface).unwrap(),
            RenderOutcome::Drawn(_)
        ));
        assert!(!surface.ops.is_empty());
    }

    #[test]
    fn test_image_load_resets_view() {
        let mut session = EditorSession::default();
        session.image_loaded(image());
        session.set_scale(3.0);
        session.pan(Point::new(250.0, -90.0));
        assert_ne!(*session.view(), ViewState::default());

        session.image_loaded(image());
        assert_eq!(session.view().scale(), 1.0);
        assert_eq!(session.view().offset(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_dirty_flag_tracks_changes() {
        let mut session = EditorSession::default();
        assert!(session.take_dirty());
        assert!(!session.take_dirty());

        session.set_text_style(TextStyle::default());
        assert!(!session.is_dirty());

        session.set_text_style(TextStyle {
            text: "HIRING".into(),
            ..TextStyle::default()
        });
        assert!(session.take_dirty());

        // at scale 1 a 120px frame allows 120px of travel
        session.pan(Point::new(10.0, 0.0));
        assert!(session.take_dirty());
        session.pan(Point::new(0.0, 0.0));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_wider_frame_reclamps_offset() {
        let mut session = EditorSession::default();
        session.pan(Point::new(120.0, 120.0));
        assert_eq!(session.view().offset(), Point::new(120.0, 120.0));

        session.set_frame_style(FrameStyle {
            frame_width: 40.0,
            ..FrameStyle::default()
        });
        assert_eq!(session.view().offset(), Point::new(40.0, 40.0));
    }

    #[test]
    fn test_gestures_mark_dirty() {
        let mut session = EditorSession::default();
        session.take_dirty();

        session.handle_input(&InputEvent::PointerDown(Point::new(0.0, 0.0)));
        assert!(!session.is_dirty());
        assert!(session.handle_input(&InputEvent::PointerMove(Point::new(5.0, 5.0))));
        assert!(session.take_dirty());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = EditorSession::default();
        let b = EditorSession::default();
        a.set_scale(2.5);
        assert_eq!(a.view().scale(), 2.5);
        assert_eq!(b.view().scale(), 1.0);
    }

    #[test]
    fn test_failed_render_stays_dirty() {
        let mut session = EditorSession::default();
        session.image_loaded(image());

        let mut broken = RecordingSurface::new(10.0).failing_measure();
        assert!(session.render(&mut broken).is_err());
        assert!(session.is_dirty());

        let mut surface = RecordingSurface::new(10.0);
        assert!(matches!(
            session.render(&mut surface).unwrap(),
            RenderOutcome::Drawn(_)
        ));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_only_latest_image_request_lands() {
        let mut session = EditorSession::default();
        let (a, b) = (Path::new("/photos/a.png"), Path::new("/photos/b.png"));

        session.request_image(a);
        session.request_image(b);
        assert_eq!(session.pending_request(), Some(b));

        assert!(!session.complete_image_request(a, image()));
        assert!(matches!(session.image(), ImageState::Pending));

        assert!(!session.fail_image_request(a, "truncated"));
        assert!(matches!(session.image(), ImageState::Pending));

        assert!(session.complete_image_request(b, image()));
        assert!(session.image().loaded().is_some());
        assert_eq!(session.pending_request(), None);

        // a late duplicate for b no longer matches anything
        assert!(!session.fail_image_request(b, "late"));
        assert!(session.image().loaded().is_some());
    }

    #[test]
    fn test_current_request_failure_is_recorded() {
        let mut session = EditorSession::default();
        let path = Path::new("/photos/broken.png");
        session.request_image(path);

        assert!(session.fail_image_request(path, "not an image"));
        assert!(matches!(session.image(), ImageState::Failed(reason)
            if reason.contains("broken.png") && reason.contains("not an image")));
    }
}
