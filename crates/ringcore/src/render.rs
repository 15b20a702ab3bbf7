//! Composes one frame: clipped photo, fading ring, then text along the ring.

use crate::arc::{ArcLayout, ArcParams};
use crate::color::{color_or_black, color_with_alpha};
use crate::geom::{FrameGeometry, Point};
use crate::image::RasterImage;
use crate::style::{FrameStyle, TextStyle};
use crate::surface::{RenderError, Surface};
use crate::view::ViewState;

/// Everything a single frame is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct FrameScene<'a> {
    pub view: &'a ViewState,
    pub frame: &'a FrameStyle,
    pub text: &'a TextStyle,
    pub image: &'a RasterImage,
    pub canvas_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// No image was ready, the surface was left untouched.
    Skipped,
    Drawn(ArcLayout),
}

pub fn render_frame<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &FrameScene<'_>,
) -> Result<ArcLayout, RenderError> {
    let geometry = FrameGeometry::with_canvas(scene.canvas_size, scene.frame.frame_width);
    let center = geometry.center();

    surface.clear()?;
    surface.save()?;
    surface.clip_circle(center, geometry.clip_radius())?;

    draw_photo(surface, scene, center)?;

    let ring_radius = geometry.ring_radius();
    let params = ArcParams::from_style(scene.frame, ring_radius);
    let text = scene.text.text.as_str();
    if !text.is_empty() {
        surface.set_font(&scene.text.font())?;
    }
    let layout = ArcLayout::compute(text, params, |s| surface.measure_text(s))?;

    if surface.capabilities().conic_gradient {
        let ring = color_with_alpha(&scene.frame.frame_color, 1.0);
        let gradient = layout.fade_gradient(center, ring.color);
        surface.stroke_conic_circle(center, ring_radius, geometry.frame_width, &gradient)?;
    } else {
        log::debug!("surface has no conic gradients, ring fade omitted");
    }

    // only the ring stops force opacity, text keeps the alpha it was given
    let text_color = color_or_black(&scene.text.text_color);
    let mut buf = [0u8; 4];
    for glyph in &layout.glyphs {
        surface.fill_glyph(
            glyph.glyph.encode_utf8(&mut buf),
            glyph.anchor(center, ring_radius),
            glyph.rotation(),
            text_color,
        )?;
    }

    surface.restore()?;
    Ok(layout)
}

/// Draws the photo so its shorter side fills the canvas, under the view's
/// pan and zoom (about the canvas centre).
fn draw_photo<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &FrameScene<'_>,
    center: Point,
) -> Result<(), RenderError> {
    let offset = scene.view.offset();
    let (nw, nh) = (
        f64::from(scene.image.natural_width()),
        f64::from(scene.image.natural_height()),
    );
    let fit = scene.canvas_size / nw.min(nh);
    let (w, h) = (nw * fit, nh * fit);

    surface.save()?;
    surface.translate(center.x + offset.x, center.y + offset.y);
    surface.scale(scene.view.scale());
    surface.translate(-center.x, -center.y);
    surface.draw_image(
        scene.image,
        Point::new(center.x - w / 2.0, center.y - h / 2.0),
        w,
        h,
    )?;
    surface.restore()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CANVAS_SIZE;
    use crate::surface::recording::{Op, RecordingSurface};
    use cairo::{Format, ImageSurface};
    use std::f64::consts::FRAC_PI_2;

    fn image(w: i32, h: i32) -> RasterImage {
        RasterImage::from_surface(ImageSurface::create(Format::ARgb32, w, h).unwrap())
    }

    fn render(
        surface: &mut RecordingSurface,
        view: &ViewState,
        frame: &FrameStyle,
        text: &TextStyle,
        canvas_size: f64,
    ) -> ArcLayout {
        let img = image(4, 2);
        let scene = FrameScene {
            view,
            frame,
            text,
            image: &img,
            canvas_size,
        };
        render_frame(surface, &scene).unwrap()
    }

    #[test]
    fn test_draw_order_and_photo_transform() {
        let mut surface = RecordingSurface::new(10.0);
        let mut view = ViewState::default();
        let frame = FrameStyle::default();
        let geometry = FrameGeometry::new(frame.frame_width);
        view.set_scale(2.0, &geometry);
        view.apply_pan(Point::new(30.0, -20.0), &geometry);
        let text = TextStyle {
            text: "HI".into(),
            ..TextStyle::default()
        };

        render(&mut surface, &view, &frame, &text, CANVAS_SIZE);

        let c = 500.0;
        assert_eq!(
            surface.ops[..9],
            [
                Op::Clear,
                Op::Save,
                Op::ClipCircle(Point::new(c, c), 500.0),
                Op::Save,
                Op::Translate(c + 30.0, c - 20.0),
                Op::Scale(2.0),
                Op::Translate(-c, -c),
                Op::DrawImage {
                    origin: Point::new(-500.0, 0.0),
                    width: 2000.0,
                    height: 1000.0,
                },
                Op::Restore,
            ]
        );
        assert_eq!(surface.ops[9], Op::SetFont(text.font()));
        assert!(matches!(surface.ops[10], Op::StrokeConic { radius, line_width, .. }
            if radius == 440.0 && line_width == 120.0));
        assert_eq!(surface.glyphs().len(), 2);
        assert_eq!(surface.ops.last(), Some(&Op::Restore));
    }

    #[test]
    fn test_glyphs_follow_layout() {
        // canvas 500 with frame 100 puts the text circle at radius 200
        let mut surface = RecordingSurface::new(10.0);
        let frame = FrameStyle {
            frame_width: 100.0,
            angle_deg: 90.0,
            ..FrameStyle::default()
        };
        let text = TextStyle {
            text: "AB".into(),
            text_color: "#ffffff".into(),
            ..TextStyle::default()
        };

        let layout = render(&mut surface, &ViewState::default(), &frame, &text, 500.0);
        assert!((layout.text_angle - 0.1).abs() < 1e-12);

        let glyphs = surface.glyphs();
        let (a, a_at, a_rot) = glyphs[0];
        let (b, _, b_rot) = glyphs[1];
        assert_eq!((a, b), ("A", "B"));

        let a_mid = FRAC_PI_2 + 0.05 - 0.025;
        let expected = Point::new(250.0, 250.0).polar(200.0, a_mid);
        assert!((a_at.x - expected.x).abs() < 1e-9);
        assert!((a_at.y - expected.y).abs() < 1e-9);
        assert!((a_rot - (a_mid - FRAC_PI_2)).abs() < 1e-12);
        assert!(b_rot < a_rot);
    }

    #[test]
    fn test_empty_text_draws_ring_only() {
        let mut surface = RecordingSurface::new(10.0);
        let text = TextStyle {
            text: String::new(),
            ..TextStyle::default()
        };

        let layout = render(
            &mut surface,
            &ViewState::default(),
            &FrameStyle::default(),
            &text,
            CANVAS_SIZE,
        );

        assert_eq!(layout.text_angle, 0.0);
        assert!(surface.glyphs().is_empty());
        assert!(!surface.ops.iter().any(|op| matches!(op, Op::SetFont(_))));
        let gradient = surface
            .ops
            .iter()
            .find_map(|op| match op {
                Op::StrokeConic { gradient, .. } => Some(gradient),
                _ => None,
            })
            .unwrap();
        let pad = 5f64.to_radians();
        assert!((gradient.start_angle - (120f64.to_radians() - pad)).abs() < 1e-12);
    }

    #[test]
    fn test_ring_omitted_without_conic_support() {
        let mut surface = RecordingSurface::new(10.0).without_conic();
        render(
            &mut surface,
            &ViewState::default(),
            &FrameStyle::default(),
            &TextStyle::default(),
            CANVAS_SIZE,
        );

        assert!(!surface
            .ops
            .iter()
            .any(|op| matches!(op, Op::StrokeConic { .. })));
        assert_eq!(surface.glyphs().len(), "#OPENTOWORK".len());
    }

    #[test]
    fn test_gradient_uses_frame_color() {
        let mut surface = RecordingSurface::new(10.0);
        let frame = FrameStyle {
            frame_color: "red".into(),
            ..FrameStyle::default()
        };
        render(
            &mut surface,
            &ViewState::default(),
            &frame,
            &TextStyle::default(),
            CANVAS_SIZE,
        );
        let Some(Op::StrokeConic { gradient, .. }) = surface
            .ops
            .iter()
            .find(|op| matches!(op, Op::StrokeConic { .. }))
        else {
            panic!("ring not stroked");
        };
        for stop in &gradient.stops {
            assert_eq!(stop.color.red, 1.0);
            assert_eq!(stop.color.green, 0.0);
        }
    }

    #[test]
    fn test_text_keeps_its_own_alpha() {
        let mut surface = RecordingSurface::new(10.0);
        let text = TextStyle {
            text: "A".into(),
            text_color: "rgba(255, 255, 255, 0.5)".into(),
            ..TextStyle::default()
        };
        let frame = FrameStyle {
            frame_color: "#10703880".into(),
            ..FrameStyle::default()
        };
        render(&mut surface, &ViewState::default(), &frame, &text, CANVAS_SIZE);

        let glyph_alpha = surface.ops.iter().find_map(|op| match op {
            Op::Glyph { color, .. } => Some(color.alpha),
            _ => None,
        });
        assert_eq!(glyph_alpha, Some(0.5));

        let Some(Op::StrokeConic { gradient, .. }) = surface
            .ops
            .iter()
            .find(|op| matches!(op, Op::StrokeConic { .. }))
        else {
            panic!("ring not stroked");
        };
        assert_eq!(gradient.stops[1].color.alpha, 1.0);
    }
}
