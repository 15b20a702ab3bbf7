//! Places text along a circle, one glyph at a time by measured width.

use crate::geom::{Point, angular_length};
use crate::style::FrameStyle;
use crate::surface::ConicGradient;
use palette::{Srgb, Srgba};
use std::f64::consts::{FRAC_PI_2, TAU};

pub const DEFAULT_FADE_ZONE: f64 = 0.25;
pub const DEFAULT_FADE_PAD_DEG: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// Angle the text is centred on, in radians.
    pub center_angle: f64,
    /// Radius of the circle the glyphs sit on.
    pub radius: f64,
    pub fade_zone: f64,
    pub fade_pad: f64,
}

impl ArcParams {
    pub fn new(center_angle: f64, radius: f64) -> Self {
        Self {
            center_angle,
            radius,
            fade_zone: DEFAULT_FADE_ZONE,
            fade_pad: DEFAULT_FADE_PAD_DEG.to_radians(),
        }
    }

    pub fn from_style(style: &FrameStyle, radius: f64) -> Self {
        Self {
            center_angle: style.angle_deg.to_radians(),
            radius,
            fade_zone: style.fade_zone,
            fade_pad: style.fade_pad_deg.to_radians(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub glyph: char,
    /// Angle of the glyph's centre on the circle.
    pub mid_angle: f64,
    /// Angular width the glyph occupies.
    pub span: f64,
}

impl GlyphPlacement {
    pub fn anchor(&self, center: Point, radius: f64) -> Point {
        center.polar(radius, self.mid_angle)
    }

    /// Rotation that makes the glyph's baseline tangent to the circle.
    pub fn rotation(&self) -> f64 {
        self.mid_angle - FRAC_PI_2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcLayout {
    pub params: ArcParams,
    /// Angular length of the whole string.
    pub text_angle: f64,
    /// Fade margin on each side of the text.
    pub fade_angle: f64,
    pub glyphs: Vec<GlyphPlacement>,
}

impl ArcLayout {
    /// Lays out `text` centred on `params.center_angle`, walking glyphs from
    /// the high-angle end downwards.
    ///
    /// `measure` must use the same font the glyphs will be drawn with.
    pub fn compute<E>(
        text: &str,
        params: ArcParams,
        mut measure: impl FnMut(&str) -> Result<f64, E>,
    ) -> Result<Self, E> {
        let text_angle = if text.is_empty() {
            0.0
        } else {
            angular_length(measure(text)?, params.radius)
        };
        let fade_angle = text_angle * params.fade_zone + params.fade_pad;

        let mut glyphs = Vec::with_capacity(text.len());
        let mut current = params.center_angle + text_angle / 2.0;
        let mut buf = [0u8; 4];
        for glyph in text.chars() {
            let span = angular_length(measure(glyph.encode_utf8(&mut buf))?, params.radius);
            glyphs.push(GlyphPlacement {
                glyph,
                mid_angle: current - span / 2.0,
                span,
            });
            current -= span;
        }

        log::trace!(
            "arc layout: {} glyphs, text {:.4} rad, fade {:.4} rad",
            glyphs.len(),
            text_angle,
            fade_angle
        );

        Ok(Self {
            params,
            text_angle,
            fade_angle,
            glyphs,
        })
    }

    /// Angle where the fade-in of the ring begins.
    pub fn fade_start(&self) -> f64 {
        self.params.center_angle - self.text_angle / 2.0 - self.fade_angle
    }

    /// Ring gradient that is opaque under the text and fades out on both
    /// sides of it.
    pub fn fade_gradient(&self, center: Point, color: Srgb<f64>) -> ConicGradient {
        let opaque = Srgba::new(color.red, color.green, color.blue, 1.0);
        let clear = Srgba::new(color.red, color.green, color.blue, 0.0);

        let mut gradient = ConicGradient::new(center, self.fade_start());
        gradient.add_stop(0.0, clear);
        gradient.add_stop(self.fade_angle / TAU, opaque);
        gradient.add_stop((self.fade_angle + self.text_angle) / TAU, opaque);
        gradient.add_stop((2.0 * self.fade_angle + self.text_angle) / TAU, clear);
        gradient
    }
}
