//! Drawing surface abstraction the frame renderer draws through.

use crate::geom::Point;
use crate::image::RasterImage;
use crate::style::FontSpec;
use palette::Srgba;
use std::f64::consts::TAU;
use thiserror::Error;

mod cairo_backend;

#[cfg(test)]
pub(crate) mod recording;

pub use cairo_backend::CairoSurface;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("Surface data is borrowed elsewhere: {0}")]
    Borrow(#[from] cairo::BorrowError),
}

/// Optional features of a surface, checked once when the surface is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub conic_gradient: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            conic_gradient: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Srgba<f64>,
}

/// Gradient swept clockwise around `center`, starting at `start_angle`.
///
/// Stop offsets are fractions of a full turn in `[0, 1]`, in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConicGradient {
    pub center: Point,
    pub start_angle: f64,
    pub stops: Vec<GradientStop>,
}

impl ConicGradient {
    pub fn new(center: Point, start_angle: f64) -> Self {
        Self {
            center,
            start_angle,
            stops: Vec::new(),
        }
    }

    pub fn add_stop(&mut self, offset: f64, color: Srgba<f64>) {
        self.stops.push(GradientStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        });
    }

    /// Colour at `offset` (fraction of a turn past `start_angle`). Outside the
    /// first and last stops the end colours are held.
    pub fn color_at(&self, offset: f64) -> Srgba<f64> {
        let Some(first) = self.stops.first() else {
            return Srgba::new(0.0, 0.0, 0.0, 0.0);
        };
        if offset <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if offset <= b.offset {
                let span = b.offset - a.offset;
                let t = if span > 0.0 {
                    (offset - a.offset) / span
                } else {
                    1.0
                };
                return lerp(a.color, b.color, t);
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    /// Offsets where the colour function has a kink, plus both ends of the
    /// turn.
    pub fn breakpoints(&self) -> Vec<f64> {
        let mut points: Vec<f64> = std::iter::once(0.0)
            .chain(self.stops.iter().map(|s| s.offset))
            .chain(std::iter::once(1.0))
            .collect();
        points.sort_by(f64::total_cmp);
        points.dedup();
        points
    }

    pub fn angle_at(&self, offset: f64) -> f64 {
        self.start_angle + offset * TAU
    }
}

fn lerp(a: Srgba<f64>, b: Srgba<f64>, t: f64) -> Srgba<f64> {
    let mix = |x: f64, y: f64| x + (y - x) * t;
    Srgba::new(
        mix(a.red, b.red),
        mix(a.green, b.green),
        mix(a.blue, b.blue),
        mix(a.alpha, b.alpha),
    )
}

/// The operations the frame renderer needs from a 2D backend.
pub trait Surface {
    fn capabilities(&self) -> Capabilities;

    fn clear(&mut self) -> Result<(), RenderError>;

    fn save(&mut self) -> Result<(), RenderError>;

    fn restore(&mut self) -> Result<(), RenderError>;

    /// Intersects the current clip with a circle.
    fn clip_circle(&mut self, center: Point, radius: f64) -> Result<(), RenderError>;

    fn translate(&mut self, dx: f64, dy: f64);

    fn scale(&mut self, factor: f64);

    /// Draws the whole of `image` into the rectangle at `origin` of the given
    /// size, in current user space.
    fn draw_image(
        &mut self,
        image: &RasterImage,
        origin: Point,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError>;

    /// Strokes a full circle with a conic gradient and round caps. Only
    /// called when `capabilities().conic_gradient` is set.
    fn stroke_conic_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        gradient: &ConicGradient,
    ) -> Result<(), RenderError>;

    fn set_font(&mut self, font: &FontSpec) -> Result<(), RenderError>;

    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> Result<f64, RenderError>;

    /// Draws `glyph` with its start at `at`, vertically centred on the
    /// baseline, rotated by `rotation` radians around `at`.
    fn fill_glyph(
        &mut self,
        glyph: &str,
        at: Point,
        rotation: f64,
        color: Srgba<f64>,
    ) -> Result<(), RenderError>;
}
