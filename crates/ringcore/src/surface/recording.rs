use super::{Capabilities, ConicGradient, RenderError, Surface};
use crate::geom::Point;
use crate::image::RasterImage;
use crate::style::FontSpec;
use palette::Srgba;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Clear,
    Save,
    Restore,
    ClipCircle(Point, f64),
    Translate(f64, f64),
    Scale(f64),
    DrawImage {
        origin: Point,
        width: f64,
        height: f64,
    },
    StrokeConic {
        radius: f64,
        line_width: f64,
        gradient: ConicGradient,
    },
    SetFont(FontSpec),
    Glyph {
        glyph: String,
        at: Point,
        rotation: f64,
        color: Srgba<f64>,
    },
}

/// Surface double that records draw calls and measures every char as a fixed
/// width.
#[derive(Debug)]
pub(crate) struct RecordingSurface {
    pub(crate) ops: Vec<Op>,
    pub(crate) capabilities: Capabilities,
    pub(crate) char_width: f64,
    /// Makes every text measurement fail, as a broken font backend would.
    pub(crate) fail_measure: bool,
}

impl RecordingSurface {
    pub(crate) fn new(char_width: f64) -> Self {
        Self {
            ops: Vec::new(),
            capabilities: Capabilities::default(),
            char_width,
            fail_measure: false,
        }
    }

    pub(crate) fn failing_measure(mut self) -> Self {
        self.fail_measure = true;
        self
    }

    pub(crate) fn without_conic(mut self) -> Self {
        self.capabilities.conic_gradient = false;
        self
    }

    pub(crate) fn glyphs(&self) -> Vec<(&str, Point, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Glyph {
                    glyph, at, rotation, ..
                } => Some((glyph.as_str(), *at, *rotation)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.ops.push(Op::Clear);
        Ok(())
    }

    fn save(&mut self) -> Result<(), RenderError> {
        self.ops.push(Op::Save);
        Ok(())
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        self.ops.push(Op::Restore);
        Ok(())
    }

    fn clip_circle(&mut self, center: Point, radius: f64) -> Result<(), RenderError> {
        self.ops.push(Op::ClipCircle(center, radius));
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(Op::Translate(dx, dy));
    }

    fn scale(&mut self, factor: f64) {
        self.ops.push(Op::Scale(factor));
    }

    fn draw_image(
        &mut self,
        _image: &RasterImage,
        origin: Point,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError> {
        self.ops.push(Op::DrawImage {
            origin,
            width,
            height,
        });
        Ok(())
    }

    fn stroke_conic_circle(
        &mut self,
        _center: Point,
        radius: f64,
        line_width: f64,
        gradient: &ConicGradient,
    ) -> Result<(), RenderError> {
        self.ops.push(Op::StrokeConic {
            radius,
            line_width,
            gradient: gradient.clone(),
        });
        Ok(())
    }

    fn set_font(&mut self, font: &FontSpec) -> Result<(), RenderError> {
        self.ops.push(Op::SetFont(font.clone()));
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> Result<f64, RenderError> {
        if self.fail_measure {
            return Err(RenderError::Cairo(cairo::Error::InvalidString));
        }
        Ok(text.chars().count() as f64 * self.char_width)
    }

    fn fill_glyph(
        &mut self,
        glyph: &str,
        at: Point,
        rotation: f64,
        color: Srgba<f64>,
    ) -> Result<(), RenderError> {
        self.ops.push(Op::Glyph {
            glyph: glyph.to_string(),
            at,
            rotation,
            color,
        });
        Ok(())
    }
}
