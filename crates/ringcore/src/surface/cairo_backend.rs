use super::{Capabilities, ConicGradient, RenderError, Surface};
use crate::geom::Point;
use crate::image::RasterImage;
use crate::style::FontSpec;
use cairo::{Context, FontSlant, LineCap, Mesh, MeshCorner, Operator};
use palette::Srgba;
use std::f64::consts::{FRAC_PI_8, TAU};

/// Cairo has no native conic gradient, so rings are painted with a mesh of
/// wedge patches no wider than this.
const MAX_WEDGE: f64 = FRAC_PI_8;

pub struct CairoSurface {
    cr: Context,
    capabilities: Capabilities,
}

impl CairoSurface {
    pub fn new(cr: Context) -> Self {
        Self::with_capabilities(cr, Capabilities::default())
    }

    pub fn with_capabilities(cr: Context, capabilities: Capabilities) -> Self {
        Self { cr, capabilities }
    }

    pub fn context(&self) -> &Context {
        &self.cr
    }

    fn set_color(&self, color: Srgba<f64>) {
        let (r, g, b, a) = color.into_components();
        self.cr.set_source_rgba(r, g, b, a);
    }
}

impl Surface for CairoSurface {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.cr.save()?;
        self.cr.set_operator(Operator::Clear);
        self.cr.paint()?;
        self.cr.restore()?;
        Ok(())
    }

    fn save(&mut self) -> Result<(), RenderError> {
        Ok(self.cr.save()?)
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        Ok(self.cr.restore()?)
    }

    fn clip_circle(&mut self, center: Point, radius: f64) -> Result<(), RenderError> {
        self.cr.new_path();
        self.cr.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
        self.cr.clip();
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.cr.translate(dx, dy);
    }

    fn scale(&mut self, factor: f64) {
        self.cr.scale(factor, factor);
    }

    fn draw_image(
        &mut self,
        image: &RasterImage,
        origin: Point,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError> {
        let (nw, nh) = (
            f64::from(image.natural_width()),
            f64::from(image.natural_height()),
        );
        if nw <= 0.0 || nh <= 0.0 {
            return Ok(());
        }

        self.cr.save()?;
        self.cr.translate(origin.x, origin.y);
        self.cr.scale(width / nw, height / nh);
        self.cr.set_source_surface(image.surface(), 0.0, 0.0)?;
        self.cr.source().set_filter(cairo::Filter::Good);
        self.cr.paint()?;
        self.cr.restore()?;
        Ok(())
    }

    fn stroke_conic_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        gradient: &ConicGradient,
    ) -> Result<(), RenderError> {
        let mesh = conic_mesh(gradient, radius + line_width);

        self.cr.save()?;
        self.cr.set_source(&mesh)?;
        self.cr.set_line_width(line_width);
        self.cr.set_line_cap(LineCap::Round);
        self.cr.new_path();
        self.cr.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
        self.cr.stroke()?;
        self.cr.restore()?;
        Ok(())
    }

    fn set_font(&mut self, font: &FontSpec) -> Result<(), RenderError> {
        let weight = if font.weight.is_bold() {
            cairo::FontWeight::Bold
        } else {
            cairo::FontWeight::Normal
        };
        self.cr
            .select_font_face(font.family.as_str(), FontSlant::Normal, weight);
        self.cr.set_font_size(font.size);
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> Result<f64, RenderError> {
        Ok(self.cr.text_extents(text)?.x_advance())
    }

    fn fill_glyph(
        &mut self,
        glyph: &str,
        at: Point,
        rotation: f64,
        color: Srgba<f64>,
    ) -> Result<(), RenderError> {
        let extents = self.cr.font_extents()?;

        self.cr.save()?;
        self.cr.translate(at.x, at.y);
        self.cr.rotate(rotation);
        self.set_color(color);
        // centre the em box vertically on the anchor
        self.cr
            .move_to(0.0, (extents.ascent() - extents.descent()) / 2.0);
        self.cr.show_text(glyph)?;
        self.cr.restore()?;
        Ok(())
    }
}

/// Builds a mesh pattern approximating a conic gradient out to `reach`.
///
/// Each patch is a wedge from the centre. Splitting at every stop keeps the
/// colour linear inside a patch, so the mesh matches the gradient exactly.
fn conic_mesh(gradient: &ConicGradient, reach: f64) -> Mesh {
    let mesh = Mesh::new();
    let c = gradient.center;
    let breakpoints = gradient.breakpoints();

    for pair in breakpoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let arc = (to - from) * TAU;
        if arc <= 0.0 {
            continue;
        }
        let pieces = (arc / MAX_WEDGE).ceil().max(1.0) as usize;
        for i in 0..pieces {
            let o0 = from + (to - from) * i as f64 / pieces as f64;
            let o1 = from + (to - from) * (i + 1) as f64 / pieces as f64;
            add_wedge(
                &mesh,
                c,
                reach,
                gradient.angle_at(o0),
                gradient.angle_at(o1),
                gradient.color_at(o0),
                gradient.color_at(o1),
            );
        }
    }
    mesh
}

fn add_wedge(
    mesh: &Mesh,
    c: Point,
    r: f64,
    a0: f64,
    a1: f64,
    c0: Srgba<f64>,
    c1: Srgba<f64>,
) {
    let p0 = c.polar(r, a0);
    let p1 = c.polar(r, a1);
    // cubic Bézier handle length for a circular arc of (a1 - a0)
    let k = 4.0 / 3.0 * ((a1 - a0) / 4.0).tan() * r;
    let h0 = Point::new(p0.x - k * a0.sin(), p0.y + k * a0.cos());
    let h1 = Point::new(p1.x + k * a1.sin(), p1.y - k * a1.cos());

    mesh.begin_patch();
    mesh.move_to(c.x, c.y);
    mesh.line_to(p0.x, p0.y);
    mesh.curve_to(h0.x, h0.y, h1.x, h1.y, p1.x, p1.y);
    mesh.line_to(c.x, c.y);

    // corners follow the path: centre, p0, p1, centre again
    for (corner, color) in [
        (MeshCorner::MeshCorner0, c0),
        (MeshCorner::MeshCorner1, c0),
        (MeshCorner::MeshCorner2, c1),
        (MeshCorner::MeshCorner3, c1),
    ] {
        let (r, g, b, a) = color.into_components();
        mesh.set_corner_color_rgba(corner, r, g, b, a);
    }
    mesh.end_patch();
}
