//! The fixed-size output buffer the editor renders into and exports from.

use crate::geom::CANVAS_SIZE;
use crate::render::RenderOutcome;
use crate::session::EditorSession;
use crate::surface::{Capabilities, CairoSurface, RenderError};
use cairo::{Context, Format, ImageSurface};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),
}

pub struct Canvas {
    surface: ImageSurface,
    capabilities: Capabilities,
}

impl Canvas {
    pub fn new() -> Result<Self, RenderError> {
        Self::with_capabilities(Capabilities::default())
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Result<Self, RenderError> {
        let size = CANVAS_SIZE as i32;
        Ok(Self {
            surface: ImageSurface::create(Format::ARgb32, size, size)?,
            capabilities,
        })
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn size(&self) -> i32 {
        self.surface.width()
    }

    pub fn render(&self, session: &mut EditorSession) -> Result<RenderOutcome, RenderError> {
        let cr = Context::new(&self.surface)?;
        let mut surface = CairoSurface::with_capabilities(cr, self.capabilities);
        let outcome = session.render(&mut surface)?;
        self.surface.flush();
        Ok(outcome)
    }

    /// Un-premultiplied RGBA8 pixels, row-major.
    pub fn rgba_pixels(&mut self) -> Result<Vec<u8>, RenderError> {
        let (w, h) = (self.surface.width() as usize, self.surface.height() as usize);
        let stride = self.surface.stride() as usize;
        let data = self.surface.data()?;

        let mut out = Vec::with_capacity(w * h * 4);
        for y in 0..h {
            for x in 0..w {
                let i = y * stride + x * 4;
                let px = u32::from_ne_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
                let a = (px >> 24) as u8;
                let unpremul = |c: u32| -> u8 {
                    if a == 0 {
                        0
                    } else {
                        ((c & 0xff) * 255 / u32::from(a)).min(255) as u8
                    }
                };
                out.extend_from_slice(&[unpremul(px >> 16), unpremul(px >> 8), unpremul(px), a]);
            }
        }
        Ok(out)
    }

    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), ExportError> {
        self.surface.write_to_png(writer)?;
        Ok(())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let mut file = fs_err::File::create(path)?;
        self.write_png(&mut file)?;
        log::info!("exported {}", path.display());
        Ok(())
    }
}
