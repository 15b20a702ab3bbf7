use cairo::{Format, ImageSurface};
use gdk_pixbuf::Pixbuf;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] glib::Error),
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("Surface data is borrowed elsewhere: {0}")]
    Borrow(#[from] cairo::BorrowError),
}

/// A decoded photo, held as a premultiplied ARGB32 surface ready to paint.
#[derive(Clone)]
pub struct RasterImage {
    surface: ImageSurface,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("natural_width", &self.natural_width())
            .field("natural_height", &self.natural_height())
            .finish()
    }
}

impl RasterImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let pixbuf = Pixbuf::from_file(path.as_ref())?;
        Self::from_pixbuf(&pixbuf)
    }

    pub fn from_pixbuf(pixbuf: &Pixbuf) -> Result<Self, ImageError> {
        let (width, height) = (pixbuf.width(), pixbuf.height());
        let mut surface = ImageSurface::create(Format::ARgb32, width, height)?;

        let src = pixbuf.read_pixel_bytes();
        let src_stride = pixbuf.rowstride() as usize;
        let channels = pixbuf.n_channels() as usize;
        let has_alpha = pixbuf.has_alpha();
        let dst_stride = surface.stride() as usize;

        {
            let mut dst = surface.data()?;
            for y in 0..height as usize {
                for x in 0..width as usize {
                    let s = y * src_stride + x * channels;
                    let a = if has_alpha { src[s + 3] } else { 255 };
                    let premul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u32;
                    let pixel = (u32::from(a) << 24)
                        | (premul(src[s]) << 16)
                        | (premul(src[s + 1]) << 8)
                        | premul(src[s + 2]);
                    let d = y * dst_stride + x * 4;
                    dst[d..d + 4].copy_from_slice(&pixel.to_ne_bytes());
                }
            }
        }

        Ok(Self { surface })
    }

    /// Wraps an already decoded surface.
    pub fn from_surface(surface: ImageSurface) -> Self {
        Self { surface }
    }

    pub fn natural_width(&self) -> i32 {
        self.surface.width()
    }

    pub fn natural_height(&self) -> i32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }
}

/// Decode progress of the session's photo. Only a loaded image is drawn.
#[derive(Debug, Clone, Default)]
pub enum ImageState {
    #[default]
    Pending,
    Loaded(RasterImage),
    Failed(String),
}

impl ImageState {
    pub fn loaded(&self) -> Option<&RasterImage> {
        match self {
            Self::Loaded(image) => Some(image),
            _ => None,
        }
    }
}
