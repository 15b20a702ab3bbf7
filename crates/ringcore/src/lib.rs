pub mod macros;

pub mod arc;
pub mod canvas;
pub mod color;
pub mod control;
pub mod geom;
pub mod gesture;
pub mod image;
pub mod render;
pub mod session;
pub mod style;
pub mod surface;
pub mod view;
