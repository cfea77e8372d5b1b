//! Pixel producers: shapes, blur and text, each returning a fresh buffer.

pub(crate) mod bitmap_font;
pub(crate) mod blur;
pub(crate) mod canvas;
pub(crate) mod shapes;
pub(crate) mod text;
