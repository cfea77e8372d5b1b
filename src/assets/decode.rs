use anyhow::Context;

use crate::foundation::buffer::PixelBuffer;
use crate::foundation::error::IconStackResult;

/// Decode encoded image bytes and convert to a premultiplied [`PixelBuffer`].
pub fn decode_image(bytes: &[u8]) -> IconStackResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    PixelBuffer::from_straight_rgba(dyn_img.to_rgba8())
}
