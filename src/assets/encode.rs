use std::io::Cursor;

use anyhow::Context;

use crate::foundation::buffer::PixelBuffer;
use crate::foundation::error::IconStackResult;

/// Whether an encoded file keeps its alpha channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// RGBA PNG (icon layers).
    Keep,
    /// RGB PNG (flattened banners and launch images).
    Drop,
}

/// Encode a buffer as PNG bytes.
pub fn encode_png(buf: &PixelBuffer, alpha: AlphaMode) -> IconStackResult<Vec<u8>> {
    let img = match alpha {
        AlphaMode::Keep => image::DynamicImage::ImageRgba8(buf.to_straight_rgba()),
        AlphaMode::Drop => image::DynamicImage::ImageRgb8(buf.to_opaque_rgb()),
    };
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .with_context(|| format!("encode {} png", buf.size()))?;
    Ok(out)
}
