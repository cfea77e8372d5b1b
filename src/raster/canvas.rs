use crate::foundation::buffer::PixelBuffer;
use crate::foundation::core::{Rgba8, Size};
use crate::foundation::error::{IconStackError, IconStackResult};

/// Draw with a fresh `vello_cpu` context and return the pixels as a new buffer.
///
/// Every call starts from a transparent surface; there is no long-lived canvas shared between
/// drawing calls.
pub fn render_with(
    size: Size,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> IconStackResult<PixelBuffer> {
    let (w, h) = size_to_u16(size)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    // Pixmap stores PremulRgba8, which is our buffer layout.
    PixelBuffer::from_premul(size, pixmap.data_as_u8_slice().to_vec())
}

/// Paint colour for `vello_cpu` from a straight-alpha colour.
pub fn paint(color: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn size_to_u16(size: Size) -> IconStackResult<(u16, u16)> {
    size.validate()?;
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| IconStackError::invalid_dimension("render surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| IconStackError::invalid_dimension("render surface height exceeds u16"))?;
    Ok((w, h))
}
