use crate::foundation::buffer::{CoverageMask, PixelBuffer};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{IconStackError, IconStackResult};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over-destination for one premultiplied pixel, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Blend `src` over `dst` pixel by pixel. Both buffers must share dimensions.
pub fn over_in_place(dst: &mut PixelBuffer, src: &PixelBuffer, opacity: f32) -> IconStackResult<()> {
    if dst.size() != src.size() {
        return Err(IconStackError::dimension_mismatch(format!(
            "cannot blend {} over {}",
            src.size(),
            dst.size()
        )));
    }
    for (d, s) in dst
        .data_mut()
        .chunks_exact_mut(4)
        .zip(src.data().chunks_exact(4))
    {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Blend `src` over `dst` with `src`'s top-left at `(x, y)`; pixels outside `dst` are clipped.
pub fn over_at(dst: &mut PixelBuffer, src: &PixelBuffer, x: i32, y: i32) {
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    for sy in 0..src.height() {
        let ty = i64::from(y) + i64::from(sy);
        if ty < 0 || ty >= dh {
            continue;
        }
        for sx in 0..src.width() {
            let tx = i64::from(x) + i64::from(sx);
            if tx < 0 || tx >= dw {
                continue;
            }
            let (tx, ty) = (tx as u32, ty as u32);
            let out = over(dst.pixel(tx, ty), src.pixel(sx, sy), 1.0);
            dst.set_pixel(tx, ty, out);
        }
    }
}

/// Paint `color` through `mask` onto `dst`, mask top-left at `(x, y)`.
///
/// Mask coverage acts as the source alpha, multiplied with `color.a`.
pub fn fill_mask_at(dst: &mut PixelBuffer, mask: &CoverageMask, x: i32, y: i32, color: Rgba8) {
    let px = color.to_premul();
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    let size = mask.size();
    for my in 0..size.height {
        let ty = i64::from(y) + i64::from(my);
        if ty < 0 || ty >= dh {
            continue;
        }
        for mx in 0..size.width {
            let tx = i64::from(x) + i64::from(mx);
            if tx < 0 || tx >= dw {
                continue;
            }
            let m = mask.get(mx, my);
            if m == 0 {
                continue;
            }
            let src = scale_premul(px, m);
            let (tx, ty) = (tx as u32, ty as u32);
            dst.set_pixel(tx, ty, over(dst.pixel(tx, ty), src, 1.0));
        }
    }
}

/// Multiply every channel of a premultiplied pixel by `coverage / 255`.
pub fn scale_premul(px: PremulRgba8, coverage: u8) -> PremulRgba8 {
    let m = u16::from(coverage);
    [
        mul_div255(u16::from(px[0]), m),
        mul_div255(u16::from(px[1]), m),
        mul_div255(u16::from(px[2]), m),
        mul_div255(u16::from(px[3]), m),
    ]
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
