use crate::foundation::buffer::PixelBuffer;
use crate::foundation::error::{IconStackError, IconStackResult};

/// Isotropic Gaussian blur of a premultiplied buffer, edges clamped.
///
/// `sigma` is the standard deviation in pixels. Three running-sum box passes per axis stand in
/// for the kernel; their combined variance matches `sigma`, and the cost does not grow with it.
/// Sigmas below about 0.6 px leave the buffer unchanged.
pub fn gaussian_blur(buf: &PixelBuffer, sigma: f32) -> IconStackResult<PixelBuffer> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(IconStackError::validation(
            "blur sigma must be finite and >= 0",
        ));
    }
    let size = buf.size();
    if sigma == 0.0 {
        return Ok(buf.clone());
    }
    let out = box_blur3_rgba8_premul(buf.data(), size.width, size.height, sigma)?;
    PixelBuffer::from_premul(size, out)
}

/// Three box passes per axis approximating a Gaussian of `sigma`.
pub fn box_blur3_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> IconStackResult<Vec<u8>> {
    let expected_len = expected_len(width, height)?;
    if src.len() != expected_len {
        return Err(IconStackError::dimension_mismatch(
            "box_blur3_rgba8_premul expects src matching width*height*4",
        ));
    }

    let (w, h) = (width as usize, height as usize);
    let mut a = src.to_vec();
    let mut b = vec![0u8; expected_len];
    for box_w in box_widths_for_gauss(sigma, 3) {
        let r = box_w / 2;
        box_pass(&a, &mut b, h, w, w * 4, 4, r);
        box_pass(&b, &mut a, w, h, 4, w * 4, r);
    }
    Ok(a)
}

fn expected_len(width: u32, height: u32) -> IconStackResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| IconStackError::invalid_dimension("blur buffer size overflow"))
}

// Odd box widths whose stacked variance approximates sigma^2.
fn box_widths_for_gauss(sigma: f32, n: usize) -> Vec<usize> {
    let sigma = f64::from(sigma);
    let nf = n as f64;
    let w_ideal = ((12.0 * sigma * sigma / nf) + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let m_ideal =
        (12.0 * sigma * sigma - nf * wlf * wlf - 4.0 * nf * wlf - 3.0 * nf) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().clamp(0.0, nf) as usize;
    (0..n)
        .map(|i| if i < m { wl as usize } else { wu as usize })
        .collect()
}

/// One running-sum box pass over `lines` lines of `len` pixels.
///
/// `line_step` is the byte distance between line starts and `px_step` the byte distance between
/// neighbouring pixels along a line, so the same routine runs rows and columns.
fn box_pass(
    src: &[u8],
    dst: &mut [u8],
    lines: usize,
    len: usize,
    line_step: usize,
    px_step: usize,
    r: usize,
) {
    if len == 0 {
        return;
    }
    let win = (2 * r + 1) as u32;
    let last = len - 1;
    for line in 0..lines {
        let base = line * line_step;
        for c in 0..4 {
            let at = |i: usize| u32::from(src[base + i * px_step + c]);
            let mut acc = 0u32;
            for k in 0..=(2 * r) {
                let i = (k as isize - r as isize).clamp(0, last as isize) as usize;
                acc += at(i);
            }
            for i in 0..len {
                dst[base + i * px_step + c] = ((acc + win / 2) / win) as u8;
                let add = (i + r + 1).min(last);
                let sub = (i as isize - r as isize).max(0) as usize;
                acc = acc + at(add) - at(sub);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blur.rs"]
mod tests;
