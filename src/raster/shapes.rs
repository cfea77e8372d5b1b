use vello_cpu::kurbo::{self, Shape};

use crate::compose::blend::over_in_place;
use crate::foundation::buffer::PixelBuffer;
use crate::foundation::core::{Rgba8, Size};
use crate::foundation::error::{IconStackError, IconStackResult};
use crate::raster::blur::gaussian_blur;
use crate::raster::canvas::{paint, render_with};

/// Direction in which colour bands are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandOrientation {
    /// Bands are columns, left to right.
    #[default]
    Vertical,
    /// Bands are rows, top to bottom.
    Horizontal,
}

/// Blur strength, either absolute or relative to the buffer it applies to.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurRadius {
    /// Sigma in pixels.
    Pixels(f32),
    /// Sigma as a fraction of the buffer's largest side, so it scales with resolution.
    Fraction(f32),
}

impl BlurRadius {
    /// Sigma in pixels for a buffer of `size`.
    pub fn sigma_for(self, size: Size) -> f32 {
        match self {
            BlurRadius::Pixels(px) => px,
            BlurRadius::Fraction(f) => f * size.max_side() as f32,
        }
    }
}

/// Filled axis-aligned rectangle on a transparent buffer. Coordinates may be fractional.
pub fn render_rect(size: Size, rect: [f64; 4], color: Rgba8) -> IconStackResult<PixelBuffer> {
    let [x0, y0, x1, y1] = rect;
    render_with(size, |ctx| {
        ctx.set_paint(paint(color));
        ctx.fill_rect(&kurbo::Rect::new(x0, y0, x1, y1));
    })
}

/// Filled rounded rectangle on a transparent buffer.
pub fn render_rounded_rect(
    size: Size,
    rect: [f64; 4],
    radius: f64,
    color: Rgba8,
) -> IconStackResult<PixelBuffer> {
    let [x0, y0, x1, y1] = rect;
    let path = kurbo::RoundedRect::new(x0, y0, x1, y1, radius).to_path(0.1);
    render_with(size, |ctx| {
        ctx.set_paint(paint(color));
        ctx.fill_path(&path);
    })
}

/// Filled closed polygon on a transparent buffer.
pub fn render_polygon(
    size: Size,
    points: &[(f64, f64)],
    color: Rgba8,
) -> IconStackResult<PixelBuffer> {
    if points.len() < 3 {
        return Err(IconStackError::validation("polygon needs at least 3 points"));
    }
    let mut path = kurbo::BezPath::new();
    path.move_to(points[0]);
    for &p in &points[1..] {
        path.line_to(p);
    }
    path.close_path();
    render_with(size, |ctx| {
        ctx.set_paint(paint(color));
        ctx.fill_path(&path);
    })
}

/// Opaque `base` fill with equal-width `bands` blended on top, then Gaussian-blurred.
pub fn render_blurred_fill(
    size: Size,
    base: Rgba8,
    bands: &[Rgba8],
    orientation: BandOrientation,
    blur: BlurRadius,
) -> IconStackResult<PixelBuffer> {
    let mut out = PixelBuffer::filled(size, base)?;
    if !bands.is_empty() {
        let (w, h) = (f64::from(size.width), f64::from(size.height));
        let n = bands.len() as f64;
        let overlay = render_with(size, |ctx| {
            for (i, &c) in bands.iter().enumerate() {
                let (a, b) = (i as f64 / n, (i + 1) as f64 / n);
                let r = match orientation {
                    BandOrientation::Vertical => kurbo::Rect::new(a * w, 0.0, b * w, h),
                    BandOrientation::Horizontal => kurbo::Rect::new(0.0, a * h, w, b * h),
                };
                ctx.set_paint(paint(c));
                ctx.fill_rect(&r);
            }
        })?;
        over_in_place(&mut out, &overlay, 1.0)?;
    }
    gaussian_blur(&out, blur.sigma_for(size))
}

/// Soft dark edge: an opaque black frame `border_width` wide, blurred, on a transparent buffer.
pub fn render_vignette(
    size: Size,
    border_width: f64,
    blur: BlurRadius,
) -> IconStackResult<PixelBuffer> {
    if !border_width.is_finite() || border_width < 0.0 {
        return Err(IconStackError::validation(
            "vignette border width must be finite and >= 0",
        ));
    }
    let (w, h) = (f64::from(size.width), f64::from(size.height));
    let bw = border_width.min(w / 2.0).min(h / 2.0);
    let frame = render_with(size, |ctx| {
        ctx.set_paint(paint(Rgba8::new(0, 0, 0, 255)));
        ctx.fill_rect(&kurbo::Rect::new(0.0, 0.0, w, bw));
        ctx.fill_rect(&kurbo::Rect::new(0.0, h - bw, w, h));
        ctx.fill_rect(&kurbo::Rect::new(0.0, bw, bw, h - bw));
        ctx.fill_rect(&kurbo::Rect::new(w - bw, bw, w, h - bw));
    })?;
    gaussian_blur(&frame, blur.sigma_for(size))
}

/// Translucent glass highlight: `points` are fractions of the buffer size.
pub fn render_gloss(
    size: Size,
    points: &[(f64, f64)],
    color: Rgba8,
) -> IconStackResult<PixelBuffer> {
    let (w, h) = (f64::from(size.width), f64::from(size.height));
    let abs: Vec<(f64, f64)> = points.iter().map(|&(fx, fy)| (fx * w, fy * h)).collect();
    render_polygon(size, &abs, color)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/shapes.rs"]
mod tests;
