use image::imageops::FilterType;

use crate::foundation::core::{Rect, Rgba8, Size};
use crate::foundation::error::{IconStackError, IconStackResult};

/// Owned premultiplied RGBA8 pixel grid, row-major and tightly packed.
///
/// Dimensions are fixed at construction. Every transform (`resize`, `crop`, compositing) returns a
/// fresh buffer, so a buffer is never shared between pipeline stages.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: Size,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("size", &self.size)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(size: Size) -> IconStackResult<Self> {
        Self::filled(size, Rgba8::TRANSPARENT)
    }

    /// Buffer where every pixel is `color`.
    pub fn filled(size: Size, color: Rgba8) -> IconStackResult<Self> {
        size.validate()?;
        let px = color.to_premul();
        let len = byte_len(size)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..size.area() {
            data.extend_from_slice(&px);
        }
        Ok(Self { size, data })
    }

    /// Wrap already premultiplied bytes.
    pub fn from_premul(size: Size, data: Vec<u8>) -> IconStackResult<Self> {
        size.validate()?;
        if data.len() != byte_len(size)? {
            return Err(IconStackError::dimension_mismatch(format!(
                "expected {} bytes for {size}, got {}",
                byte_len(size)?,
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Convert a straight-alpha image into a premultiplied buffer.
    pub fn from_straight_rgba(img: image::RgbaImage) -> IconStackResult<Self> {
        let (width, height) = img.dimensions();
        let size = Size::new(width, height)?;
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Ok(Self { size, data })
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer, returning its premultiplied bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite the premultiplied pixel at `(x, y)`. Panics when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Straight-alpha copy suitable for encoding with transparency.
    pub fn to_straight_rgba(&self) -> image::RgbaImage {
        let mut data = self.data.clone();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(self.size.width, self.size.height, data)
            .unwrap_or_else(|| image::RgbaImage::new(self.size.width, self.size.height))
    }

    /// Opaque copy with the alpha channel dropped.
    ///
    /// Colour channels are taken as stored, which for premultiplied data equals compositing the
    /// buffer over black.
    pub fn to_opaque_rgb(&self) -> image::RgbImage {
        let mut data = Vec::with_capacity(self.size.area() * 3);
        for px in self.data.chunks_exact(4) {
            data.extend_from_slice(&px[..3]);
        }
        image::RgbImage::from_raw(self.size.width, self.size.height, data)
            .unwrap_or_else(|| image::RgbImage::new(self.size.width, self.size.height))
    }

    /// Lanczos3 resample to `target`.
    pub fn resize(&self, target: Size) -> IconStackResult<Self> {
        target.validate()?;
        if target == self.size {
            return Ok(self.clone());
        }
        let src: image::ImageBuffer<image::Rgba<u8>, &[u8]> =
            image::ImageBuffer::from_raw(self.size.width, self.size.height, self.data.as_slice())
                .ok_or_else(|| IconStackError::invalid_dimension("buffer length mismatch"))?;
        let resized = image::imageops::resize(
            &src,
            target.width,
            target.height,
            FilterType::Lanczos3,
        );
        let mut data = resized.into_raw();
        clamp_premul_in_place(&mut data);
        Self::from_premul(target, data)
    }

    /// Copy out the region `rect`.
    pub fn crop(&self, rect: Rect) -> IconStackResult<Self> {
        rect.check_within(self.size)?;
        let size = rect.size()?;
        let row_bytes = size.width as usize * 4;
        let mut data = Vec::with_capacity(byte_len(size)?);
        for y in rect.top..rect.bottom {
            let start = self.index(rect.left, y);
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Self::from_premul(size, data)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.size.width && y < self.size.height,
            "pixel ({x}, {y}) outside {}",
            self.size
        );
        ((y as usize) * (self.size.width as usize) + (x as usize)) * 4
    }
}

/// Single-channel 0..=255 coverage grid (glyph masks).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverageMask {
    size: Size,
    data: Vec<u8>,
}

impl CoverageMask {
    /// Wrap coverage bytes, one per pixel.
    pub fn from_raw(size: Size, data: Vec<u8>) -> IconStackResult<Self> {
        size.validate()?;
        if data.len() != size.area() {
            return Err(IconStackError::dimension_mismatch(format!(
                "expected {} coverage bytes for {size}, got {}",
                size.area(),
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Coverage bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Coverage at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.size.width && y < self.size.height);
        self.data[(y as usize) * (self.size.width as usize) + (x as usize)]
    }
}

fn byte_len(size: Size) -> IconStackResult<usize> {
    (size.width as usize)
        .checked_mul(size.height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| IconStackError::invalid_dimension(format!("buffer size overflow for {size}")))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

// Lanczos lobes can push a colour channel above its alpha.
fn clamp_premul_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/buffer.rs"]
mod tests;
