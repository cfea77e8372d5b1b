use crate::foundation::error::{IconStackError, IconStackResult};

/// Pixel dimensions. Both components are > 0 when built through [`Size::new`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Build a size, rejecting zero components.
    pub fn new(width: u32, height: u32) -> IconStackResult<Self> {
        let s = Self { width, height };
        s.validate()?;
        Ok(s)
    }

    /// Build a size from signed inputs, rejecting anything `<= 0`.
    pub fn from_signed(width: i64, height: i64) -> IconStackResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(IconStackError::invalid_dimension(format!(
                "size must be positive, got {width}x{height}"
            )));
        }
        let w = u32::try_from(width)
            .map_err(|_| IconStackError::invalid_dimension("width exceeds u32"))?;
        let h = u32::try_from(height)
            .map_err(|_| IconStackError::invalid_dimension("height exceeds u32"))?;
        Ok(Self {
            width: w,
            height: h,
        })
    }

    /// Fail with [`IconStackError::InvalidDimension`] if a component is zero.
    pub fn validate(self) -> IconStackResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(IconStackError::invalid_dimension(format!(
                "size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Multiply both components by `factor`.
    pub fn scaled(self, factor: u32) -> IconStackResult<Self> {
        let w = self
            .width
            .checked_mul(factor)
            .ok_or_else(|| IconStackError::invalid_dimension("scaled width overflows u32"))?;
        let h = self
            .height
            .checked_mul(factor)
            .ok_or_else(|| IconStackError::invalid_dimension("scaled height overflows u32"))?;
        Self::new(w, h)
    }

    /// Number of pixels, `width * height`.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Largest of the two components.
    pub fn max_side(self) -> u32 {
        self.width.max(self.height)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Crop region in pixel coordinates, right/bottom exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: u32,
    /// Top edge (inclusive).
    pub top: u32,
    /// Right edge (exclusive).
    pub right: u32,
    /// Bottom edge (exclusive).
    pub bottom: u32,
}

impl Rect {
    /// Rect covering a whole buffer of `size`.
    pub fn full(size: Size) -> Self {
        Self {
            left: 0,
            top: 0,
            right: size.width,
            bottom: size.height,
        }
    }

    /// Width, `right - left`.
    pub fn width(self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Height, `bottom - top`.
    pub fn height(self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Extent of the rect as a [`Size`].
    pub fn size(self) -> IconStackResult<Size> {
        Size::new(self.width(), self.height())
    }

    /// Check `0 <= left < right <= W` and `0 <= top < bottom <= H`.
    pub fn check_within(self, bounds: Size) -> IconStackResult<()> {
        if self.left >= self.right || self.top >= self.bottom {
            return Err(IconStackError::invalid_dimension(format!(
                "empty rect {self:?}"
            )));
        }
        if self.right > bounds.width || self.bottom > bounds.height {
            return Err(IconStackError::invalid_dimension(format!(
                "rect {self:?} exceeds {bounds}"
            )));
        }
        Ok(())
    }
}

/// Opaque 8-bit colour, serialized as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a colour from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach a straight alpha value.
    pub const fn with_alpha(self, a: u8) -> Rgba8 {
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Straight (non-premultiplied) RGBA8 colour, serialized as `[r, g, b, a]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Build a colour from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplied byte representation.
    pub fn to_premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(v: [u8; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
