use crate::foundation::buffer::PixelBuffer;
use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{IconStackError, IconStackResult};

/// Result of [`compute_cover_fit`]: resize the source to `intermediate`, then cut `crop`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoverFit {
    /// Size the whole source is resampled to. Same aspect ratio as the source (within rounding),
    /// and at least as large as the target on both axes.
    pub intermediate: Size,
    /// Region of the intermediate image that becomes the output. Always exactly target-sized.
    pub crop: Rect,
}

/// Compute the "cover" resize and centred crop that fill `target` without letterboxing.
///
/// Ratios are compared exactly (`sw * th` vs `tw * sh`). The free axis is scaled with
/// round-half-up integer arithmetic, and the crop offset is the floor of half the overflow, so odd
/// overflows leave the extra pixel on the right/bottom.
pub fn compute_cover_fit(source: Size, target: Size) -> IconStackResult<CoverFit> {
    source.validate()?;
    target.validate()?;

    let (sw, sh) = (u64::from(source.width), u64::from(source.height));
    let (tw, th) = (u64::from(target.width), u64::from(target.height));

    let (iw, ih) = if sw * th > tw * sh {
        // Source relatively wider: match heights, overflow horizontally.
        (round_div(th * sw, sh), th)
    } else {
        (tw, round_div(tw * sh, sw))
    };

    let intermediate = Size::new(
        u32::try_from(iw)
            .map_err(|_| IconStackError::invalid_dimension("intermediate width exceeds u32"))?,
        u32::try_from(ih)
            .map_err(|_| IconStackError::invalid_dimension("intermediate height exceeds u32"))?,
    )?;

    let left = (intermediate.width - target.width) / 2;
    let top = (intermediate.height - target.height) / 2;
    let crop = Rect {
        left,
        top,
        right: left + target.width,
        bottom: top + target.height,
    };
    crop.check_within(intermediate)?;

    Ok(CoverFit { intermediate, crop })
}

/// Resize `source` to the cover-fit intermediate size (Lanczos3), then crop to `target`.
///
/// The full source is always resampled first; cropping never happens at native resolution.
pub fn fit_cover(source: &PixelBuffer, target: Size) -> IconStackResult<PixelBuffer> {
    let fit = compute_cover_fit(source.size(), target)?;
    tracing::debug!(
        source = %source.size(),
        target = %target,
        intermediate = %fit.intermediate,
        left = fit.crop.left,
        top = fit.crop.top,
        "cover fit"
    );
    source.resize(fit.intermediate)?.crop(fit.crop)
}

fn round_div(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

#[cfg(test)]
#[path = "../../tests/unit/fit/cover.rs"]
mod tests;
