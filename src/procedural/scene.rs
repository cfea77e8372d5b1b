use crate::compose::blend::over_in_place;
use crate::compose::layers::{Layer, LayerRole, LayerStack};
use crate::foundation::buffer::PixelBuffer;
use crate::foundation::core::{Rgb8, Rgba8, Size};
use crate::foundation::error::{IconStackError, IconStackResult};
use crate::raster::shapes::{
    BandOrientation, BlurRadius, render_blurred_fill, render_gloss, render_rounded_rect,
    render_vignette,
};
use crate::raster::text::{
    FontDescriptor, RenderSpec, ResolvedFont, TextEngine, measure_text, render_gradient_text,
    render_text_mask,
};

/// Look of the procedural back, text and gloss layers.
///
/// Fractions are relative to the super-sampled layer size; pixel amounts are in output pixels and
/// get multiplied by the super-sample factor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProceduralStyle {
    pub headline: String,
    pub badge_text: String,
    pub background: Rgb8,
    pub bands: Vec<Rgb8>,
    pub band_alpha: u8,
    pub band_orientation: BandOrientation,
    /// Band blur sigma as a fraction of the largest side.
    pub band_blur: f32,
    /// Vignette frame width as a fraction of the largest side.
    pub vignette_width: f32,
    pub vignette_blur: f32,
    /// Headline size as a fraction of the layer height.
    pub headline_scale: f32,
    /// Vertical centre of the headline as a fraction of the layer height.
    pub headline_center_y: f32,
    pub headline_weight: f32,
    pub gradient_top: Rgb8,
    pub gradient_bottom: Rgb8,
    pub shadow: Rgba8,
    pub shadow_offset: u32,
    pub badge_color: Rgb8,
    pub badge_text_color: Rgb8,
    /// Badge label size relative to the headline size.
    pub badge_scale: f32,
    pub badge_padding: (u32, u32),
    /// Gap between headline ink and badge.
    pub badge_gap: u32,
    pub gloss_alpha: u8,
    /// Gloss polygon in fractions of the layer size.
    pub gloss_polygon: Vec<(f64, f64)>,
}

impl Default for ProceduralStyle {
    fn default() -> Self {
        Self {
            headline: "Test Your".to_owned(),
            badge_text: "TV".to_owned(),
            background: Rgb8::new(10, 12, 16),
            bands: vec![
                Rgb8::new(200, 200, 200),
                Rgb8::new(200, 200, 0),
                Rgb8::new(0, 200, 200),
                Rgb8::new(0, 200, 0),
                Rgb8::new(200, 0, 200),
                Rgb8::new(200, 0, 0),
                Rgb8::new(0, 0, 200),
            ],
            band_alpha: 100,
            band_orientation: BandOrientation::Vertical,
            band_blur: 0.05,
            vignette_width: 0.1,
            vignette_blur: 0.1,
            headline_scale: 0.16,
            headline_center_y: 0.45,
            headline_weight: 800.0,
            gradient_top: Rgb8::new(255, 255, 255),
            gradient_bottom: Rgb8::new(200, 200, 220),
            shadow: Rgba8::new(0, 0, 0, 180),
            shadow_offset: 8,
            badge_color: Rgb8::new(0, 122, 255),
            badge_text_color: Rgb8::new(255, 255, 255),
            badge_scale: 0.4,
            badge_padding: (20, 10),
            badge_gap: 20,
            gloss_alpha: 20,
            gloss_polygon: vec![(0.0, 0.0), (1.0, 0.0), (1.0, 0.4), (0.0, 0.1)],
        }
    }
}

/// Render the back, text and gloss layers for an output of `size`, at `size × super_sample`.
///
/// The returned stack is still super-sampled; see [`downsample_layers`] and
/// [`flatten_downsampled`].
#[tracing::instrument(level = "debug", skip(style, font, engine))]
pub fn render_layers(
    size: Size,
    super_sample: u32,
    style: &ProceduralStyle,
    font: &ResolvedFont,
    engine: &mut TextEngine,
) -> IconStackResult<LayerStack> {
    if super_sample == 0 {
        return Err(IconStackError::validation("super_sample must be >= 1"));
    }
    let ss = size.scaled(super_sample)?;

    let back = render_back(ss, style)?;
    let text = render_text_layer(ss, super_sample, style, font, engine)?;
    let gloss = render_gloss(ss, &style.gloss_polygon, Rgba8::new(255, 255, 255, style.gloss_alpha))?;

    LayerStack::new(vec![
        Layer::new("back", LayerRole::Back, back),
        Layer::new("text", LayerRole::Middle, text),
        Layer::new("gloss", LayerRole::Front, gloss),
    ])
}

/// Down-sample every layer of `stack` to `target` independently.
pub fn downsample_layers(stack: LayerStack, target: Size) -> IconStackResult<Vec<Layer>> {
    stack
        .into_layers()
        .into_iter()
        .map(|layer| {
            let buffer = layer.buffer.resize(target)?;
            Ok(Layer { buffer, ..layer })
        })
        .collect()
}

/// Flatten `stack` at its own resolution, then down-sample the result once to `target`.
pub fn flatten_downsampled(stack: &LayerStack, target: Size) -> IconStackResult<PixelBuffer> {
    stack.flatten()?.resize(target)
}

fn render_back(ss: Size, style: &ProceduralStyle) -> IconStackResult<PixelBuffer> {
    let bands: Vec<Rgba8> = style
        .bands
        .iter()
        .map(|c| c.with_alpha(style.band_alpha))
        .collect();
    let mut back = render_blurred_fill(
        ss,
        style.background.with_alpha(255),
        &bands,
        style.band_orientation,
        BlurRadius::Fraction(style.band_blur),
    )?;
    let vignette = render_vignette(
        ss,
        f64::from(style.vignette_width) * f64::from(ss.max_side()),
        BlurRadius::Fraction(style.vignette_blur),
    )?;
    over_in_place(&mut back, &vignette, 1.0)?;
    Ok(back)
}

fn render_text_layer(
    ss: Size,
    super_sample: u32,
    style: &ProceduralStyle,
    font: &ResolvedFont,
    engine: &mut TextEngine,
) -> IconStackResult<PixelBuffer> {
    let mut layer = PixelBuffer::new(ss)?;
    let ss_w = i64::from(ss.width);
    let k = i64::from(super_sample);

    let headline_px = (ss.height as f32 * style.headline_scale).floor().max(1.0);
    let headline = RenderSpec {
        text: style.headline.clone(),
        font: FontDescriptor::new(headline_px, style.headline_weight),
        color_top: style.gradient_top,
        color_bottom: style.gradient_bottom,
    };
    let gradient = render_gradient_text(engine, font, &headline)?;
    let (tw, th) = (i64::from(gradient.bbox.width), i64::from(gradient.bbox.height));
    let ink_x = (ss_w - tw).div_euclid(2);
    let ink_y = (ss.height as f32 * style.headline_center_y - th as f32 / 2.0).floor() as i64;

    let shadow = render_text_mask(engine, font, &style.headline, headline.font)?;
    let off = i64::from(style.shadow_offset) * k;
    shadow.fill_onto(&mut layer, to_i32(ink_x + off), to_i32(ink_y + off), style.shadow);
    gradient.paint_onto(&mut layer, to_i32(ink_x), to_i32(ink_y));

    let badge_font = FontDescriptor::new(
        (headline_px * style.badge_scale).floor().max(1.0),
        style.headline_weight,
    );
    let label_box = measure_text(engine, font, &style.badge_text, badge_font)?;
    let (pad_x, pad_y) = (
        i64::from(style.badge_padding.0) * k,
        i64::from(style.badge_padding.1) * k,
    );
    let box_w = i64::from(label_box.width) + 2 * pad_x;
    let box_h = i64::from(label_box.height) + 2 * pad_y;
    let box_x = (ss_w - box_w).div_euclid(2);
    let box_y = ink_y + th + i64::from(style.badge_gap) * k;

    let badge = render_rounded_rect(
        ss,
        [
            box_x as f64,
            box_y as f64,
            (box_x + box_w) as f64,
            (box_y + box_h) as f64,
        ],
        box_h as f64 / 3.0,
        style.badge_color.with_alpha(255),
    )?;
    over_in_place(&mut layer, &badge, 1.0)?;

    let label = render_text_mask(engine, font, &style.badge_text, badge_font)?;
    label.fill_onto(
        &mut layer,
        to_i32(box_x + pad_x),
        to_i32(box_y + pad_y),
        style.badge_text_color.with_alpha(255),
    );

    tracing::debug!(
        headline_px,
        ink_x,
        ink_y,
        box_x,
        box_y,
        box_w,
        box_h,
        "text layer geometry"
    );
    Ok(layer)
}

fn to_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/procedural/scene.rs"]
mod tests;
