use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::compose::blend::{over, scale_premul};
use crate::foundation::buffer::{CoverageMask, PixelBuffer};
use crate::foundation::core::{Rgb8, Rgba8, Size};
use crate::foundation::error::{IconStackError, IconStackResult};
use crate::raster::bitmap_font;
use crate::raster::canvas::{paint, render_with};

/// Brush carried through parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// A font file on disk and the face to use inside it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontSource {
    /// Path to a `.ttf`, `.otf` or `.ttc` file.
    pub path: PathBuf,
    /// Face index inside a collection; 0 for single-face files.
    #[serde(default)]
    pub index: u32,
}

impl FontSource {
    /// Convenience constructor.
    pub fn new(path: impl Into<PathBuf>, index: u32) -> Self {
        Self {
            path: path.into(),
            index,
        }
    }
}

/// Outcome of asking one provider for a font.
#[derive(Clone, Debug)]
pub enum FontProbe {
    /// Outline font bytes and face index.
    Ready { bytes: Arc<Vec<u8>>, index: u32 },
    /// Use the built-in bitmap font.
    Builtin,
    /// Nothing usable; the reason is logged.
    Unavailable(String),
}

/// One candidate in a [`FontChain`].
pub trait FontProvider: Send + Sync {
    /// Short name for logs.
    fn describe(&self) -> String;
    /// Try to produce a font.
    fn probe(&self) -> FontProbe;
}

/// Font read from disk on probe.
#[derive(Clone, Debug)]
pub struct FileFont {
    source: FontSource,
}

impl FileFont {
    pub fn new(source: FontSource) -> Self {
        Self { source }
    }
}

impl FontProvider for FileFont {
    fn describe(&self) -> String {
        format!("{}#{}", self.source.path.display(), self.source.index)
    }

    fn probe(&self) -> FontProbe {
        match std::fs::read(&self.source.path) {
            Ok(bytes) if !bytes.is_empty() => FontProbe::Ready {
                bytes: Arc::new(bytes),
                index: self.source.index,
            },
            Ok(_) => FontProbe::Unavailable("font file is empty".to_owned()),
            Err(e) => FontProbe::Unavailable(e.to_string()),
        }
    }
}

/// Font bytes already in memory.
#[derive(Clone, Debug)]
pub struct MemoryFont {
    name: String,
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl MemoryFont {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, index: u32) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes),
            index,
        }
    }
}

impl FontProvider for MemoryFont {
    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }

    fn probe(&self) -> FontProbe {
        if self.bytes.is_empty() {
            return FontProbe::Unavailable("no font bytes".to_owned());
        }
        FontProbe::Ready {
            bytes: Arc::clone(&self.bytes),
            index: self.index,
        }
    }
}

/// The built-in 5×7 bitmap font. Always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinBitmapFont;

impl FontProvider for BuiltinBitmapFont {
    fn describe(&self) -> String {
        "builtin:bitmap-5x7".to_owned()
    }

    fn probe(&self) -> FontProbe {
        FontProbe::Builtin
    }
}

/// Ordered font candidates; the first usable one wins.
///
/// The built-in bitmap font is appended to every chain, so resolution cannot fail.
pub struct FontChain {
    providers: Vec<Box<dyn FontProvider>>,
}

impl std::fmt::Debug for FontChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.describe()))
            .finish()
    }
}

impl FontChain {
    /// Chain over `providers`, followed by the built-in font.
    pub fn new(mut providers: Vec<Box<dyn FontProvider>>) -> Self {
        providers.push(Box::new(BuiltinBitmapFont));
        Self { providers }
    }

    /// Chain of font files, followed by the built-in font.
    pub fn from_sources(sources: &[FontSource]) -> Self {
        Self::new(
            sources
                .iter()
                .cloned()
                .map(|s| Box::new(FileFont::new(s)) as Box<dyn FontProvider>)
                .collect(),
        )
    }

    /// Only the built-in font.
    pub fn builtin() -> Self {
        Self::new(Vec::new())
    }

    /// Number of candidates, built-in included.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Never true: the built-in font is always present.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Probe candidates in order and register the first usable outline font with `engine`.
    pub fn resolve(&self, engine: &mut TextEngine) -> ResolvedFont {
        for provider in &self.providers {
            let name = provider.describe();
            match provider.probe() {
                FontProbe::Ready { bytes, index } => {
                    let blob = FontBlob::new(bytes);
                    match engine.register(&name, &blob) {
                        Ok(family) => {
                            tracing::debug!(font = %name, %family, "font resolved");
                            let data = vello_cpu::peniko::FontData::new(blob, index);
                            return ResolvedFont::Outline(OutlineFont { family, data });
                        }
                        Err(e) => {
                            tracing::debug!(font = %name, error = %e, "font rejected");
                        }
                    }
                }
                FontProbe::Builtin => {
                    tracing::debug!(font = %name, "font resolved");
                    return ResolvedFont::Bitmap;
                }
                FontProbe::Unavailable(reason) => {
                    tracing::debug!(font = %name, %reason, "font unavailable");
                }
            }
        }
        ResolvedFont::Bitmap
    }
}

/// An outline font registered with a [`TextEngine`].
#[derive(Clone)]
pub struct OutlineFont {
    /// Family name parley resolves the font stack with.
    pub family: String,
    /// Face used to draw glyph outlines.
    pub data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("family", &self.family)
            .field("index", &self.data.index)
            .finish()
    }
}

/// Result of [`FontChain::resolve`].
#[derive(Clone, Debug)]
pub enum ResolvedFont {
    Outline(OutlineFont),
    Bitmap,
}

/// Size and weight of a text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontDescriptor {
    /// Font size in pixels at render resolution.
    pub size_px: f32,
    /// CSS-style weight, 100..=900.
    pub weight: f32,
}

impl FontDescriptor {
    pub fn new(size_px: f32, weight: f32) -> Self {
        Self { size_px, weight }
    }

    fn validate(self) -> IconStackResult<()> {
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(IconStackError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Font bytes shared by parley (layout) and vello_cpu (glyph fills) without copying.
pub type FontBlob = parley::fontique::Blob<u8>;

/// Stateful helper for building parley layouts from registered font bytes.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    /// Family name per provider, so re-resolving a chain does not register its font again.
    families: HashMap<String, String>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Fresh parley contexts with no registered fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Register `blob` under `key` and return its primary family name.
    ///
    /// A key seen before returns the cached name without touching the font collection.
    pub fn register(&mut self, key: &str, blob: &FontBlob) -> IconStackResult<String> {
        if let Some(name) = self.families.get(key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(blob.clone(), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            IconStackError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| IconStackError::validation("registered font family has no name"))?
            .to_string();

        self.families.insert(key.to_owned(), family_name.clone());
        Ok(family_name)
    }

    /// Shape and lay out a single line of `text`.
    pub fn layout_line(
        &mut self,
        text: &str,
        family: &str,
        font: FontDescriptor,
    ) -> IconStackResult<parley::Layout<TextBrushRgba8>> {
        font.validate()?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family.to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(font.weight),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Ink bounding box of a text run.
///
/// The offset is relative to the layout origin (top-left of the first line box).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextBox {
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u32,
    pub height: u32,
}

impl TextBox {
    /// Box dimensions as a [`Size`].
    pub fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// Coverage of a text run, cropped to its ink box.
#[derive(Clone, Debug)]
pub struct TextMask {
    pub bbox: TextBox,
    pub mask: CoverageMask,
}

impl TextMask {
    /// Paint `color` through the mask with its top-left at `(x, y)`.
    pub fn fill_onto(&self, dst: &mut PixelBuffer, x: i32, y: i32, color: Rgba8) {
        crate::compose::blend::fill_mask_at(dst, &self.mask, x, y, color);
    }
}

/// Text run with a vertical colour gradient.
#[derive(Clone, Debug)]
pub struct GradientText {
    pub bbox: TextBox,
    /// Opaque gradient, one colour per row.
    pub color: PixelBuffer,
    /// Glyph coverage, same size as `color`.
    pub mask: CoverageMask,
}

impl GradientText {
    /// Composite onto `dst` with the ink box's top-left at `(x, y)`; the mask acts as alpha.
    pub fn paint_onto(&self, dst: &mut PixelBuffer, x: i32, y: i32) {
        let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
        let size = self.mask.size();
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
                let m = self.mask.get(mx, my);
                if m == 0 {
                    continue;
                }
                let src = scale_premul(self.color.pixel(mx, my), m);
                let (tx, ty) = (tx as u32, ty as u32);
                dst.set_pixel(tx, ty, over(dst.pixel(tx, ty), src, 1.0));
            }
        }
    }
}

/// Ink bounding box of `text`. Empty or blank text measures 1×1.
pub fn measure_text(
    engine: &mut TextEngine,
    font: &ResolvedFont,
    text: &str,
    desc: FontDescriptor,
) -> IconStackResult<TextBox> {
    Ok(render_text_mask(engine, font, text, desc)?.bbox)
}

/// Glyph coverage of `text`, cropped to its ink box.
pub fn render_text_mask(
    engine: &mut TextEngine,
    font: &ResolvedFont,
    text: &str,
    desc: FontDescriptor,
) -> IconStackResult<TextMask> {
    desc.validate()?;
    match font {
        ResolvedFont::Outline(outline) => rasterize_outline(engine, outline, text, desc),
        ResolvedFont::Bitmap => {
            let (w, h, coverage) = bitmap_font::rasterize(text, desc.size_px);
            trim_to_ink(w, h, &coverage, 0, 0)
        }
    }
}

/// One gradient text run.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    pub text: String,
    pub font: FontDescriptor,
    /// Colour of the first ink row.
    pub color_top: Rgb8,
    /// Colour approached by the last ink row.
    pub color_bottom: Rgb8,
}

/// Render `spec.text` with a top-to-bottom gradient across its ink box.
#[tracing::instrument(level = "debug", skip(engine, font), fields(text = %spec.text))]
pub fn render_gradient_text(
    engine: &mut TextEngine,
    font: &ResolvedFont,
    spec: &RenderSpec,
) -> IconStackResult<GradientText> {
    let TextMask { bbox, mask } = render_text_mask(engine, font, &spec.text, spec.font)?;
    let size = bbox.size();
    let mut color = PixelBuffer::new(size)?;
    let rows = gradient_rows(size.height, spec.color_top, spec.color_bottom);
    let row_bytes = size.width as usize * 4;
    for (row, c) in color.data_mut().chunks_exact_mut(row_bytes).zip(rows) {
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&[c.r, c.g, c.b, 255]);
        }
    }
    Ok(GradientText { bbox, color, mask })
}

/// Per-row colours of a vertical gradient: row `r` uses `ratio = r / height`.
pub fn gradient_rows(height: u32, top: Rgb8, bottom: Rgb8) -> Vec<Rgb8> {
    let lerp = |a: u8, b: u8, t: f32| -> u8 {
        (f32::from(a) * (1.0 - t) + f32::from(b) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    (0..height)
        .map(|r| {
            let t = r as f32 / height as f32;
            Rgb8::new(
                lerp(top.r, bottom.r, t),
                lerp(top.g, bottom.g, t),
                lerp(top.b, bottom.b, t),
            )
        })
        .collect()
}

fn rasterize_outline(
    engine: &mut TextEngine,
    font: &OutlineFont,
    text: &str,
    desc: FontDescriptor,
) -> IconStackResult<TextMask> {
    let layout = engine.layout_line(text, &font.family, desc)?;
    // Ink may overhang the layout box (italics, tall accents).
    let pad = desc.size_px.ceil().max(1.0);
    let w = (layout.width() + 2.0 * pad).ceil().max(1.0) as u32;
    let h = (layout.height() + 2.0 * pad).ceil().max(1.0) as u32;
    let canvas_size = Size::new(w, h)?;

    let rendered = render_with(canvas_size, |ctx| {
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(pad),
            f64::from(pad),
        )));
        ctx.set_paint(paint(Rgba8::new(255, 255, 255, 255)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                // Positioned glyphs carry the pen advance and the line baseline.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font.data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    })?;

    let alpha: Vec<u8> = rendered.data().chunks_exact(4).map(|px| px[3]).collect();
    let origin = -(pad as i32);
    trim_to_ink(w, h, &alpha, origin, origin)
}

/// Crop a coverage grid to its non-zero pixels. `origin_*` is the grid's top-left relative to
/// the layout origin. An all-zero grid yields an empty 1×1 mask at the origin.
fn trim_to_ink(
    w: u32,
    h: u32,
    coverage: &[u8],
    origin_x: i32,
    origin_y: i32,
) -> IconStackResult<TextMask> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..h {
        let row = &coverage[y as usize * w as usize..(y as usize + 1) * w as usize];
        let Some(first) = row.iter().position(|&c| c != 0) else {
            continue;
        };
        let last = row.iter().rposition(|&c| c != 0).unwrap_or(first);
        let (x0, x1) = (first as u32, last as u32);
        bounds = Some(match bounds {
            None => (x0, y, x1, y),
            Some((bx0, by0, bx1, _)) => (bx0.min(x0), by0, bx1.max(x1), y),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        let size = Size::new(1, 1)?;
        return Ok(TextMask {
            bbox: TextBox {
                offset_x: 0,
                offset_y: 0,
                width: 1,
                height: 1,
            },
            mask: CoverageMask::from_raw(size, vec![0])?,
        });
    };

    let size = Size::new(x1 - x0 + 1, y1 - y0 + 1)?;
    let mut data = Vec::with_capacity(size.area());
    for y in y0..=y1 {
        let start = y as usize * w as usize;
        data.extend_from_slice(&coverage[start + x0 as usize..=start + x1 as usize]);
    }
    Ok(TextMask {
        bbox: TextBox {
            offset_x: origin_x + x0 as i32,
            offset_y: origin_y + y0 as i32,
            width: size.width,
            height: size.height,
        },
        mask: CoverageMask::from_raw(size, data)?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/raster/text.rs"]
mod tests;
