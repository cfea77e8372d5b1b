//! iconstack generates the fixed set of layered app icons, top shelf banners and launch images a
//! TV app ships with.
//!
//! Two pipelines share one manifest of output slots:
//!
//! 1. **Sources**: arbitrary images (files on disk, or bytes from an [`ImageSourceProvider`]) are
//!    cover-fit into every slot: resized with Lanczos3 so the target is fully covered, then
//!    centre-cropped. Nothing is stretched.
//! 2. **Procedural**: a back layer (blurred colour bands and a vignette), a text layer (gradient
//!    headline, drop shadow and badge) and a gloss layer are rendered at `super_sample ×` the
//!    output size, then down-sampled once. Icon layers are exported separately; banners and the
//!    launch image are flattened to opaque RGB.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** everywhere between decode and encode.
//! - **Explicit configuration**: a [`PipelineConfig`] is loaded once and handed to [`Driver::new`].
//! - **Partial failure**: a family with a missing source is skipped and reported in
//!   [`RunReport::skipped`]; the rest of the run continues.
#![forbid(unsafe_code)]

mod assets;
mod catalog;
mod compose;
mod config;
mod fit;
mod foundation;
mod pipeline;
mod procedural;
mod provider;
mod raster;

pub use assets::decode::decode_image;
pub use assets::encode::{AlphaMode, encode_png};
pub use catalog::contents::{CatalogFile, InstallOutcome, apply_filenames, install, update_manifest};
pub use compose::blend::{PremulRgba8, fill_mask_at, over, over_at, over_in_place};
pub use compose::layers::{Layer, LayerRole, LayerStack, composite, flatten};
pub use config::{PipelineConfig, SourceSpec, default_fonts, default_source};
pub use fit::cover::{CoverFit, compute_cover_fit, fit_cover};
pub use foundation::buffer::{CoverageMask, PixelBuffer};
pub use foundation::core::{Rect, Rgb8, Rgba8, Size};
pub use foundation::error::{IconStackError, IconStackResult};
pub use pipeline::driver::{Driver, RunReport, SkippedSlot, WrittenFile};
pub use pipeline::manifest::{
    AssetSlot, FamilyKind, IconSize, PROCEDURAL_TARGETS, ProceduralKind, ProceduralTarget,
    SOURCE_FAMILIES, SlotFamily,
};
pub use pipeline::store::{InputStore, OutputStore, normalize_rel_path};
pub use procedural::scene::{
    ProceduralStyle, downsample_layers, flatten_downsampled, render_layers,
};
pub use provider::{ImageSourceProvider, classify_generate_response};
pub use raster::bitmap_font::glyph_columns;
pub use raster::blur::{box_blur3_rgba8_premul, gaussian_blur};
pub use raster::shapes::{
    BandOrientation, BlurRadius, render_blurred_fill, render_gloss, render_polygon, render_rect,
    render_rounded_rect, render_vignette,
};
pub use raster::text::{
    BuiltinBitmapFont, FileFont, FontChain, FontDescriptor, FontProbe, FontProvider, FontSource,
    GradientText, MemoryFont, OutlineFont, RenderSpec, ResolvedFont, TextBox, TextBrushRgba8,
    TextEngine, TextMask, gradient_rows, measure_text, render_gradient_text, render_text_mask,
};
