use super::*;

fn bitmap_spec(text: &str) -> RenderSpec {
    RenderSpec {
        text: text.to_owned(),
        font: FontDescriptor::new(14.0, 800.0),
        color_top: Rgb8::new(255, 255, 255),
        color_bottom: Rgb8::new(200, 200, 220),
    }
}

#[test]
fn chain_falls_back_to_builtin_font() {
    let chain = FontChain::new(vec![
        Box::new(FileFont::new(FontSource::new("/nonexistent/font.ttc", 7))),
        Box::new(MemoryFont::new("empty", Vec::new(), 0)),
        Box::new(MemoryFont::new("garbage", b"not a font".to_vec(), 0)),
    ]);
    assert_eq!(chain.len(), 4);
    let mut engine = TextEngine::new();
    assert!(matches!(chain.resolve(&mut engine), ResolvedFont::Bitmap));
    assert!(matches!(
        FontChain::builtin().resolve(&mut engine),
        ResolvedFont::Bitmap
    ));
}

#[test]
fn bitmap_measure_matches_ink() {
    let mut engine = TextEngine::new();
    let bbox = measure_text(
        &mut engine,
        &ResolvedFont::Bitmap,
        "TV",
        FontDescriptor::new(14.0, 400.0),
    )
    .unwrap();
    // 'T' starts at column 0, 'V' ends at column 4 of the second advance; 2px cells.
    assert_eq!(
        bbox,
        TextBox {
            offset_x: 0,
            offset_y: 0,
            width: 22,
            height: 14
        }
    );
}

#[test]
fn blank_text_measures_one_pixel() {
    let mut engine = TextEngine::new();
    let desc = FontDescriptor::new(10.0, 400.0);
    let bbox = measure_text(&mut engine, &ResolvedFont::Bitmap, "   ", desc).unwrap();
    assert_eq!((bbox.width, bbox.height), (1, 1));
    let bbox = measure_text(&mut engine, &ResolvedFont::Bitmap, "", desc).unwrap();
    assert_eq!((bbox.width, bbox.height), (1, 1));
}

#[test]
fn invalid_font_size_is_rejected() {
    let mut engine = TextEngine::new();
    let r = measure_text(
        &mut engine,
        &ResolvedFont::Bitmap,
        "A",
        FontDescriptor::new(0.0, 400.0),
    );
    assert!(matches!(r, Err(IconStackError::Validation(_))));
}

#[test]
fn gradient_text_mask_matches_measured_box() {
    let mut engine = TextEngine::new();
    let spec = bitmap_spec("Test Your");
    let bbox = measure_text(&mut engine, &ResolvedFont::Bitmap, &spec.text, spec.font).unwrap();
    let g = render_gradient_text(&mut engine, &ResolvedFont::Bitmap, &spec).unwrap();
    assert_eq!(g.bbox, bbox);
    assert_eq!(g.mask.size(), bbox.size());
    assert_eq!(g.color.size(), bbox.size());
}

#[test]
fn gradient_runs_from_top_to_near_bottom() {
    let mut engine = TextEngine::new();
    let mut spec = bitmap_spec("Test Your");
    spec.font.size_px = 140.0;
    let g = render_gradient_text(&mut engine, &ResolvedFont::Bitmap, &spec).unwrap();
    assert_eq!(g.color.height(), 140);
    let last = g.color.height() - 1;
    assert_eq!(g.color.pixel(0, 0), [255, 255, 255, 255]);
    let px = g.color.pixel(0, last);
    for (got, want) in px[..3].iter().zip([200u8, 200, 220]) {
        let diff = (i32::from(*got) - i32::from(want)).abs();
        assert!(diff <= 1, "{px:?}");
    }
}

#[test]
fn gradient_rows_are_monotonic_and_start_at_top() {
    let rows = gradient_rows(256, Rgb8::new(0, 255, 10), Rgb8::new(255, 0, 10));
    assert_eq!(rows[0], Rgb8::new(0, 255, 10));
    assert_eq!(rows[255], Rgb8::new(254, 1, 10));
    assert!(rows.windows(2).all(|p| p[0].r <= p[1].r && p[0].g >= p[1].g));
    assert!(rows.iter().all(|c| c.b == 10));
}

#[test]
fn paint_onto_uses_mask_as_alpha() {
    let mut engine = TextEngine::new();
    let mut spec = bitmap_spec("T");
    spec.color_top = Rgb8::new(10, 20, 30);
    let g = render_gradient_text(&mut engine, &ResolvedFont::Bitmap, &spec).unwrap();
    let mut dst = PixelBuffer::new(Size::new(30, 20).unwrap()).unwrap();
    g.paint_onto(&mut dst, 2, 3);
    assert_eq!(dst.pixel(2, 3), [10, 20, 30, 255]);
    // 'T' column 0 is lit only on row 0.
    assert_eq!(dst.pixel(2, 6), [0, 0, 0, 0]);
    assert_eq!(dst.pixel(0, 0), [0, 0, 0, 0]);
}

#[test]
fn flat_mask_fill_clips_at_edges() {
    let mut engine = TextEngine::new();
    let m = render_text_mask(
        &mut engine,
        &ResolvedFont::Bitmap,
        "I",
        FontDescriptor::new(7.0, 400.0),
    )
    .unwrap();
    let mut dst = PixelBuffer::new(Size::new(4, 4).unwrap()).unwrap();
    m.fill_onto(&mut dst, -1, -2, Rgba8::new(0, 0, 0, 180));
    assert!(dst.data().chunks_exact(4).any(|px| px[3] == 180));
}

const DEJAVU_BOLD: &[u8] = include_bytes!("../../data/DejaVuSans-Bold.ttf");

fn outline_font(engine: &mut TextEngine) -> ResolvedFont {
    let chain = FontChain::new(vec![Box::new(MemoryFont::new(
        "dejavu-bold",
        DEJAVU_BOLD.to_vec(),
        0,
    ))]);
    let font = chain.resolve(engine);
    assert!(matches!(font, ResolvedFont::Outline(_)), "{font:?}");
    font
}

#[test]
fn outline_ink_width_grows_with_glyph_count() {
    let mut engine = TextEngine::new();
    let font = outline_font(&mut engine);
    let desc = FontDescriptor::new(60.0, 800.0);
    let widths: Vec<u32> = ["I", "II", "IIII", "IIIIIIII"]
        .iter()
        .map(|t| measure_text(&mut engine, &font, t, desc).unwrap().width)
        .collect();
    assert!(widths.windows(2).all(|w| w[0] < w[1]), "{widths:?}");
    assert!(widths[3] > 4 * widths[0], "{widths:?}");
}

#[test]
fn outline_headline_spans_the_line_below_its_top() {
    let mut engine = TextEngine::new();
    let font = outline_font(&mut engine);
    let bbox = measure_text(
        &mut engine,
        &font,
        "Test Your",
        FontDescriptor::new(100.0, 800.0),
    )
    .unwrap();
    assert!(bbox.width > 400 && bbox.width < 700, "{bbox:?}");
    assert!(bbox.height > 60 && bbox.height < 100, "{bbox:?}");
    // Cap tops sit below the line box top; the first glyph starts near the pen origin.
    assert!(bbox.offset_y > 0, "{bbox:?}");
    assert!(bbox.offset_x.abs() <= 10, "{bbox:?}");
}

#[test]
fn outline_gradient_mask_matches_measured_box() {
    let mut engine = TextEngine::new();
    let font = outline_font(&mut engine);
    let spec = RenderSpec {
        text: "Test Your".to_owned(),
        font: FontDescriptor::new(80.0, 800.0),
        color_top: Rgb8::new(255, 255, 255),
        color_bottom: Rgb8::new(200, 200, 220),
    };
    let bbox = measure_text(&mut engine, &font, &spec.text, spec.font).unwrap();
    let g = render_gradient_text(&mut engine, &font, &spec).unwrap();
    assert_eq!(g.bbox, bbox);
    assert_eq!(g.mask.size(), bbox.size());
    assert_eq!(g.color.size(), bbox.size());
    assert_eq!(g.color.pixel(0, 0), [255, 255, 255, 255]);
    assert!((0..bbox.height).any(|y| g.mask.get(bbox.width / 2, y) > 0));
}

#[test]
fn resolving_a_file_font_twice_registers_it_once() {
    let chain = FontChain::from_sources(&[FontSource::new("tests/data/DejaVuSans-Bold.ttf", 0)]);
    let mut engine = TextEngine::new();
    let (ResolvedFont::Outline(a), ResolvedFont::Outline(b)) =
        (chain.resolve(&mut engine), chain.resolve(&mut engine))
    else {
        panic!("test font did not resolve");
    };
    assert_eq!(a.family, b.family);
    assert!(a.family.contains("DejaVu"), "{}", a.family);
    assert_eq!(engine.families.len(), 1);
}
