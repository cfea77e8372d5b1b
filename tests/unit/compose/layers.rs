use super::*;

fn size(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

fn solid(name: &str, role: LayerRole, s: Size, c: Rgba8) -> Layer {
    Layer::new(name, role, PixelBuffer::filled(s, c).unwrap())
}

#[test]
fn opaque_top_layer_occludes_everything_below() {
    let s = size(4, 3);
    let layers = vec![
        solid("back", LayerRole::Back, s, Rgba8::new(10, 20, 30, 255)),
        solid("middle", LayerRole::Middle, s, Rgba8::new(40, 50, 60, 255)),
        solid("front", LayerRole::Front, s, Rgba8::new(70, 80, 90, 255)),
    ];
    let out = composite(&layers).unwrap();
    assert_eq!(out, layers[2].buffer);
}

#[test]
fn occlusion_holds_per_pixel_for_varied_content() {
    let s = size(5, 5);
    let mut back = PixelBuffer::new(s).unwrap();
    let mut front = PixelBuffer::new(s).unwrap();
    for y in 0..5 {
        for x in 0..5 {
            back.set_pixel(x, y, [x as u8 * 40, y as u8 * 40, 7, 255]);
            front.set_pixel(x, y, [y as u8 * 30, 3, x as u8 * 30, 255]);
        }
    }
    let layers = vec![
        Layer::new("back", LayerRole::Back, back),
        solid("middle", LayerRole::Middle, s, Rgba8::new(1, 1, 1, 255)),
        Layer::new("front", LayerRole::Front, front.clone()),
    ];
    assert_eq!(composite(&layers).unwrap(), front);
}

#[test]
fn half_red_over_blue_blends_evenly_and_is_opaque() {
    let s = size(2, 2);
    let layers = vec![
        solid("blue", LayerRole::Back, s, Rgba8::new(0, 0, 255, 255)),
        solid("red", LayerRole::Front, s, Rgba8::new(255, 0, 0, 128)),
    ];
    let out = composite(&layers).unwrap();
    let px = out.pixel(1, 1);
    assert!((i32::from(px[0]) - 128).abs() <= 1, "{px:?}");
    assert_eq!(px[1], 0);
    assert!((i32::from(px[2]) - 127).abs() <= 1, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn composite_leaves_inputs_untouched() {
    let s = size(2, 1);
    let layers = vec![
        solid("a", LayerRole::Back, s, Rgba8::new(0, 0, 255, 255)),
        solid("b", LayerRole::Front, s, Rgba8::new(255, 0, 0, 128)),
    ];
    let before: Vec<_> = layers.iter().map(|l| l.buffer.clone()).collect();
    let _ = composite(&layers).unwrap();
    for (l, b) in layers.iter().zip(before) {
        assert_eq!(l.buffer, b);
    }
}

#[test]
fn mismatched_sizes_fail() {
    let layers = vec![
        solid("a", LayerRole::Back, size(2, 2), Rgba8::new(0, 0, 0, 255)),
        solid("b", LayerRole::Front, size(2, 3), Rgba8::new(0, 0, 0, 255)),
    ];
    assert!(matches!(
        composite(&layers),
        Err(IconStackError::DimensionMismatch(_))
    ));
    assert!(matches!(
        flatten(&layers),
        Err(IconStackError::DimensionMismatch(_))
    ));
}

#[test]
fn empty_composite_is_rejected() {
    assert!(matches!(
        composite(&[]),
        Err(IconStackError::Validation(_))
    ));
}

#[test]
fn layer_opacity_scales_contribution() {
    let s = size(1, 1);
    let layers = vec![
        solid("black", LayerRole::Back, s, Rgba8::new(0, 0, 0, 255)),
        solid("white", LayerRole::Front, s, Rgba8::new(255, 255, 255, 255)).with_opacity(0.5),
    ];
    let px = composite(&layers).unwrap().pixel(0, 0);
    assert!((i32::from(px[0]) - 128).abs() <= 1);
    assert_eq!(px[3], 255);
}

#[test]
fn flatten_is_fully_opaque() {
    let s = size(2, 2);
    let layers = vec![
        solid("clear", LayerRole::Back, s, Rgba8::TRANSPARENT),
        solid("half", LayerRole::Front, s, Rgba8::new(200, 100, 0, 128)),
    ];
    let out = flatten(&layers).unwrap();
    for px in out.data().chunks_exact(4) {
        assert_eq!(px[3], 255);
    }
    assert_eq!(out.pixel(0, 0), [100, 50, 0, 255]);
}

#[test]
fn stack_orders_by_role_and_rejects_duplicates() {
    let s = size(1, 1);
    let stack = LayerStack::new(vec![
        solid("f", LayerRole::Front, s, Rgba8::new(3, 3, 3, 255)),
        solid("b", LayerRole::Back, s, Rgba8::new(1, 1, 1, 255)),
        solid("m", LayerRole::Middle, s, Rgba8::new(2, 2, 2, 255)),
    ])
    .unwrap();
    let roles: Vec<_> = stack.layers().iter().map(|l| l.role).collect();
    assert_eq!(roles, LayerRole::ALL.to_vec());
    assert_eq!(stack.composite().unwrap().pixel(0, 0), [3, 3, 3, 255]);

    let dup = LayerStack::new(vec![
        solid("a", LayerRole::Back, s, Rgba8::TRANSPARENT),
        solid("b", LayerRole::Back, s, Rgba8::TRANSPARENT),
    ]);
    assert!(dup.is_err());
}
