use super::*;
use crate::foundation::core::{Rgba8, Size};

#[test]
fn tiny_sigma_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = box_blur3_rgba8_premul(&src, 1, 2, 0.4).unwrap();
    assert_eq!(out, src);
}

#[test]
fn mismatched_length_is_rejected() {
    let r = box_blur3_rgba8_premul(&[0u8; 12], 2, 2, 3.0);
    assert!(matches!(r, Err(IconStackError::DimensionMismatch(_))));
}

#[test]
fn small_sigma_spreads_energy_from_single_pixel() {
    let size = Size::new(5, 5).unwrap();
    let mut buf = PixelBuffer::new(size).unwrap();
    buf.set_pixel(2, 2, [255, 255, 255, 255]);

    let out = gaussian_blur(&buf, 1.2).unwrap();

    let nonzero = out.data().chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    assert!(out.pixel(2, 2)[3] < 255);

    let sum_a: u32 = out.data().chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 8, "{sum_a}");
}

#[test]
fn box_blur_constant_image_is_identity() {
    let (w, h) = (40u32, 30u32);
    let src = [90u8, 60, 30, 200].repeat((w * h) as usize);
    let out = box_blur3_rgba8_premul(&src, w, h, 12.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn box_widths_are_odd_and_match_variance() {
    for sigma in [9.0f32, 20.0, 80.0, 160.0] {
        let widths = box_widths_for_gauss(sigma, 3);
        assert_eq!(widths.len(), 3);
        let var: f64 = widths
            .iter()
            .map(|&w| ((w * w) as f64 - 1.0) / 12.0)
            .sum();
        let target = f64::from(sigma) * f64::from(sigma);
        assert!(widths.iter().all(|w| w % 2 == 1));
        assert!((var - target).abs() / target < 0.1, "sigma {sigma}: {var}");
    }
}

#[test]
fn gaussian_blur_large_sigma_smooths_a_step() {
    let size = Size::new(64, 8).unwrap();
    let mut buf = PixelBuffer::filled(size, Rgba8::new(0, 0, 0, 255)).unwrap();
    for y in 0..8 {
        for x in 32..64 {
            buf.set_pixel(x, y, [255, 255, 255, 255]);
        }
    }
    let out = gaussian_blur(&buf, 10.0).unwrap();
    assert_eq!(out.size(), size);

    let row: Vec<u8> = (0..64).map(|x| out.pixel(x, 4)[0]).collect();
    assert!(row.windows(2).all(|p| p[0] <= p[1]), "{row:?}");
    assert!(row[31] > 60 && row[31] < 195, "{}", row[31]);
    assert!(out.data().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn gaussian_blur_zero_sigma_is_identity() {
    let buf = PixelBuffer::filled(Size::new(3, 3).unwrap(), Rgba8::new(1, 2, 3, 4)).unwrap();
    assert_eq!(gaussian_blur(&buf, 0.0).unwrap(), buf);
    assert!(gaussian_blur(&buf, f32::NAN).is_err());
}
