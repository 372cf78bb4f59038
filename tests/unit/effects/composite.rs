use image::Rgba;

use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src), src);
}

#[test]
fn over_opaque_dst_matches_linear_blend() {
    let dst = [200, 100, 0, 255];
    let src = [0, 100, 200, 128];
    let out = over(dst, src);
    let a = 128.0 / 255.0;
    for i in 0..3 {
        let expected = (f32::from(src[i]) * a + f32::from(dst[i]) * (1.0 - a)).round() as i32;
        assert!((i32::from(out[i]) - expected).abs() <= 1, "channel {i}");
    }
    assert_eq!(out[3], 255);
}

#[test]
fn over_alpha_follows_porter_duff() {
    let out = over([50, 50, 50, 128], [200, 200, 200, 128]);
    // 128 + 128 * (1 - 128/255) ~= 191.75
    assert!((i32::from(out[3]) - 192).abs() <= 1);
}

#[test]
fn over_in_place_rejects_mismatched_sizes() {
    let mut dst = RgbaImage::new(2, 2);
    let src = RgbaImage::new(3, 2);
    assert!(over_in_place(&mut dst, &src).is_err());
}

#[test]
fn over_in_place_transparent_src_keeps_dst_bytes() {
    let mut dst = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8 * 40, y as u8 * 60, 7, 255]));
    let before = dst.clone();
    over_in_place(&mut dst, &RgbaImage::new(5, 3)).unwrap();
    assert_eq!(dst, before);
}

#[test]
fn paste_over_clips_at_edges() {
    let mut canvas = RgbaImage::new(10, 10);
    let sprite = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));

    assert_eq!(paste_over(&mut canvas, &sprite, 8, -1), 2 * 3);
    let covered = canvas.pixels().filter(|p| p[3] > 0).count();
    assert_eq!(covered, 6);
    assert_eq!(canvas.get_pixel(9, 0)[3], 255);
    assert_eq!(canvas.get_pixel(7, 0)[3], 0);
}

#[test]
fn paste_over_fully_outside_is_noop() {
    let mut canvas = RgbaImage::new(4, 4);
    let sprite = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
    assert_eq!(paste_over(&mut canvas, &sprite, 4, 0), 0);
    assert_eq!(paste_over(&mut canvas, &sprite, -2, 0), 0);
    assert!(canvas.pixels().all(|p| p[3] == 0));
}
