use image::Rgba;

use crate::{config::FactorRange, foundation::rng::seeded_rng};

use super::*;

fn sprite() -> RgbaImage {
    RgbaImage::from_fn(24, 24, |x, y| {
        let dx = x as f32 - 11.5;
        let dy = y as f32 - 11.5;
        let a = if dx * dx + dy * dy <= 121.0 { 230 } else { 0 };
        Rgba([90, 200, 60, a])
    })
}

#[test]
fn zero_droplets_leave_canvas_transparent() {
    let cfg = RainConfig {
        droplet_count: 0,
        ..RainConfig::default()
    };
    let field = generate_field(
        &sprite(),
        (40, 30),
        canvas_center(40, 30),
        &cfg,
        &mut seeded_rng(1),
        &Deadline::unbounded(),
    )
    .unwrap();
    assert_eq!(field.canvas.dimensions(), (40, 30));
    assert_eq!((field.placed, field.skipped), (0, 0));
    assert!(field.canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn counts_add_up_and_skips_are_non_fatal() {
    let cfg = RainConfig {
        droplet_count: 25,
        // Most draws collapse a 24px sprite to zero width.
        scale_range: FactorRange::new(0.01, 0.1),
        ..RainConfig::default()
    };
    let field = generate_field(
        &sprite(),
        (64, 64),
        canvas_center(64, 64),
        &cfg,
        &mut seeded_rng(5),
        &Deadline::unbounded(),
    )
    .unwrap();
    assert_eq!(field.placed + field.skipped, 25);
    assert!(field.skipped > 0);
}

#[test]
fn same_seed_same_field() {
    let cfg = RainConfig {
        droplet_count: 12,
        ..RainConfig::default()
    };
    let run = |seed| {
        generate_field(
            &sprite(),
            (96, 80),
            canvas_center(96, 80),
            &cfg,
            &mut seeded_rng(seed),
            &Deadline::unbounded(),
        )
        .unwrap()
        .canvas
    };
    assert_eq!(run(77), run(77));
    assert_ne!(run(77), run(78));
}

#[test]
fn blur_softens_field() {
    let base = RainConfig {
        droplet_count: 6,
        scale_range: FactorRange::fixed(1.0),
        ..RainConfig::default()
    };
    let sticky = RainConfig {
        blur_radius: Some(3),
        ..base.clone()
    };
    let gen_field = |cfg: &RainConfig| {
        generate_field(
            &sprite(),
            (80, 80),
            canvas_center(80, 80),
            cfg,
            &mut seeded_rng(9),
            &Deadline::unbounded(),
        )
        .unwrap()
        .canvas
    };
    let sharp = gen_field(&base);
    let soft = gen_field(&sticky);
    let faint = |img: &RgbaImage| img.pixels().filter(|p| p[3] > 0 && p[3] < 100).count();
    assert!(faint(&soft) > faint(&sharp));
}

#[test]
fn expired_deadline_aborts() {
    let err = generate_field(
        &sprite(),
        (16, 16),
        canvas_center(16, 16),
        &RainConfig::default(),
        &mut seeded_rng(1),
        &Deadline::from_millis(Some(0)),
    )
    .unwrap_err();
    assert!(matches!(err, RainError::Timeout { .. }));
}

#[test]
fn empty_canvas_is_rejected() {
    let err = generate_field(
        &sprite(),
        (0, 10),
        (0.0, 5.0),
        &RainConfig::default(),
        &mut seeded_rng(1),
        &Deadline::unbounded(),
    )
    .unwrap_err();
    assert!(matches!(err, RainError::Validation(_)));
}
