use crate::foundation::rng::seeded_rng;

use super::*;

#[test]
fn defaults_validate() {
    let cfg = RainConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.contact_threshold, 30);
    assert_eq!(cfg.placement, PlacementBounds::UpperHalf);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = RainConfig::from_json_str(r#"{ "droplet_count": 120, "wet_intensity": 0.4 }"#)
        .unwrap();
    assert_eq!(cfg.droplet_count, 120);
    assert!((cfg.wet_intensity - 0.4).abs() < 1e-6);
    assert_eq!(cfg.scale_range, FactorRange::new(0.1, 0.8));
}

#[test]
fn json_roundtrips_through_pretty_printer() {
    let cfg = RainConfig {
        blur_radius: Some(3),
        placement: PlacementBounds::FullCanvas,
        output_format: OutputFormat::Jpeg { quality: 85 },
        ..RainConfig::default()
    };
    let s = cfg.to_json_pretty().unwrap();
    assert!(s.contains("full_canvas"));
    assert_eq!(RainConfig::from_json_str(&s).unwrap(), cfg);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = RainConfig::from_json_str(r#"{ "droplets": 3 }"#).unwrap_err();
    assert!(matches!(err, RainError::Serde(_)));
}

#[test]
fn invalid_values_are_rejected() {
    let bad = [
        RainConfig {
            min_alpha: 1.5,
            ..RainConfig::default()
        },
        RainConfig {
            wet_intensity: -0.1,
            ..RainConfig::default()
        },
        RainConfig {
            scale_range: FactorRange::new(0.8, 0.1),
            ..RainConfig::default()
        },
        RainConfig {
            stretch_range: FactorRange::new(0.0, 2.0),
            ..RainConfig::default()
        },
        RainConfig {
            blur_radius: Some(0),
            ..RainConfig::default()
        },
        RainConfig {
            output_format: OutputFormat::Jpeg { quality: 0 },
            ..RainConfig::default()
        },
    ];
    for cfg in bad {
        assert!(
            matches!(cfg.validate(), Err(RainError::Validation(_))),
            "expected validation failure for {cfg:?}"
        );
    }
}

#[test]
fn oversized_factor_ranges_are_rejected() {
    for cfg in [
        RainConfig {
            scale_range: FactorRange::fixed(1.0e9),
            ..RainConfig::default()
        },
        RainConfig {
            stretch_range: FactorRange::new(1.0, MAX_FACTOR + 1.0),
            ..RainConfig::default()
        },
    ] {
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains(".max must be <="), "{err}");
    }

    RainConfig {
        scale_range: FactorRange::new(0.5, MAX_FACTOR),
        ..RainConfig::default()
    }
    .validate()
    .unwrap();
}

#[test]
fn factor_range_samples_stay_in_bounds() {
    let mut rng = seeded_rng(7);
    let r = FactorRange::new(1.3, 2.0);
    for _ in 0..256 {
        let v = r.sample(&mut rng);
        assert!((1.3..=2.0).contains(&v));
    }
    assert_eq!(FactorRange::fixed(1.0).sample(&mut rng), 1.0);
}

#[test]
fn placement_limits() {
    assert_eq!(PlacementBounds::UpperHalf.y_limit(100), 50);
    assert_eq!(PlacementBounds::FullCanvas.y_limit(100), 100);
    assert_eq!(PlacementBounds::UpperHalf.y_limit(1), 1);
}
