use super::*;

#[test]
fn mul_div255_is_symmetric_and_rounds() {
    for x in [0u8, 1, 127, 200, 255] {
        for y in [0u8, 1, 127, 200, 255] {
            assert_eq!(mul_div255(x, y), mul_div255(y, x));
        }
    }
    assert_eq!(mul_div255(255, 128), 128);
    assert_eq!(mul_div255(200, 128), 100);
    assert_eq!(mul_div255(1, 127), 0);
    assert_eq!(mul_div255(1, 128), 1);
}

#[test]
fn mul_div255_identity_at_full_scale() {
    for x in [0u8, 17, 128, 255] {
        assert_eq!(mul_div255(x, 255), x);
        assert_eq!(mul_div255(x, 0), 0);
    }
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(1.0, 0.6, 0.0), 1.0);
    assert!((lerp(1.0, 0.6, 1.0) - 0.6).abs() < 1e-6);
}

#[test]
fn to_u8_sat_clamps_and_rounds() {
    assert_eq!(to_u8_sat(-3.0), 0);
    assert_eq!(to_u8_sat(254.6), 255);
    assert_eq!(to_u8_sat(300.0), 255);
    assert_eq!(to_u8_sat(f32::NAN), 0);
}
