use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RainError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(RainError::decode("x").to_string().contains("decode error:"));
    assert!(RainError::encode("x").to_string().contains("encode error:"));
    assert!(
        RainError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn no_assets_names_the_directory() {
    let err = RainError::no_assets("assets/drops");
    assert!(err.to_string().contains("assets/drops"));
    assert!(err.is_user_facing());
}

#[test]
fn timeout_reports_limit() {
    let err = RainError::Timeout {
        elapsed_ms: 1200,
        limit_ms: 1000,
    };
    let msg = err.to_string();
    assert!(msg.contains("1200"));
    assert!(msg.contains("limit 1000"));
    assert!(!err.is_user_facing());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RainError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
