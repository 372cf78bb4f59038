use super::*;

#[test]
fn unbounded_never_fires() {
    let d = Deadline::unbounded();
    d.check("field").unwrap();
    Deadline::from_millis(None).check("mask").unwrap();
}

#[test]
fn zero_limit_fires_immediately() {
    let d = Deadline::from_millis(Some(0));
    let err = d.check("field").unwrap_err();
    assert!(matches!(err, RainError::Timeout { limit_ms: 0, .. }));
}

#[test]
fn generous_limit_passes() {
    let d = Deadline::new(Some(Duration::from_secs(3600)));
    d.check("wetting").unwrap();
}
