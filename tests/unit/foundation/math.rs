use super::*;

#[test]
fn safe_ratio_guards_zero_and_non_finite() {
    assert_eq!(safe_ratio(1.0, 0.0), 0.0);
    assert_eq!(safe_ratio(1.0, f64::NAN), 0.0);
    assert_eq!(safe_ratio(f64::INFINITY, 2.0), 0.0);
    assert_eq!(safe_ratio(3.0, 2.0), 1.5);
}

#[test]
fn clamp_symmetric_is_hard() {
    assert_eq!(clamp_symmetric(100_000.0, 5.0), 5.0);
    assert_eq!(clamp_symmetric(-100_000.0, 5.0), -5.0);
    assert_eq!(clamp_symmetric(2.5, -5.0), 2.5);
    assert_eq!(clamp_symmetric(f64::NAN, 5.0), 0.0);
}

#[test]
fn wrap_handles_descending_marquee_range() {
    assert_eq!(wrap(-20.0, -45.0, -30.0), -30.0);
    assert_eq!(wrap(-20.0, -45.0, -50.0), -25.0);
    assert_eq!(wrap(-20.0, -45.0, 0.0), -25.0);
    for v in [-1000.0, -44.9, -20.0, 3.0, 777.0] {
        let w = wrap(-20.0, -45.0, v);
        assert!(w <= -20.0 && w > -45.0, "{v} wrapped to {w}");
    }
}

#[test]
fn wrap_handles_ascending_range() {
    assert_eq!(wrap(0.0, 10.0, 12.0), 2.0);
    assert_eq!(wrap(0.0, 10.0, -1.0), 9.0);
    assert_eq!(wrap(0.0, 0.0, 5.0), 0.0);
}
