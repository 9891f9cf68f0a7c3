use super::*;
use crate::animation::ease::Ease;

#[test]
fn f64_lerp_hits_endpoints_exactly() {
    let a = 0.1 + 0.2;
    let b = 1e9 + 0.7;
    assert_eq!(f64::lerp(&a, &b, 0.0), a);
    assert_eq!(f64::lerp(&a, &b, 1.0), b);
    assert_eq!(f64::lerp(&0.0, &10.0, 0.5), 5.0);
}

#[test]
fn point_lerp_is_componentwise() {
    let p = <Point as Lerp>::lerp(&Point::new(0.0, 10.0), &Point::new(10.0, 0.0), 0.25);
    assert_eq!(p, Point::new(2.5, 7.5));
}

#[test]
fn scalar_tween_applies_ease() {
    let tw = ScalarTween::new(100.0, 0.0, Ease::OutCubic);
    assert_eq!(tw.value(0.0), 100.0);
    assert_eq!(tw.value(1.0), 0.0);
    assert!(tw.value(0.5) < 50.0);
    assert_eq!(tw.value(7.0), 0.0);
}
