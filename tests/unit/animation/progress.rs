use super::*;

#[test]
fn starts_at_zero_and_clamps_writes() {
    let p = ProgressHandle::new(87.0);
    assert_eq!(p.get(), 0.0);

    p.set(200.0);
    assert_eq!(p.get(), 87.0);
    p.set(-4.0);
    assert_eq!(p.get(), 0.0);
    p.set(f64::NAN);
    assert_eq!(p.get(), 0.0);
}

#[test]
fn clones_share_state() {
    let p = ProgressHandle::new(1.0);
    let q = p.clone();
    q.set(0.25);
    assert_eq!(p.get(), 0.25);
    assert!(p.ptr_eq(&q));
    assert!(!p.ptr_eq(&ProgressHandle::new(1.0)));
}

#[test]
fn normalized_handles_empty_span() {
    let p = ProgressHandle::new(0.0);
    p.set(3.0);
    assert_eq!(p.get(), 0.0);
    assert_eq!(p.normalized(), 0.0);

    let q = ProgressHandle::new(10.0);
    q.set(5.0);
    assert_eq!(q.normalized(), 0.5);
}
