use super::*;

#[test]
fn viewport_rejects_degenerate_sizes() {
    assert!(Viewport::new(1920.0, 1080.0).is_ok());
    assert!(Viewport::new(0.0, 1080.0).is_err());
    assert!(Viewport::new(1920.0, f64::NAN).is_err());
}

#[test]
fn white_opacity_premultiplies() {
    let c = Rgba8Premul::white(0.5);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(Rgba8Premul::white(2.0).a, 255);
    assert_eq!(Rgba8Premul::white(-1.0), Rgba8Premul::transparent());
}

#[test]
fn element_id_roundtrips_as_plain_string() {
    let id = ElementId::from("aside");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"aside\"");
    assert_eq!(id.to_string(), "aside");
}

#[test]
fn straight_conversion_undoes_premultiplication() {
    let c = Rgba8Premul::from_straight_rgba(200, 100, 0, 128);
    let [r, g, b, a] = c.to_straight();
    assert_eq!(a, 128);
    assert!((i32::from(r) - 200).abs() <= 1);
    assert!((i32::from(g) - 100).abs() <= 1);
    assert_eq!(b, 0);
    assert_eq!(Rgba8Premul::transparent().to_straight(), [0, 0, 0, 0]);
}
