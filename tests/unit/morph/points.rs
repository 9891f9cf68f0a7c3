use super::*;

fn dist(a: Point, b: Point) -> f64 {
    (a - b).hypot()
}

#[test]
fn every_kind_has_point_count_samples_on_radius() {
    for kind in [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Hexagon,
    ] {
        let set = generate(kind, 100.0, 960.0, 540.0, 0.3);
        assert_eq!(set.len(), POINT_COUNT);
        for p in set.points() {
            assert!((dist(*p, Point::new(960.0, 540.0)) - 100.0).abs() < 1e-9);
        }
    }
}

#[test]
fn polygons_stack_samples_on_vertices() {
    let tri = generate(ShapeKind::Triangle, 10.0, 0.0, 0.0, 0.0);
    let mut distinct: Vec<Point> = Vec::new();
    for p in tri.points() {
        if !distinct.iter().any(|q| dist(*p, *q) < 1e-9) {
            distinct.push(*p);
        }
    }
    assert_eq!(distinct.len(), 3);
    // 8 samples per sector; sector 0 sits at angle 0.
    assert!(dist(tri.points()[7], Point::new(10.0, 0.0)) < 1e-9);
    assert!(dist(tri.points()[8], tri.points()[15]) < 1e-9);
}

#[test]
fn square_is_rotated_a_quarter_pi() {
    let sq = generate(ShapeKind::Square, 2f64.sqrt(), 0.0, 0.0, 0.0);
    let p = sq.points()[0];
    assert!((p.x - 1.0).abs() < 1e-9);
    assert!((p.y - 1.0).abs() < 1e-9);
}

#[test]
fn circle_samples_are_evenly_spaced() {
    let c = generate(ShapeKind::Circle, 1.0, 0.0, 0.0, 0.0);
    let step = dist(c.points()[0], c.points()[1]);
    for w in c.points().windows(2) {
        assert!((dist(w[0], w[1]) - step).abs() < 1e-9);
    }
}

#[test]
fn lerp_is_exact_at_both_ends() {
    let a = generate(ShapeKind::Circle, 416.0, 960.0, 540.0, 0.0);
    let b = generate(ShapeKind::Hexagon, 208.0, 1100.3, 400.7, 0.77);
    assert_eq!(lerp(&a, &b, 0.0).unwrap(), a);
    assert_eq!(lerp(&a, &b, 1.0).unwrap(), b);

    let mid = lerp(&a, &b, 0.5).unwrap();
    let expected = Point::new(
        (a.points()[3].x + b.points()[3].x) / 2.0,
        (a.points()[3].y + b.points()[3].y) / 2.0,
    );
    assert!(dist(mid.points()[3], expected) < 1e-9);
}

#[test]
fn lerp_lands_on_inexact_targets_bit_for_bit() {
    let a = PointSet::new(vec![Point::new(0.7, -3.1), Point::new(1e-3, 99.9)]);
    let b = PointSet::new(vec![Point::new(0.3, 0.1), Point::new(123.456, -7.77)]);
    let end = lerp(&a, &b, 1.0).unwrap();
    assert_eq!(end, b);
    assert_eq!(end.points()[0].y.to_bits(), 0.1f64.to_bits());
}

#[test]
fn lerp_rejects_unequal_lengths() {
    let a = generate(ShapeKind::Circle, 1.0, 0.0, 0.0, 0.0);
    let b = PointSet::new(a.points()[..10].to_vec());
    assert!(matches!(
        lerp(&a, &b, 0.5),
        Err(ScrollyteError::Invariant(_))
    ));
    assert!(lerp(&a, &b, 0.0).is_err());
}

#[test]
fn centroid_and_svg_rendering() {
    let c = generate(ShapeKind::Hexagon, 5.0, 3.0, 4.0, 0.0);
    let centroid = c.centroid().unwrap();
    assert!(dist(centroid, Point::new(3.0, 4.0)) < 1e-9);
    assert!(PointSet::new(Vec::new()).centroid().is_none());

    let s = PointSet::new(vec![Point::new(1.0, 2.0), Point::new(3.5, 4.0)]);
    assert_eq!(s.to_svg_points(), "1,2 3.5,4");
}
