use super::*;

#[test]
fn rejects_zero_and_oversized_surfaces() {
    assert!(CpuSurface::new(0, 10).is_err());
    assert!(CpuSurface::new(70_000, 10).is_err());
    assert_eq!(CpuSurface::new(16, 9).unwrap().size(), (16, 9));
}

#[test]
fn image_blit_fills_destination() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.clear();
    s.draw_image(
        &PreparedImage::solid(2, 2, [255, 0, 0, 255]),
        Rect::new(0.0, 0.0, 8.0, 8.0),
    )
    .unwrap();
    s.present().unwrap();

    let frame = s.snapshot().unwrap();
    assert_eq!(frame.data.len(), 8 * 8 * 4);
    let [r, g, b, a] = frame.pixel(4, 4).unwrap();
    assert_eq!(a, 255);
    assert!(r > 200 && g < 40 && b < 40);
}

#[test]
fn polygon_fill_covers_interior_only() {
    let mut s = CpuSurface::new(10, 10).unwrap();
    s.clear();
    let square = [
        Point::new(2.0, 2.0),
        Point::new(8.0, 2.0),
        Point::new(8.0, 8.0),
        Point::new(2.0, 8.0),
    ];
    s.fill_polygon(&square, Rgba8Premul::white(1.0)).unwrap();
    s.present().unwrap();

    let frame = s.snapshot().unwrap();
    assert_eq!(frame.pixel(5, 5).unwrap()[3], 255);
    assert_eq!(frame.pixel(0, 0).unwrap()[3], 0);
}

#[test]
fn stroke_requires_positive_width() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    let tri = [Point::ZERO, Point::new(3.0, 0.0), Point::new(0.0, 3.0)];
    assert!(s.stroke_polygon(&tri, 0.0, Rgba8Premul::white(1.0)).is_err());
    assert!(s.stroke_polygon(&tri, 1.0, Rgba8Premul::white(1.0)).is_ok());
}

#[test]
fn degenerate_polygons_are_skipped() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    assert!(s.fill_polygon(&[], Rgba8Premul::white(1.0)).is_ok());
    assert!(s.fill_polygon(&[Point::ZERO], Rgba8Premul::white(1.0)).is_ok());
}
